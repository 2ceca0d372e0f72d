//! Collection endpoints.
//!
//! A collection named `ingredients` under `https://db.example.com` lives at
//! `https://db.example.com/ingredients.json`; the document with key `k1` at
//! `https://db.example.com/ingredients/k1.json`.

use crate::error::EndpointError;
use reqwest::Url;

/// A named collection on a document store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    base: Url,
    name: String,
}

impl Collection {
    /// Creates a collection endpoint
    ///
    /// A trailing slash on `base` is optional.
    ///
    /// # Errors
    ///
    /// - [`EndpointError::InvalidBase`] if `base` is not a URL
    /// - [`EndpointError::CannotBeABase`] if `base` cannot carry a path
    /// - [`EndpointError::InvalidCollection`] if `name` is empty or contains `/`
    pub fn new(base: &str, name: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(base).map_err(|e| EndpointError::InvalidBase {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(EndpointError::CannotBeABase(base.to_string()));
        }
        if name.is_empty() || name.contains('/') {
            return Err(EndpointError::InvalidCollection(name.to_string()));
        }

        Ok(Self {
            base,
            name: name.to_string(),
        })
    }

    /// Collection name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `{base}/{collection}.json`
    #[must_use]
    pub fn url(&self) -> String {
        self.with_segments(&[format!("{}.json", self.name).as_str()])
            .to_string()
    }

    /// `{base}/{collection}/{id}.json`; `id` is percent-encoded as one path segment
    #[must_use]
    pub fn document_url(&self, id: &str) -> String {
        self.with_segments(&[self.name.as_str(), format!("{id}.json").as_str()])
            .to_string()
    }

    /// The collection URL, filtered to documents whose `title` equals `filter`
    ///
    /// An empty filter yields the unfiltered [`Collection::url`]. Otherwise
    /// appends `orderBy="title"&equalTo="<filter>"`, form-encoded.
    #[must_use]
    pub fn query_url(&self, filter: &str) -> String {
        let mut url = self.with_segments(&[format!("{}.json", self.name).as_str()]);
        if !filter.is_empty() {
            url.query_pairs_mut()
                .append_pair("orderBy", "\"title\"")
                .append_pair("equalTo", &format!("\"{filter}\""));
        }
        url.to_string()
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url())
    }
}
