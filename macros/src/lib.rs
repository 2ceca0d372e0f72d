//! Derive macros for Larder
//!
//! This crate provides procedural macros to reduce boilerplate when building
//! features with Larder reducers.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (commands/events)
//!
//! # Example
//!
//! ```ignore
//! use larder_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum PantryAction {
//!     #[command]
//!     AddItem { title: String },
//!
//!     #[event]
//!     ItemStored { id: String },
//! }
//!
//! // Generated methods:
//! assert!(PantryAction::AddItem { title: "Flour".into() }.is_command());
//! assert!(PantryAction::ItemStored { id: "k1".into() }.is_event());
//! assert_eq!(PantryAction::ItemStored { id: "k1".into() }.name(), "ItemStored");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Variant, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command (user intent)
/// - `is_event()` - Returns true if this variant is an event (something that
///   happened, usually fed back by an effect)
/// - `name()` - Returns the variant name, for logs and metrics labels
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum IngredientsAction {
///     #[command]
///     RemoveIngredient { id: IngredientId },
///
///     #[event]
///     DebounceElapsed { text: String },
///
///     #[event]
///     ListRequest(ListRequestAction),
/// }
///
/// let action = IngredientsAction::DebounceElapsed { text: "App".into() };
/// assert!(action.is_event());
/// assert_eq!(action.name(), "DebounceElapsed");
/// ```
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut is_command_arms = Vec::new();
    let mut is_event_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(variant, "Variant cannot be both #[command] and #[event]")
                .to_compile_error()
                .into();
        }

        let pattern = variant_pattern(variant);

        if is_command {
            is_command_arms.push(quote! { #pattern => true, });
        }

        if is_event {
            is_event_arms.push(quote! { #pattern => true, });
        }

        let variant_name = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #variant_name, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a command
            #[must_use]
            #[allow(clippy::match_like_matches_macro)]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#is_command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            #[allow(clippy::match_like_matches_macro)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name of this action
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern covering every value of `variant`, ignoring its fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
