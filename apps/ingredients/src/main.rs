//! Interactive shell for the ingredient manager.
//!
//! Reads commands from stdin and prints the screen after every command and
//! whenever a request completes or the search debounce fires. Logs go to
//! stderr; set `RUST_LOG` to change verbosity.
//!
//! ```bash
//! LARDER_DATABASE_URL=https://pantry.example.com cargo run -p ingredients
//! ```

use ingredients::shell::{self, Command, HELP};
use ingredients::{AppConfig, IngredientsEnvironment, IngredientsReducer, IngredientsState, view};
use larder_docstore::DocStoreClient;
use larder_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ingredients=info,larder_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    larder_runtime::metrics::register_metrics();

    let config = AppConfig::from_env()?;
    tracing::info!(
        collection = %config.collection,
        debounce_ms = config.debounce.as_millis(),
        cancel_in_flight = config.cancel_in_flight,
        "Configuration loaded"
    );

    let client = match config.request_timeout {
        Some(timeout) => DocStoreClient::new().with_timeout(timeout),
        None => DocStoreClient::new(),
    };
    let env = IngredientsEnvironment::new(config.collection.clone(), Arc::new(client))
        .with_debounce(config.debounce);
    let store = Store::new(
        IngredientsState::new(),
        IngredientsReducer::new(config.policy()),
        env,
    );

    // Re-render whenever an effect feeds an action back; state already reflects it
    let mut actions = store.subscribe_actions();
    let renderer = store.clone();
    let render_task = tokio::spawn(async move {
        loop {
            match actions.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    println!("{}", renderer.state(view::render).await);
                },
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("{}", store.state(view::render).await);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match shell::parse(&line) {
            Ok(Command::Send(action)) => {
                store.send(action).await?;
                println!("{}", store.state(view::render).await);
            },
            Ok(Command::Show) => println!("{}", store.state(view::render).await),
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(error) => println!("{error}"),
        }
    }

    render_task.abort();
    if let Err(error) = store.shutdown(Duration::from_secs(5)).await {
        tracing::warn!(error = %error, "Requests still in flight at exit");
    }
    Ok(())
}
