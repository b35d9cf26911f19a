//! Book fair portal shell.
//!
//! Reads commands from stdin and prints the pages they lead to. Session flags
//! persist to `BOOKFAIR_SESSION_FILE` when it is set.

use bookfair::config::Config;
use bookfair::environment::{Notifier, PortalEnvironment, TracingNotifier};
use bookfair::session::{JsonFileStore, KeyValueStore, MemoryStore, SessionContext};
use bookfair::shell::{self, Command, CommandError, Outcome, PortalApp};
use bookfair_core::environment::SystemClock;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        rows = config.catalog.rows,
        columns = config.catalog.columns,
        max_selection = config.max_selection,
        "Configuration loaded"
    );

    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier { echo: true });
    let environment = PortalEnvironment::new(Arc::new(SystemClock), Arc::clone(&notifier));
    let store = shell::build_store(&config, environment)?;

    match &config.session_file {
        Some(path) => {
            info!(path = %path.display(), "Session flags persisted to file");
            let sessions = SessionContext::load(JsonFileStore::open(path)?)?;
            run(PortalApp::new(store, sessions, notifier, config.page_size)).await
        },
        None => {
            let sessions = SessionContext::load(MemoryStore::new())?;
            run(PortalApp::new(store, sessions, notifier, config.page_size)).await
        },
    }
}

async fn run<S: KeyValueStore>(mut app: PortalApp<S>) -> anyhow::Result<()> {
    println!("Colombo International Book Fair. Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let result = match line.parse::<Command>() {
            Ok(command) => app.execute(command).await,
            Err(error) => Err(error),
        };
        match result {
            Ok(Outcome::Continue(page)) => {
                if !page.is_empty() {
                    println!("{page}");
                }
            },
            Ok(Outcome::Quit) => break,
            Err(CommandError::Auth(error)) => println!("{error}"),
            Err(error @ (CommandError::Storage(_) | CommandError::Store(_))) => {
                warn!(%error, "Command failed");
                return Err(error.into());
            },
            Err(error) => println!("{error}"),
        }
    }

    app.store().shutdown();
    info!("Portal closed");
    Ok(())
}
