mod display;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rubricas_core::{CollectionSource, DetailSource, DisplayPolicy};
use rubricas_nav::{Action, NavigationController};
use rubricas_store::{FsSource, RecordFetcher, RecordStore, StoreStatus};
use rubricas_sync::HttpSource;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::display::TerminalPresenter;

#[derive(Parser)]
#[command(name = "rubricas", version, about = "Browse the payroll rubrica catalog")]
struct Cli {
    /// Directory holding listagem-rubricas.json and rubricas/<codigo>.json.
    #[arg(long, env = "RUBRICAS_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Fetch the data files from this site instead of the data directory.
    #[arg(long, env = "RUBRICAS_BASE_URL")]
    base_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "RUBRICAS_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Longest result list printed before truncating.
    #[arg(long, env = "RUBRICAS_MAX_DISPLAY", default_value_t = 100)]
    max_display: usize,

    /// Result count above which a "refine your search" notice is shown.
    #[arg(long, env = "RUBRICAS_NOTICE_THRESHOLD", default_value_t = 50)]
    notice_threshold: usize,

    /// Log level for the rubricas crates when RUST_LOG is not set.
    #[arg(long, env = "RUBRICAS_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive browser (default).
    Browse,
    /// Print the results of one search.
    Search {
        /// Search term; omit to list every rubrica.
        term: Vec<String>,
    },
    /// Print the detail card of one rubrica.
    Show { codigo: String },
    /// Load the collection and report its state.
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    info!("rubricas v{}", env!("CARGO_PKG_VERSION"));

    let (collection, details) = sources(&cli)?;
    let store = Arc::new(RecordStore::new(collection));
    let presenter = Arc::new(TerminalPresenter::new(std::io::stdout()));
    let controller = NavigationController::new(
        store.clone(),
        RecordFetcher::new(details),
        presenter,
        DisplayPolicy {
            max_display: cli.max_display,
            notice_threshold: cli.notice_threshold,
        },
    );

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => {
            preload(&store).await;
            browse(&store, &controller).await?;
        }
        Command::Search { term } => {
            controller.dispatch(Action::Search(term.join(" "))).await?;
        }
        Command::Show { codigo } => {
            controller.dispatch(Action::Select(codigo)).await?;
        }
        Command::Status => {
            preload(&store).await;
            print_status(&store.status());
        }
    }
    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rubricas={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn sources(cli: &Cli) -> anyhow::Result<(Arc<dyn CollectionSource>, Arc<dyn DetailSource>)> {
    match &cli.base_url {
        Some(base_url) => {
            let http = Arc::new(
                HttpSource::with_timeout(base_url.clone(), Duration::from_secs(cli.timeout_secs))
                    .context("building HTTP client")?,
            );
            info!(base_url = %base_url, "using remote data");
            Ok((http.clone(), http))
        }
        None => {
            let fs = Arc::new(FsSource::new(&cli.data_dir));
            info!(data_dir = %cli.data_dir.display(), "using local data");
            Ok((fs.clone(), fs))
        }
    }
}

/// Warm the collection cache; a failure here is not fatal.
async fn preload(store: &RecordStore) {
    info!("preloading rubrica list");
    match store.load_collection().await {
        Ok(collection) => info!(count = collection.len(), "rubrica list preloaded"),
        Err(err) => warn!(error = %err, "could not preload rubrica list"),
    }
}

async fn browse(store: &RecordStore, controller: &NavigationController) -> anyhow::Result<()> {
    println!("Digite um termo de busca (vazio lista todas as rubricas).");
    println!("Comandos: :open <código>  :back  :all  :close  :reload  :quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading input")? {
        let line = line.trim();
        if matches!(line, ":quit" | ":q" | ":exit") {
            break;
        }
        if line == ":reload" {
            store.reload();
            preload(store).await;
            continue;
        }
        // Failures are already shown by the presenter.
        if let Err(err) = controller.dispatch(Action::parse(line)).await {
            warn!(error = %err, "action failed");
        }
    }
    Ok(())
}

fn print_status(status: &StoreStatus) {
    match status {
        StoreStatus::NotLoaded => println!("Lista de rubricas não carregada"),
        StoreStatus::Loading => println!("Lista de rubricas carregando"),
        StoreStatus::Loaded { count, loaded_at } => {
            println!("{count} rubricas carregadas em {}", timestamp(loaded_at))
        }
        StoreStatus::Failed { error, failed_at } => {
            println!("Falha ao carregar rubricas em {}: {error}", timestamp(failed_at))
        }
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
