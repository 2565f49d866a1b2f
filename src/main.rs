use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tomato_match::config::{LoggingSettings, Settings};
use tomato_match::core::{Matcher, OverrideError, OverrideTable};
use tomato_match::models::{OutputColumns, Record};
use tomato_match::services::{EnrichError, Enricher, SearchClient, SearchError};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Adds review scores to every movie in a JSON list
#[derive(Debug, Parser)]
#[command(name = "tomato-match", version, about)]
struct Cli {
    /// JSON file holding an array of movie records
    input: PathBuf,

    /// Write the enriched records here instead of back to INPUT
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to config/default.toml and config/local.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("Invalid search settings: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Overrides(#[from] OverrideError),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid records in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);

    match run(cli, settings).await {
        Ok(()) => {
            info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<(), AppError> {
    settings.search.validate()?;

    let mut overrides = OverrideTable::with_defaults();
    if let Some(path) = &settings.matching.overrides_path {
        let count = overrides.load_file(path)?;
        info!("Loaded {} score overrides from {}", count, path);
    }

    let search = SearchClient::new(&settings.search)?;
    let matcher = Matcher::new(overrides);
    info!("{} score overrides active", matcher.overrides().len());

    info!("Search client initialized (index: {}, params: {})", settings.search.index_name, search.params());

    let enricher = Enricher::new(search, matcher)
        .with_columns(OutputColumns::new(
            settings.enrichment.critics_column.clone(),
            settings.enrichment.audience_column.clone(),
        ))
        .with_request_delay(Duration::from_millis(settings.enrichment.request_delay_ms));

    info!("Reading records...");
    let records = read_records(&cli.input)?;

    let (enriched, stats) = enricher.enrich(records).await?;
    if stats.unmatched > 0 {
        warn!("{} of {} records got no scores", stats.unmatched, stats.total);
    }

    let output = cli.output.as_deref().unwrap_or(&cli.input);
    info!("Updating {}...", output.display());
    write_records(output, &enriched)
}

fn read_records(path: &Path) -> Result<Vec<Record>, AppError> {
    let source = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&source).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_records(path: &Path, records: &[Record]) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(records).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, json).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}
