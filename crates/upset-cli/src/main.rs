//! upset-predict: predict an upset for a fixture file, optionally rendering a
//! persona reply, logging to SQLite and recording settled results.

mod fixture;
mod recording;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use upset_core::config::EngineConfig;
use upset_core::models::MatchResult;
use upset_core::traits::{IHistoricalAccuracy, IPatternRepository};
use upset_engine::catalog::defaults::builtin_patterns;
use upset_engine::{
    FactorCatalog, InMemoryPatternRepository, KeywordInjectionGuard, PersonaLayer,
    PredictionEngine, StaticDataProvider, StaticTeamDirectory,
};
use upset_storage::{open_database, PredictionLog, SqlitePatternRepository};

use fixture::Fixture;
use recording::record_logged_outcome;

#[derive(Parser)]
#[command(name = "upset-predict")]
#[command(about = "Predict whether an underdog avoids defeat", long_about = None)]
struct Cli {
    /// Engine config (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a fixture and print the prediction as JSON
    Predict {
        /// Fixture file (JSON)
        fixture: PathBuf,
        /// Factor catalog (TOML); the shipped catalog when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Render a persona reply to this message instead of the raw prediction
        #[arg(long)]
        persona: Option<String>,
    },
    /// Record the final score for a logged prediction (requires a database)
    Record {
        prediction_id: Uuid,
        home_score: u32,
        away_score: u32,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Predict {
            fixture,
            catalog,
            persona,
        } => predict(config, &fixture, catalog.as_deref(), persona).await,
        Commands::Record {
            prediction_id,
            home_score,
            away_score,
        } => record(config, prediction_id, MatchResult::new(home_score, away_score)).await,
        Commands::DefaultConfig => {
            print!("{}", toml::to_string_pretty(&EngineConfig::default())?);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = EngineConfig::from_toml(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!(path = %path.display(), "Config loaded");
    Ok(config)
}

fn load_catalog(path: Option<&Path>) -> Result<FactorCatalog> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            Ok(FactorCatalog::from_toml(&text)?)
        }
        None => Ok(FactorCatalog::builtin()),
    }
}

async fn predict(
    config: EngineConfig,
    fixture_path: &Path,
    catalog_path: Option<&Path>,
    persona: Option<String>,
) -> Result<()> {
    let text = std::fs::read_to_string(fixture_path)
        .with_context(|| format!("reading fixture {}", fixture_path.display()))?;
    let fixture = Fixture::from_json(&text)
        .with_context(|| format!("parsing fixture {}", fixture_path.display()))?;
    let catalog = load_catalog(catalog_path)?;

    if config.storage.db_path.is_some() {
        let pool = open_database(&config.storage)?;
        let repo = SqlitePatternRepository::new(Arc::clone(&pool));
        repo.seed_if_empty(&builtin_patterns())?;
        let log = Arc::new(PredictionLog::new(pool));
        run_prediction(config, catalog, &fixture, repo, Some(log), persona).await
    } else {
        let repo = InMemoryPatternRepository::builtin();
        run_prediction(config, catalog, &fixture, repo, None, persona).await
    }
}

async fn run_prediction<R: IPatternRepository>(
    config: EngineConfig,
    catalog: FactorCatalog,
    fixture: &Fixture,
    repository: R,
    log: Option<Arc<PredictionLog>>,
    persona: Option<String>,
) -> Result<()> {
    let layer_config = config.clone();
    let mut engine = PredictionEngine::new(
        config,
        Arc::new(catalog),
        Arc::new(fixture.provider()),
        Arc::new(repository),
        Arc::new(fixture.teams()),
    )?;
    if let Some(market) = fixture.market() {
        engine = engine.with_market_signal(Arc::new(market));
    }
    if let Some(log) = &log {
        engine = engine.with_historical_accuracy(Arc::clone(log) as Arc<dyn IHistoricalAccuracy>);
    }

    let predict = || {
        engine.predict(
            &fixture.home.id,
            &fixture.away.id,
            &fixture.favorite,
            &fixture.underdog,
        )
    };

    match persona {
        Some(message) => {
            let layer = PersonaLayer::new(KeywordInjectionGuard::new()?, &layer_config);
            let response = layer.respond(&message, predict()).await?;
            if let (Some(log), Some(prediction)) = (&log, &response.prediction) {
                log.store_prediction(prediction)?;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        None => {
            let prediction = predict().await?;
            if let Some(log) = &log {
                log.store_prediction(&prediction)?;
            }
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
    }
    Ok(())
}

async fn record(config: EngineConfig, prediction_id: Uuid, result: MatchResult) -> Result<()> {
    if config.storage.db_path.is_none() {
        bail!("recording outcomes needs storage.db_path in the config");
    }
    let pool = open_database(&config.storage)?;
    let log = PredictionLog::new(Arc::clone(&pool));

    let Some(prediction) = log.load_prediction(prediction_id)? else {
        bail!("no logged prediction {prediction_id}");
    };
    // The stored prediction carries everything the validator needs; the
    // engine only supplies the repository and configuration.
    let teams = StaticTeamDirectory::new()
        .with_team(prediction.favorite.as_str(), prediction.favorite_name.as_str())
        .with_team(prediction.underdog.as_str(), prediction.underdog_name.as_str());
    let engine = PredictionEngine::new(
        config,
        Arc::new(FactorCatalog::builtin()),
        Arc::new(StaticDataProvider::new()),
        Arc::new(SqlitePatternRepository::new(pool)),
        Arc::new(teams),
    )?;

    let Some(outcome) = record_logged_outcome(&engine, &log, &prediction, result).await? else {
        bail!("outcome for {prediction_id} is already recorded or being recorded");
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
