mod mappings;
mod process;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fitment-cli")]
#[command(about = "Fitment mapping engine command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed mapping rules from the YAML config into the database
    Seed {
        /// Mappings file to load (defaults to the configured path)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Inspect the mapping-rule table
    Mappings {
        #[command(subcommand)]
        command: mappings::MappingsCommands,
    },
    /// Process a file of application strings through the mapping engine
    Process {
        /// Part terminology id the applications describe
        #[arg(long)]
        terminology: i64,
        /// File with one application string per line
        #[arg(long)]
        file: PathBuf,
        /// Product to attach persisted fitment records to
        #[arg(long)]
        product_id: Option<i64>,
        /// Persist accepted results to the database
        #[arg(long)]
        save: bool,
        /// Print the full report as JSON instead of per-line text
        #[arg(long)]
        json: bool,
    },
    /// Show recent import runs
    Runs {
        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = fitment_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = fitment_db::PoolConfig::from_app_config(&config);
    let pool = fitment_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = fitment_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "database migrations applied");
    }

    match cli.command {
        Commands::Seed { file } => {
            mappings::run_mappings_seed(&pool, &config, file.as_deref()).await?;
        }
        Commands::Mappings { command } => match command {
            mappings::MappingsCommands::List => mappings::run_mappings_list(&pool).await?,
        },
        Commands::Process {
            terminology,
            file,
            product_id,
            save,
            json,
        } => {
            process::run_process(&pool, &config, terminology, &file, product_id, save, json)
                .await?;
        }
        Commands::Runs { limit } => process::run_runs(&pool, limit).await?,
    }

    Ok(())
}

/// Attempt to mark an import run as failed, logging any secondary error.
pub(crate) async fn fail_run_best_effort(
    pool: &sqlx::PgPool,
    run_id: i64,
    context: &'static str,
    message: String,
) {
    if let Err(mark_err) = fitment_db::fail_import_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark {context} run as failed"
        );
    }
}
