use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poe2_divine_analyzer::analyzer::{listings_from_response, process_batch};
use poe2_divine_analyzer::config::load_config;
use poe2_divine_analyzer::report::{render_base, render_item};
use poe2_divine_analyzer::{ItemProcessor, Result, WeaponBaseDatabase};

#[derive(Parser)]
#[command(name = "poe2-divine-analyzer")]
#[command(about = "Checks PoE2 trade listings for divine reroll potential", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a saved trade fetch response
    Analyze {
        /// JSON file with `{"result": [...]}` or an array of listings
        input: PathBuf,

        /// Analysis settings (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Weapon base table (JSON) replacing the built-in one
        #[arg(long)]
        weapon_bases: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Only show items worth rerolling
        #[arg(long)]
        worth_only: bool,
    },

    /// Print the effective configuration
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the weapon base table
    Bases {
        #[arg(long)]
        weapon_bases: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

async fn load_bases(path: Option<&Path>) -> Result<WeaponBaseDatabase> {
    match path {
        Some(path) => WeaponBaseDatabase::load_from_file(&path.to_string_lossy()).await,
        None => WeaponBaseDatabase::builtin(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze {
            input,
            config,
            weapon_bases,
            format,
            worth_only,
        } => {
            let config = load_config(config.as_deref())?;
            let bases = load_bases(weapon_bases.as_deref()).await?;
            let currency = config.pricing.currency.clone();

            let content = tokio::fs::read_to_string(&input).await?;
            let listings = listings_from_response(serde_json::from_str(&content)?);
            info!("Analyzing {} listings from {}", listings.len(), input.display());

            let processor = Arc::new(ItemProcessor::new(config, bases));
            let mut results = process_batch(processor, listings).await?;
            if worth_only {
                results.retain(|d| d.is_worth_rerolling());
            }

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
                OutputFormat::Text => {
                    for details in &results {
                        println!("{}", render_item(details, &currency));
                    }
                }
            }
        }
        Command::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
        Command::Bases { weapon_bases } => {
            let bases = load_bases(weapon_bases.as_deref()).await?;
            for base in bases.iter() {
                println!("{}", render_base(base));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poe2_divine_analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
