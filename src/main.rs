use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, Level};

use crate::config::Config;

mod config;
mod discounts;
mod prices;
mod products;
mod retailers;
mod stores;
mod text;
mod utils;

/// Converts the cHAZe product, store and price exports into Firestore-ready JSON.
#[derive(Debug, Parser)]
struct Cli {
    /// YAML config (defaults to firestore-export.yaml in --dir, if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base directory for relative paths
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, Debug, PartialEq, Subcommand)]
enum Command {
    /// Every phase, in order (the default)
    All,
    /// Static retailer catalog
    Retailers,
    /// Clean product text and attach keywords
    Products,
    /// Classify and geocode stores
    Stores,
    /// One price per retailer and product
    Prices,
    /// Clean discount text in place
    Discounts,
}

impl Command {
    fn phases(self) -> Vec<Self> {
        match self {
            Self::All => vec![
                Self::Retailers,
                Self::Products,
                Self::Stores,
                Self::Prices,
                Self::Discounts,
            ],
            x => vec![x],
        }
    }

    fn run(self, config: &Config) -> Result<()> {
        match self {
            Self::All => {
                for phase in self.phases() {
                    phase.run(config)?;
                }
                Ok(())
            }
            Self::Retailers => retailers::run(config),
            Self::Products => products::run(config),
            Self::Stores => stores::run(config),
            Self::Prices => prices::run(config),
            Self::Discounts => discounts::run(config),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let config = Config::discover(&cli.dir, cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Command::All);

    info!("=== Firestore Transformation ===");
    command.run(&config)?;

    info!("=== Transformation Complete ===");
    for phase in command.phases() {
        let (label, path) = match phase {
            Command::Retailers => ("Retailers", &config.outputs.retailers),
            Command::Products => ("Products", &config.outputs.products),
            Command::Stores => ("Stores", &config.outputs.stores),
            Command::Prices => ("Prices (retailer-level)", &config.outputs.retailer_prices),
            Command::Discounts => ("Discounts", &config.outputs.discounts),
            Command::All => continue,
        };
        info!("{label}: {}", path.display());
    }

    Ok(())
}
