use anyhow::Context;
use cityweather_core::{
    CityDirectory, Config, Language, LookupError, WeatherController, WeatherRecord,
};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::debug;

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Weather for world cities")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set language, suggestion limit and API base URL.
    Configure,

    /// Show current weather for a city from the catalog.
    Show {
        /// Exact city name, e.g. "北京".
        city: String,

        /// Print the weather record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show current weather for a randomly chosen city.
    Random {
        /// Print the weather record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List catalog cities matching a partial name.
    Suggest {
        /// Partial city name.
        query: String,

        /// Maximum number of suggestions; defaults to the configured limit.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every city in the catalog.
    Cities,

    /// Search repeatedly with autocomplete until you quit.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => prompt::configure(),
            Command::Show { city, json } => {
                let config = load_config()?;
                let mut controller = WeatherController::from_config(&config)?;
                let outcome = controller.search(&city).await;
                print_outcome(outcome, controller.language(), json)
            }
            Command::Random { json } => {
                let config = load_config()?;
                let mut controller = WeatherController::from_config(&config)?;
                let outcome = controller.random(&mut rand::rng()).await;
                print_outcome(outcome, controller.language(), json)
            }
            Command::Suggest { query, limit } => {
                let config = load_config()?;
                let limit = limit.unwrap_or(config.suggestion_limit);
                let directory = CityDirectory::builtin();
                for name in directory.suggest(&query, limit) {
                    println!("{name}");
                }
                Ok(())
            }
            Command::Cities => {
                let directory = CityDirectory::builtin();
                for location in directory.iter() {
                    println!("{}", render::catalog_line(location));
                }
                Ok(())
            }
            Command::Interactive => {
                let config = load_config()?;
                let controller = WeatherController::from_config(&config)?;
                prompt::interactive(controller).await
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let path = Config::config_file_path()?;
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let config = Config::load_from(path)?;
    debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

fn print_outcome(
    outcome: Result<WeatherRecord, LookupError>,
    language: Language,
    json: bool,
) -> anyhow::Result<()> {
    match outcome {
        Ok(record) if json => {
            let json_record = render::JsonRecord::from(&record);
            let out = serde_json::to_string_pretty(&json_record)
                .context("Failed to serialize weather record")?;
            println!("{out}");
            Ok(())
        }
        Ok(record) => {
            println!("{}", render::record(&record, language));
            Ok(())
        }
        Err(err) => {
            let message = err.user_message(language);
            Err(anyhow::Error::new(err).context(message))
        }
    }
}
