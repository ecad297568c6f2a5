use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use std::sync::Arc;
use tracing::debug;

use cityweather_core::{
    BatchOrchestrator, CityCache, Config, Throttle, config::MAX_FORECAST_DAYS, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather and rankings")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search one or more cities and show current conditions and forecast.
    Search {
        /// City names, e.g. "São Paulo".
        #[arg(required = true)]
        cities: Vec<String>,
    },

    /// Load a list of cities one by one and show the rankings.
    Batch {
        /// Cities to load; the configured startup list when empty.
        cities: Vec<String>,
    },

    /// Interactively edit the configuration file.
    Configure,

    /// Print where the configuration file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Search { cities } => {
                let config = Config::load()?;
                let orchestrator = orchestrator_from_config(&config)?;

                for city in &cities {
                    match orchestrator.search(city).await {
                        Ok(report) => render::print_city_report(&report),
                        Err(failure) => render::print_failure(&failure),
                    }
                }
            }
            Command::Batch { cities } => {
                let config = Config::load()?;
                let orchestrator = orchestrator_from_config(&config)?;

                let cities = if cities.is_empty() { config.startup_cities.clone() } else { cities };
                let report = orchestrator.run_batch(&cities).await;
                render::print_batch_report(&report);
            }
            Command::Configure => configure()?,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn orchestrator_from_config(config: &Config) -> anyhow::Result<BatchOrchestrator> {
    debug!(
        language = %config.language,
        forecast_days = config.forecast_days,
        batch_pause_ms = config.batch_pause_ms,
        "Building orchestrator"
    );
    let provider = Arc::new(provider_from_config(config)?);
    Ok(BatchOrchestrator::new(provider.clone(), provider, Arc::new(CityCache::new()))
        .with_throttle(Throttle::new(config.batch_pause()))
        .with_forecast_days(config.forecast_days))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.language = Text::new("Geocoding language:")
        .with_default(&config.language)
        .prompt()
        .context("Failed to read language")?;

    config.forecast_days = CustomType::<u8>::new("Forecast days:")
        .with_default(config.forecast_days)
        .with_help_message(&format!("1 to {MAX_FORECAST_DAYS}"))
        .prompt()
        .context("Failed to read forecast days")?;

    config.batch_pause_ms = CustomType::<u64>::new("Pause between batch cities (ms):")
        .with_default(config.batch_pause_ms)
        .prompt()
        .context("Failed to read batch pause")?;

    let cities = Text::new("Startup cities (comma separated):")
        .with_default(&config.startup_cities.join(", "))
        .prompt()
        .context("Failed to read startup cities")?;
    config.startup_cities = parse_city_list(&cities);

    config.validate()?;
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn parse_city_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_city_list_drops_blanks() {
        assert_eq!(parse_city_list(" Recife, ,Natal ,"), ["Recife", "Natal"]);
        assert!(parse_city_list("  ").is_empty());
    }

    #[test]
    fn batch_accepts_no_cities() {
        let cli = Cli::try_parse_from(["cityweather", "batch"]).unwrap();
        assert!(matches!(cli.command, Command::Batch { cities } if cities.is_empty()));
    }

    #[test]
    fn search_requires_a_city() {
        assert!(Cli::try_parse_from(["cityweather", "search"]).is_err());

        let cli = Cli::try_parse_from(["cityweather", "-v", "search", "São Paulo"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Search { cities } if cities == ["São Paulo"]));
    }

    #[test]
    fn orchestrator_builds_from_default_config() {
        assert!(orchestrator_from_config(&Config::default()).is_ok());
    }
}
