use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinate, CurrentConditions, DailyForecast},
    provider::open_meteo::OpenMeteoProvider,
};

pub mod open_meteo;

/// Turns a free-text city name into coordinates.
#[async_trait]
pub trait GeoResolver: Send + Sync + Debug {
    /// Picks the provider's first-ranked match. No retries.
    async fn resolve(&self, city_name: &str) -> Result<Coordinate, WeatherError>;
}

/// Current conditions and daily forecasts for a coordinate.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(&self, coord: Coordinate) -> Result<CurrentConditions, WeatherError>;

    /// Requests `days` daily entries. Shorter answers are returned as-is.
    async fn fetch_forecast(
        &self,
        coord: Coordinate,
        days: u8,
    ) -> Result<DailyForecast, WeatherError>;
}

/// Construct the Open-Meteo provider (geocoder and weather client in one)
/// from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenMeteoProvider> {
    config.validate()?;
    let provider = OpenMeteoProvider::builder()
        .geocoding_url(&config.geocoding_url)
        .forecast_url(&config.forecast_url)
        .language(&config.language)
        .timeout(config.request_timeout())
        .build()?;
    Ok(provider)
}
