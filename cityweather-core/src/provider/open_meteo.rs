use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{Coordinate, CurrentConditions, DailyForecast},
};

use super::{GeoResolver, WeatherClient};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_LANGUAGE: &str = "pt";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m,relative_humidity_2m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

/// Open-Meteo geocoding and forecast APIs. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
    language: String,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoProviderBuilder {
    geocoding_url: String,
    forecast_url: String,
    language: String,
    timeout: Duration,
}

impl Default for OpenMeteoProviderBuilder {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenMeteoProviderBuilder {
    pub fn geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    pub fn forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenMeteoProvider, WeatherError> {
        let http = Client::builder().timeout(self.timeout).build()?;
        Ok(OpenMeteoProvider {
            http,
            geocoding_url: self.geocoding_url,
            forecast_url: self.forecast_url,
            language: self.language,
        })
    }
}

impl OpenMeteoProvider {
    pub fn builder() -> OpenMeteoProviderBuilder {
        OpenMeteoProviderBuilder::default()
    }

    /// Provider with the public endpoints and default settings.
    pub fn new() -> Result<Self, WeatherError> {
        Self::builder().build()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, WeatherError> {
        debug!(url, what, "Sending Open-Meteo request");

        let res = self.http.get(url).query(query).send().await.map_err(|e| {
            WeatherError::transport(format!("failed to send {what} request: {e}"))
        })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::transport(format!("failed to read {what} response: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::transport(format!(
                "{what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::data_unavailable(format!("malformed {what} response: {e}")))
    }
}

fn coordinate_query(coord: Coordinate) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", coord.latitude.to_string()),
        ("longitude", coord.longitude.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Option<CurrentSection>,
}

#[derive(Debug, Deserialize)]
struct CurrentSection {
    temperature_2m: f64,
    wind_speed_10m: f64,
    relative_humidity_2m: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailySection>,
}

/// Every field is optional on its own; a missing one becomes empty.
/// Elements may be `null` for days the provider has no value for.
#[derive(Debug, Deserialize)]
struct DailySection {
    time: Option<Vec<Option<NaiveDate>>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    precipitation_sum: Option<Vec<Option<f64>>>,
    weathercode: Option<Vec<Option<i32>>>,
}

/// Leading values of a daily field, up to its first `null`.
fn until_gap<T>(field: Option<Vec<Option<T>>>) -> Vec<T> {
    field.unwrap_or_default().into_iter().map_while(|value| value).collect()
}

#[async_trait]
impl GeoResolver for OpenMeteoProvider {
    async fn resolve(&self, city_name: &str) -> Result<Coordinate, WeatherError> {
        let name = city_name.trim();
        let query = [
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", self.language.clone()),
            ("format", "json".to_string()),
        ];

        let parsed: GeocodingResponse = self.get_json(&self.geocoding_url, &query, "geocoding").await?;

        let first = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::not_found(name))?;

        debug!(
            query = name,
            matched = first.name.as_deref().unwrap_or("?"),
            latitude = first.latitude,
            longitude = first.longitude,
            "Geocoded city"
        );

        Ok(Coordinate::new(first.latitude, first.longitude))
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoProvider {
    async fn fetch_current(&self, coord: Coordinate) -> Result<CurrentConditions, WeatherError> {
        let mut query = coordinate_query(coord);
        query.push(("current", CURRENT_FIELDS.to_string()));
        query.push(("timezone", "auto".to_string()));

        let parsed: CurrentResponse = self.get_json(&self.forecast_url, &query, "current").await?;

        let current = parsed
            .current
            .ok_or_else(|| WeatherError::data_unavailable("response has no current section"))?;

        let conditions = CurrentConditions {
            temperature: current.temperature_2m,
            wind: current.wind_speed_10m,
            humidity: current.relative_humidity_2m,
        };

        if !conditions.is_finite() {
            return Err(WeatherError::data_unavailable("current conditions are not finite"));
        }

        Ok(conditions)
    }

    async fn fetch_forecast(
        &self,
        coord: Coordinate,
        days: u8,
    ) -> Result<DailyForecast, WeatherError> {
        let mut query = coordinate_query(coord);
        query.push(("daily", DAILY_FIELDS.to_string()));
        query.push(("timezone", "auto".to_string()));
        query.push(("forecast_days", days.to_string()));

        let parsed: ForecastResponse = self.get_json(&self.forecast_url, &query, "forecast").await?;

        let daily = parsed
            .daily
            .ok_or_else(|| WeatherError::data_unavailable("response has no daily section"))?;

        let dates = until_gap(daily.time);
        let temp_max = until_gap(daily.temperature_2m_max);
        let temp_min = until_gap(daily.temperature_2m_min);
        let precipitation = until_gap(daily.precipitation_sum);
        let weather_code = until_gap(daily.weathercode);

        let lengths = [
            dates.len(),
            temp_max.len(),
            temp_min.len(),
            precipitation.len(),
            weather_code.len(),
        ];
        if lengths.iter().any(|&len| len != lengths[0]) {
            debug!(?lengths, "Daily sequences differ in length, truncating to shortest");
        }

        Ok(DailyForecast::aligned(
            dates,
            temp_max,
            temp_min,
            precipitation,
            weather_code,
            usize::from(days),
        ))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
