//! Drives city searches: validate, geocode, fetch, commit, rank.
//!
//! A single search either commits a city to the cache or reports a
//! [`SearchFailure`]. Batches run searches one at a time, paced by a
//! [`Throttle`], and never stop on a failed city.

use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cache::CityCache,
    error::WeatherError,
    model::{CityKey, CityReport, DEFAULT_FORECAST_DAYS},
    provider::{GeoResolver, WeatherClient},
    ranking::{self, Ranking},
    throttle::Throttle,
};

/// Where a search is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Validating,
    Resolving,
    Fetching,
    Committing,
    Done,
}

impl SearchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStage::Validating => "validating",
            SearchStage::Resolving => "resolving",
            SearchStage::Fetching => "fetching",
            SearchStage::Committing => "committing",
            SearchStage::Done => "done",
        }
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search that ended in the failed state. Nothing was committed.
#[derive(Debug, Error)]
#[error("search for '{city}' failed while {stage}: {error}")]
pub struct SearchFailure {
    /// Trimmed user input, or the normalized key once validation passed.
    pub city: String,
    pub stage: SearchStage,
    #[source]
    pub error: WeatherError,
}

impl SearchFailure {
    fn new(city: impl Into<String>, stage: SearchStage, error: WeatherError) -> Self {
        Self { city: city.into(), stage, error }
    }

    pub fn user_message(&self) -> String {
        self.error.user_message()
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub input: String,
    pub result: Result<CityReport, SearchFailure>,
}

/// Per-city outcomes in input order, plus the ranking after the last commit.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    pub ranking: Ranking,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    resolver: Arc<dyn GeoResolver>,
    client: Arc<dyn WeatherClient>,
    cache: Arc<CityCache>,
    throttle: Throttle,
    forecast_days: u8,
}

impl BatchOrchestrator {
    pub fn new(
        resolver: Arc<dyn GeoResolver>,
        client: Arc<dyn WeatherClient>,
        cache: Arc<CityCache>,
    ) -> Self {
        Self {
            resolver,
            client,
            cache,
            throttle: Throttle::default(),
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn cache(&self) -> &Arc<CityCache> {
        &self.cache
    }

    /// Ranking over everything committed so far.
    pub fn ranking(&self) -> Ranking {
        ranking::rank(&self.cache.snapshot())
    }

    /// Look up one city and commit its current conditions.
    ///
    /// Current conditions and forecast are fetched concurrently; both must
    /// succeed for anything to be committed.
    pub async fn search(&self, raw: &str) -> Result<CityReport, SearchFailure> {
        let input = raw.trim();
        debug!(input, stage = %SearchStage::Validating, "Starting city search");

        let city = CityKey::parse(raw)
            .map_err(|error| SearchFailure::new(input, SearchStage::Validating, error))?;

        debug!(city = %city, stage = %SearchStage::Resolving, "Resolving city");
        let coordinate = match self.resolver.resolve(city.as_str()).await {
            Ok(coordinate) => coordinate,
            Err(error) => {
                warn!(city = %city, kind = error.kind(), %error, "Could not resolve city");
                return Err(SearchFailure::new(
                    city.as_str(),
                    SearchStage::Resolving,
                    WeatherError::city_not_found(city.as_str()),
                ));
            }
        };

        debug!(city = %city, %coordinate, stage = %SearchStage::Fetching, "Fetching weather");
        let (current, forecast) = tokio::join!(
            self.client.fetch_current(coordinate),
            self.client.fetch_forecast(coordinate, self.forecast_days),
        );

        let (current, forecast) = match (current, forecast) {
            (Ok(current), Ok(forecast)) => (current, forecast),
            (Err(error), forecast) => {
                if let Err(other) = forecast {
                    debug!(city = %city, kind = other.kind(), error = %other, "Forecast also failed");
                }
                return Err(SearchFailure::new(city.as_str(), SearchStage::Fetching, error));
            }
            (Ok(_), Err(error)) => {
                debug!(city = %city, "Discarding current conditions, forecast failed");
                return Err(SearchFailure::new(city.as_str(), SearchStage::Fetching, error));
            }
        };

        debug!(city = %city, stage = %SearchStage::Committing, "Committing city");
        self.cache.put(city.clone(), current);
        let ranking = self.ranking();

        info!(
            city = %city,
            temperature = current.temperature,
            wind = current.wind,
            forecast_days = forecast.len(),
            cached = self.cache.len(),
            "City committed"
        );

        Ok(CityReport { city, coordinate, current, forecast, ranking })
    }

    /// Search each city in turn. A failed city is logged and skipped.
    pub async fn run_batch<I, S>(&self, cities: I) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outcomes = Vec::new();

        for city in cities {
            let input = city.as_ref();
            self.throttle.wait().await;

            let result = self.search(input).await;
            if let Err(failure) = &result {
                warn!(
                    city = %failure.city,
                    stage = %failure.stage,
                    error = %failure.error,
                    "Skipping city in batch"
                );
            }

            outcomes.push(BatchOutcome { input: input.to_string(), result });
        }

        let report = BatchReport { outcomes, ranking: self.ranking() };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        report
    }
}
