//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and weather provider contracts, with an Open-Meteo implementation
//! - The per-city cache and cross-city rankings
//! - The orchestrator that runs single searches and paced batches
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod ranking;
pub mod throttle;

pub use cache::CityCache;
pub use config::Config;
pub use error::WeatherError;
pub use model::{CityKey, CityReport, Coordinate, CurrentConditions, DailyForecast, DayForecast};
pub use orchestrator::{BatchOrchestrator, BatchOutcome, BatchReport, SearchFailure, SearchStage};
pub use provider::{GeoResolver, WeatherClient, open_meteo::OpenMeteoProvider, provider_from_config};
pub use ranking::{RankedCity, Ranking, rank};
pub use throttle::Throttle;
