use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::WeatherError, ranking::Ranking};

/// Number of daily entries requested when the caller does not say otherwise.
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions: temperature in °C, wind in km/h, relative humidity in %.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub wind: f64,
    pub humidity: f64,
}

impl CurrentConditions {
    pub fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.wind.is_finite() && self.humidity.is_finite()
    }
}

/// One row of a [`DailyForecast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precipitation: f64,
    pub weather_code: i32,
}

/// Daily forecast as parallel sequences. Index `i` of every sequence
/// describes the same day, and all sequences have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyForecast {
    dates: Vec<NaiveDate>,
    temp_max: Vec<f64>,
    temp_min: Vec<f64>,
    precipitation: Vec<f64>,
    weather_code: Vec<i32>,
}

impl DailyForecast {
    /// Builds a forecast from sequences that may disagree in length.
    ///
    /// Every sequence is cut to the shortest one and to `max_days`; nothing
    /// is padded.
    pub fn aligned(
        mut dates: Vec<NaiveDate>,
        mut temp_max: Vec<f64>,
        mut temp_min: Vec<f64>,
        mut precipitation: Vec<f64>,
        mut weather_code: Vec<i32>,
        max_days: usize,
    ) -> Self {
        let len = [
            dates.len(),
            temp_max.len(),
            temp_min.len(),
            precipitation.len(),
            weather_code.len(),
            max_days,
        ]
        .into_iter()
        .min()
        .unwrap_or(0);

        dates.truncate(len);
        temp_max.truncate(len);
        temp_min.truncate(len);
        precipitation.truncate(len);
        weather_code.truncate(len);

        Self { dates, temp_max, temp_min, precipitation, weather_code }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn temp_max(&self) -> &[f64] {
        &self.temp_max
    }

    pub fn temp_min(&self) -> &[f64] {
        &self.temp_min
    }

    pub fn precipitation(&self) -> &[f64] {
        &self.precipitation
    }

    pub fn weather_code(&self) -> &[i32] {
        &self.weather_code
    }

    pub fn days(&self) -> impl Iterator<Item = DayForecast> + '_ {
        (0..self.len()).map(|i| DayForecast {
            date: self.dates[i],
            temp_max: self.temp_max[i],
            temp_min: self.temp_min[i],
            precipitation: self.precipitation[i],
            weather_code: self.weather_code[i],
        })
    }
}

/// Normalized city name used as the cache key.
///
/// Keeps ASCII letters, the Latin-1 letter block (U+00C0..=U+00FF) and
/// whitespace; everything else is dropped and the result is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityKey(String);

impl CityKey {
    pub fn parse(raw: &str) -> Result<Self, WeatherError> {
        let normalized = normalize_city_name(raw);
        if normalized.is_empty() {
            return Err(WeatherError::validation(format!(
                "'{}' does not contain a city name",
                raw.trim()
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_city_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c) || c.is_whitespace()
}

pub fn normalize_city_name(raw: &str) -> String {
    let kept: String = raw.trim().chars().filter(|c| is_city_char(*c)).collect();
    kept.trim().to_string()
}

/// Everything a renderer needs after one successful city search.
#[derive(Debug, Clone)]
pub struct CityReport {
    pub city: CityKey,
    pub coordinate: Coordinate,
    pub current: CurrentConditions,
    pub forecast: DailyForecast,
    pub ranking: Ranking,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn city_key_keeps_accented_letters() {
        let key = CityKey::parse("  São Paulo  ").unwrap();
        assert_eq!(key.as_str(), "São Paulo");
    }

    #[test]
    fn city_key_strips_digits_and_punctuation() {
        let key = CityKey::parse("Rio de Janeiro, RJ 2025!").unwrap();
        assert_eq!(key.as_str(), "Rio de Janeiro RJ");
    }

    #[test]
    fn city_key_rejects_whitespace_only() {
        let err = CityKey::parse("   ").unwrap_err();
        assert!(matches!(err, WeatherError::Validation { .. }));
    }

    #[test]
    fn city_key_rejects_input_without_letters() {
        assert!(CityKey::parse("12345").is_err());
        assert!(CityKey::parse("! !").is_err());
    }

    #[test]
    fn inputs_with_same_letters_collide() {
        assert_eq!(CityKey::parse("Curitiba").unwrap(), CityKey::parse(" Curitiba42 ").unwrap());
    }

    #[test]
    fn aligned_truncates_to_shortest_sequence() {
        let forecast = DailyForecast::aligned(
            vec![date(1), date(2), date(3)],
            vec![30.0, 31.0, 32.0],
            vec![20.0, 21.0],
            vec![0.0, 1.5, 2.0],
            vec![0, 3, 61],
            7,
        );

        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast.temp_max(), &[30.0, 31.0]);
        assert_eq!(forecast.weather_code(), &[0, 3]);
    }

    #[test]
    fn aligned_with_missing_field_is_empty() {
        let forecast = DailyForecast::aligned(
            vec![date(1)],
            vec![30.0],
            vec![20.0],
            Vec::new(),
            vec![0],
            7,
        );
        assert!(forecast.is_empty());
        assert_eq!(forecast.days().count(), 0);
    }

    #[test]
    fn days_rows_line_up_by_index() {
        let forecast = DailyForecast::aligned(
            vec![date(1), date(2)],
            vec![30.0, 25.0],
            vec![20.0, 15.0],
            vec![0.0, 4.2],
            vec![1, 80],
            7,
        );

        let days: Vec<_> = forecast.days().collect();
        assert_eq!(days[1].date, date(2));
        assert_eq!(days[1].temp_max, 25.0);
        assert_eq!(days[1].temp_min, 15.0);
        assert_eq!(days[1].precipitation, 4.2);
        assert_eq!(days[1].weather_code, 80);
    }

    #[test]
    fn aligned_respects_requested_days() {
        let dates: Vec<_> = (1..=10).map(date).collect();
        let values = vec![1.0; 10];
        let forecast = DailyForecast::aligned(
            dates,
            values.clone(),
            values.clone(),
            values,
            vec![0; 10],
            7,
        );
        assert_eq!(forecast.len(), 7);
    }
}
