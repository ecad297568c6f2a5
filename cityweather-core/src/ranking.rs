//! Cross-city rankings derived from a cache snapshot.

use crate::model::{CityKey, CurrentConditions};

/// Length of each ranking list.
pub const TOP_N: usize = 5;

/// Cities must be strictly above this wind speed (km/h) to be listed as windy.
pub const STRONG_WIND_KMH: f64 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCity {
    pub city: CityKey,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// Temperature, hottest first.
    pub hottest: Vec<RankedCity>,
    /// Temperature, coldest first.
    pub coldest: Vec<RankedCity>,
    /// Wind speed, strongest first. Empty when no city exceeds [`STRONG_WIND_KMH`].
    pub windy: Vec<RankedCity>,
}

/// Ranks a snapshot. Sorting is stable, so ties keep snapshot order.
///
/// The coldest list is the tail of the hottest-first order, reversed. With
/// fewer than [`TOP_N`] cities it therefore shares entries with `hottest`.
pub fn rank(snapshot: &[(CityKey, CurrentConditions)]) -> Ranking {
    let mut by_temp: Vec<&(CityKey, CurrentConditions)> = snapshot.iter().collect();
    by_temp.sort_by(|a, b| b.1.temperature.total_cmp(&a.1.temperature));

    let hottest = by_temp
        .iter()
        .take(TOP_N)
        .map(|(city, c)| ranked(city, c.temperature))
        .collect();

    let tail_start = by_temp.len().saturating_sub(TOP_N);
    let coldest = by_temp[tail_start..]
        .iter()
        .rev()
        .map(|(city, c)| ranked(city, c.temperature))
        .collect();

    let mut by_wind: Vec<&(CityKey, CurrentConditions)> =
        snapshot.iter().filter(|(_, c)| c.wind > STRONG_WIND_KMH).collect();
    by_wind.sort_by(|a, b| b.1.wind.total_cmp(&a.1.wind));

    let windy = by_wind.iter().take(TOP_N).map(|(city, c)| ranked(city, c.wind)).collect();

    Ranking { hottest, coldest, windy }
}

fn ranked(city: &CityKey, value: f64) -> RankedCity {
    RankedCity { city: city.clone(), value }
}
