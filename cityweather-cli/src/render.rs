//! Plain-text output for search results, forecasts and rankings.

use cityweather_core::{
    BatchReport, CityReport, CurrentConditions, DailyForecast, RankedCity, Ranking, SearchFailure,
};

pub fn print_city_report(report: &CityReport) {
    println!("{}", current_line(report.city.as_str(), &report.current));
    println!();
    print!("{}", forecast_table(&report.forecast));
    println!();
    print!("{}", ranking_text(&report.ranking));
}

pub fn print_failure(failure: &SearchFailure) {
    eprintln!("{}", failure.user_message());
    println!("{}: no data available.", failure.city);
    println!("Forecast unavailable.");
}

pub fn print_batch_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(city) => println!("{}", current_line(city.city.as_str(), &city.current)),
            Err(failure) => {
                println!("{}: unavailable ({})", outcome.input, failure.user_message());
            }
        }
    }
    println!();
    print!("{}", ranking_text(&report.ranking));
}

fn current_line(city: &str, current: &CurrentConditions) -> String {
    format!(
        "{city}: {:.1}°C, wind {:.1} km/h, humidity {:.1}%",
        current.temperature, current.wind, current.humidity
    )
}

fn forecast_table(forecast: &DailyForecast) -> String {
    if forecast.is_empty() {
        return "Forecast unavailable.\n".to_string();
    }

    let mut out = format!(
        "{:<12} {:>8} {:>8} {:>9}  {}\n",
        "Date", "Max", "Min", "Precip", "Conditions"
    );
    for day in forecast.days() {
        out.push_str(&format!(
            "{:<12} {:>6.1}°C {:>6.1}°C {:>6.1} mm  {}\n",
            day.date.format("%Y-%m-%d"),
            day.temp_max,
            day.temp_min,
            day.precipitation,
            describe_weather_code(day.weather_code),
        ));
    }
    out
}

fn ranking_text(ranking: &Ranking) -> String {
    let mut out = String::new();

    out.push_str("Hottest:\n");
    push_list(&mut out, &ranking.hottest, "°C");

    out.push_str("Coldest:\n");
    push_list(&mut out, &ranking.coldest, "°C");

    out.push_str("Windiest:\n");
    if ranking.windy.is_empty() {
        out.push_str("  No cities with strong wind right now.\n");
    } else {
        push_list(&mut out, &ranking.windy, " km/h");
    }

    out
}

fn push_list(out: &mut String, list: &[RankedCity], unit: &str) {
    for (i, entry) in list.iter().enumerate() {
        out.push_str(&format!("  {}. {}: {:.1}{unit}\n", i + 1, entry.city, entry.value));
    }
}

/// WMO weather interpretation codes, grouped coarsely.
fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1..=3 => "Partly cloudy",
        45..=48 => "Fog",
        51..=67 => "Light rain",
        71..=77 => "Snow",
        80..=82 => "Rain showers",
        95..=99 => "Thunderstorm",
        _ => "Cloudy",
    }
}
