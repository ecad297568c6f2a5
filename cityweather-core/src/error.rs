use thiserror::Error;

/// Failure kinds of a single city lookup.
///
/// `NotFound` is what the geocoder reports; the orchestrator collapses any
/// resolver failure into `CityNotFound` before it reaches the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Input rejected before any request was made.
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The geocoding provider returned no match.
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    /// User-facing form of any resolver failure.
    #[error("City not found: {city}")]
    CityNotFound { city: String },

    /// Provider answered, but without the section we need.
    #[error("Weather data unavailable: {message}")]
    DataUnavailable { message: String },

    /// Network failure, timeout or non-success status.
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl WeatherError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound { query: query.into() }
    }

    pub fn city_not_found<S: Into<String>>(city: S) -> Self {
        Self::CityNotFound { city: city.into() }
    }

    pub fn data_unavailable<S: Into<String>>(message: S) -> Self {
        Self::DataUnavailable { message: message.into() }
    }

    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::Validation { .. } => "validation",
            WeatherError::NotFound { .. } => "not_found",
            WeatherError::CityNotFound { .. } => "city_not_found",
            WeatherError::DataUnavailable { .. } => "data_unavailable",
            WeatherError::Transport { .. } => "transport",
        }
    }

    /// Message suitable for showing to the person who typed the city name.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Validation { .. } => "Please enter a valid city name.".to_string(),
            WeatherError::NotFound { .. } | WeatherError::CityNotFound { .. } => {
                "City not found.".to_string()
            }
            WeatherError::DataUnavailable { .. } => {
                "Weather data is currently unavailable for this city.".to_string()
            }
            WeatherError::Transport { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("request timed out: {err}"))
        } else {
            Self::transport(err.to_string())
        }
    }
}
