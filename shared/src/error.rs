//! Errors raised while validating forecast inputs

use thiserror::Error;

/// Forecast input errors
///
/// The simulation kernel itself never fails; these come from validation
/// and parsing at the edges.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Weather series is empty")]
    EmptyWeather,

    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}

impl ForecastError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ForecastError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending input, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            ForecastError::InvalidInput { field, .. } => Some(field),
            ForecastError::EmptyWeather => Some("weather"),
            ForecastError::UnknownStage(_) => Some("stage"),
        }
    }
}
