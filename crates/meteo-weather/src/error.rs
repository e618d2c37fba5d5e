//! Lookup error types.

use thiserror::Error;

/// Result type for weather lookups.
pub type Result<T> = std::result::Result<T, WeatherError>;

/// Domain-level lookup failures.
///
/// The tool layer renders these as text inside a successful tool result,
/// so the `Display` strings are user-facing.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Geocoding returned no candidates or failed.
    #[error("Location '{0}' not found")]
    NotFound(String),

    /// Upstream answered with a non-success status.
    #[error("Failed to fetch {what} data: {status}")]
    Status {
        /// Which payload was requested ("weather" or "forecast").
        what: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A field the report needs is absent from the upstream payload.
    #[error("missing field '{0}' in upstream response")]
    MissingField(String),

    /// A configured endpoint is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl WeatherError {
    /// Create a not-found error for a query.
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound(query.into())
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            WeatherError::not_found("Atlantis").to_string(),
            "Location 'Atlantis' not found"
        );
        assert_eq!(
            WeatherError::Status {
                what: "forecast",
                status: 503
            }
            .to_string(),
            "Failed to fetch forecast data: 503"
        );
    }
}
