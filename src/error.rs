//! Error types for the catalog client.

/// Errors that can occur when talking to the book catalog API.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed (DNS, connection refused, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the credentials or token (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API returned any other error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A successful response carried a body that is not JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A path parameter that cannot be sent as its own URL segment.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (bad base URL, unreadable config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// HTTP status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Convenience alias for Results using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_api_errors() {
        let err = CatalogError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(CatalogError::NotFound("/books".into()).status(), Some(404));
        assert_eq!(CatalogError::Parse("x".into()).status(), None);
        assert_eq!(CatalogError::InvalidInput("..".into()).status(), None);
    }

    #[test]
    fn test_display_includes_message() {
        let err = CatalogError::Unauthorized {
            message: "bad password".to_string(),
        };
        assert_eq!(err.to_string(), "Unauthorized: bad password");
    }
}
