use crate::client::ErrorResult;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CensysError {
    #[error("Invalid field for {endpoint}/{index}: {field}")]
    InvalidField {
        endpoint: String,
        index: String,
        field: String,
    },

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Page numbers start at 1 (got {0})")]
    InvalidPage(u32),

    #[error("Missing key in search result: {0}")]
    MissingKey(String),

    #[error("Error ({code}): {message}")]
    Search { code: u16, message: String },

    #[error("Censys success results must have a 200 response code (not {0})")]
    InvalidResultCode(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CensysError>;

impl From<reqwest::Error> for CensysError {
    fn from(e: reqwest::Error) -> Self {
        CensysError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for CensysError {
    fn from(e: serde_json::Error) -> Self {
        CensysError::Json(e.to_string())
    }
}

impl From<ErrorResult> for CensysError {
    fn from(result: ErrorResult) -> Self {
        CensysError::Search {
            code: result.code(),
            message: result.message().to_string(),
        }
    }
}

impl CensysError {
    /// HTTP status code reported by the API, for errors that came from an
    /// error response.
    pub fn code(&self) -> Option<u16> {
        match self {
            CensysError::Search { code, .. } => Some(*code),
            CensysError::InvalidResultCode(code) => Some(*code),
            _ => None,
        }
    }

    /// Whether this error was raised locally before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CensysError::InvalidField { .. }
                | CensysError::FieldNotFound(_)
                | CensysError::InvalidPage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_error_from_error_result() {
        let result = ErrorResult::new(
            403,
            json!({"error": "Unauthorized.  You must authenticate with an API ID and secret.", "error_code": 403}),
        );
        let err = CensysError::from(result);

        assert_eq!(err.code(), Some(403));
        assert_eq!(
            err.to_string(),
            "Error (403): Unauthorized.  You must authenticate with an API ID and secret."
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_invalid_field_message_names_context() {
        let err = CensysError::InvalidField {
            endpoint: "SEARCH".to_string(),
            index: "IPV4".to_string(),
            field: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid field for SEARCH/IPV4: bogus");
        assert!(err.is_validation());
        assert_eq!(err.code(), None);
    }
}
