use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
}

/// Record construction and validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Confidence {value} is outside [0.0, 1.0]")]
    ConfidenceOutOfRange { value: f64 },
}

/// Pathway store persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// LLM API errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Web extraction errors
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid query format: {query} (use 'KEGG:pathway_id' or 'WP:pathway_id')")]
    InvalidQuery { query: String },

    #[error("Source unreachable: {url} - {message}")]
    Unreachable { url: String, message: String },

    #[error("Content not found on {url}: {what}")]
    ContentNotFound { url: String, what: String },
}

/// LLM discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to parse discovery response: {message}")]
    Parse { message: String },

    #[error("Failed to write transcript {}: {source}", .path.display())]
    Transcript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Result type alias for extraction
pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing key");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MissingField {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: id");

        let err = ValidationError::MissingFields {
            fields: vec!["id".to_string(), "compounds".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required fields: id, compounds");

        let err = ValidationError::ConfidenceOutOfRange { value: 1.5 };
        assert_eq!(err.to_string(), "Confidence 1.5 is outside [0.0, 1.0]");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Io {
            path: PathBuf::from("data/pathways.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "I/O error on data/pathways.json: denied");
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Unavailable {
            message: "server down".to_string(),
            retries: 3,
        };
        assert_eq!(err.to_string(), "LLM unavailable: server down (retries: 3)");

        let err = LlmError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - unauthorized");

        let err = LlmError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_scrape_error_display() {
        let err = ScrapeError::InvalidQuery {
            query: "glycolysis".to_string(),
        };
        assert!(err.to_string().contains("KEGG:pathway_id"));

        let err = ScrapeError::ContentNotFound {
            url: "https://example.org/p".to_string(),
            what: "pathway title".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Content not found on https://example.org/p: pathway title"
        );
    }

    #[test]
    fn test_validation_error_conversion_to_app_error() {
        let err = ValidationError::MissingField {
            field: "name".to_string(),
        };
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Validation(_)));
        assert!(app_err.to_string().contains("name"));
    }

    #[test]
    fn test_llm_error_conversion_to_app_error() {
        let app_err: AppError = LlmError::Timeout { timeout_ms: 1000 }.into();
        assert!(matches!(app_err, AppError::Llm(_)));
    }

    #[test]
    fn test_discovery_error_conversion_to_app_error() {
        let app_err: AppError = DiscoveryError::Parse {
            message: "no pathways".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Discovery(_)));
    }
}
