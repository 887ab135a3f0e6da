use chartcert_common::diagnostic::Diagnosable;
use chartcert_domain::CatalogError;
use thiserror::Error;

/// Failures while setting up a catalog client. Request-time failures are
/// reported as [`CatalogError`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid catalog API key: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
    #[error("Invalid catalog configuration: {0}")]
    InvalidConfig(String),
}

impl Diagnosable for ClientError {
    fn code(&self) -> String {
        match self {
            Self::InvalidApiKey(_) => "CATALOG_INVALID_API_KEY",
            Self::Build(_) => "CATALOG_CLIENT_BUILD_FAILED",
            Self::InvalidConfig(_) => "CATALOG_INVALID_CONFIG",
        }
        .to_string()
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidApiKey(_) => Some("The API key must be printable ASCII.".to_string()),
            Self::InvalidConfig(_) => Some("Check the CHARTCERT_CATALOG_* environment variables.".to_string()),
            Self::Build(_) => None,
        }
    }
}

pub(crate) fn transport_error(url: &str, error: reqwest::Error) -> CatalogError {
    if error.is_timeout() {
        CatalogError::Timeout(url.to_string())
    } else {
        CatalogError::Transport(format!("{}: {}", url, error))
    }
}

pub(crate) fn decode_error(url: &str, error: serde_json::Error) -> CatalogError {
    CatalogError::Decode {
        url: url.to_string(),
        reason: error.to_string(),
    }
}
