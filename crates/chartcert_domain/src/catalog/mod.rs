use async_trait::async_trait;
use chartcert_common::diagnostic::Diagnosable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One repository row returned by a repository lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRepository {
    pub id: String,
    pub repository: String,
    pub vendor_label: String,
    pub registry: String,
}

/// A tag published for a specific (registry, repository) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTag {
    pub name: String,
    pub digest: Option<String>,
}

impl CatalogTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            digest: None,
        }
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),
    #[error("Registry not found: {0}")]
    RegistryNotFound(String),
    #[error("Bad response code {status} from catalog request: {url}")]
    BadStatus { status: u16, url: String },
    #[error("Catalog request failed: {0}")]
    Transport(String),
    #[error("Catalog request timed out: {0}")]
    Timeout(String),
    #[error("Failed to decode catalog response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("Catalog request cancelled")]
    Cancelled,
}

/// Whether a catalog failure is a definitive answer or a failure to get one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorKind {
    NotFound,
    Unavailable,
}

impl CatalogError {
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            Self::RepositoryNotFound(_) | Self::RegistryNotFound(_) => CatalogErrorKind::NotFound,
            _ => CatalogErrorKind::Unavailable,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == CatalogErrorKind::NotFound
    }
}

impl Diagnosable for CatalogError {
    fn code(&self) -> String {
        match self.kind() {
            CatalogErrorKind::NotFound => "CATALOG_NOT_FOUND",
            CatalogErrorKind::Unavailable => "CATALOG_UNAVAILABLE",
        }
        .to_string()
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::RepositoryNotFound(_) => Some("Register the image repository in the catalog or reference a catalogued repository.".to_string()),
            Self::BadStatus { .. } | Self::Transport(_) | Self::Timeout(_) => Some("Check network access to the catalog service and retry.".to_string()),
            Self::Decode { .. } => Some("The catalog returned an unexpected payload. Verify the configured catalog URL.".to_string()),
            _ => None,
        }
    }
}

/// Read-only view of the image catalog.
///
/// Implementations perform one request per call and must not cache: every
/// certification run sees the catalog as it is at that moment.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Registries that host `repository`, in catalog order.
    ///
    /// Fails with [`CatalogError::RepositoryNotFound`] when the catalog has no
    /// entry for the repository.
    async fn list_registries_for_repository(&self, repository: &str) -> Result<Vec<String>, CatalogError>;

    /// Tags published for exactly this (repository, registry) pair.
    async fn list_tags(&self, repository: &str, registry: &str) -> Result<Vec<CatalogTag>, CatalogError>;

    /// Every repository path the catalog knows for `registry`.
    async fn list_all_repositories(&self, registry: &str, page_size: usize) -> Result<Vec<String>, CatalogError>;
}
