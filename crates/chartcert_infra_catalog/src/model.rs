//! Wire shapes of the catalog API. Unknown fields are ignored.

use chartcert_domain::{CatalogRepository, CatalogTag};
use serde::Deserialize;

/// Envelope of the repository listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RepositoriesBody {
    #[serde(default)]
    pub data: Vec<RepositoryEntry>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryEntry {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub vendor_label: String,
    #[serde(default)]
    pub registry: String,
}

impl From<RepositoryEntry> for CatalogRepository {
    fn from(entry: RepositoryEntry) -> Self {
        Self {
            id: entry.id,
            repository: entry.repository,
            vendor_label: entry.vendor_label,
            registry: entry.registry,
        }
    }
}

/// Envelope of the per-repository images endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ImagesBody {
    #[serde(default)]
    pub data: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ImageEntry {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub repositories: Vec<ImageRepository>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRepository {
    #[serde(default)]
    pub registry: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub tags: Vec<RepositoryTag>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryTag {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "manifest_schema1_digest", default)]
    pub digest: Option<String>,
}

impl From<RepositoryTag> for CatalogTag {
    fn from(tag: RepositoryTag) -> Self {
        Self {
            name: tag.name,
            digest: tag.digest.filter(|d| !d.is_empty()),
        }
    }
}

impl ImagesBody {
    /// Tags listed under entries for exactly this (repository, registry) pair.
    pub fn tags_for(self, repository: &str, registry: &str) -> Vec<CatalogTag> {
        self.data
            .into_iter()
            .flat_map(|image| image.repositories)
            .filter(|repo| repo.repository == repository && repo.registry == registry)
            .flat_map(|repo| repo.tags)
            .filter(|tag| !tag.name.is_empty())
            .map(CatalogTag::from)
            .collect()
    }
}
