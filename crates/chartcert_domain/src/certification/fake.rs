//! In-memory catalog used by the certification tests.

use crate::catalog::{CatalogError, CatalogSource, CatalogTag};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeCatalog {
    registries: HashMap<String, Vec<String>>,
    tags: HashMap<(String, String), Vec<CatalogTag>>,
    registries_error: Option<CatalogError>,
    tags_error: Option<CatalogError>,
    hang: bool,
    registry_lookups: Mutex<usize>,
    tag_lookups: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_repository(mut self, repository: &str, registries: &[&str]) -> Self {
        self.registries.insert(
            repository.to_string(),
            registries.iter().map(|r| r.to_string()).collect(),
        );
        self
    }

    pub fn with_tags(mut self, repository: &str, registry: &str, tags: &[&str]) -> Self {
        self.tags.insert(
            (repository.to_string(), registry.to_string()),
            tags.iter().map(|t| CatalogTag::new(*t)).collect(),
        );
        self
    }

    pub fn with_catalog_tags(mut self, repository: &str, registry: &str, tags: Vec<CatalogTag>) -> Self {
        self.tags.insert((repository.to_string(), registry.to_string()), tags);
        self
    }

    pub fn failing_registries(mut self, error: CatalogError) -> Self {
        self.registries_error = Some(error);
        self
    }

    pub fn failing_tags(mut self, error: CatalogError) -> Self {
        self.tags_error = Some(error);
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn registry_lookups(&self) -> usize {
        *self.registry_lookups.lock().unwrap()
    }

    pub fn tag_lookups(&self) -> Vec<String> {
        self.tag_lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn list_registries_for_repository(&self, repository: &str) -> Result<Vec<String>, CatalogError> {
        *self.registry_lookups.lock().unwrap() += 1;
        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some(e) = &self.registries_error {
            return Err(e.clone());
        }
        self.registries
            .get(repository)
            .cloned()
            .ok_or_else(|| CatalogError::RepositoryNotFound(repository.to_string()))
    }

    async fn list_tags(&self, repository: &str, registry: &str) -> Result<Vec<CatalogTag>, CatalogError> {
        self.tag_lookups.lock().unwrap().push(registry.to_string());
        if let Some(e) = &self.tags_error {
            return Err(e.clone());
        }
        self.tags
            .get(&(repository.to_string(), registry.to_string()))
            .cloned()
            .ok_or_else(|| CatalogError::RegistryNotFound(registry.to_string()))
    }

    async fn list_all_repositories(&self, registry: &str, _page_size: usize) -> Result<Vec<String>, CatalogError> {
        if let Some(e) = &self.registries_error {
            return Err(e.clone());
        }
        let mut repositories: Vec<String> = self
            .tags
            .keys()
            .filter(|(_, r)| r == registry)
            .map(|(repository, _)| repository.clone())
            .collect();
        repositories.sort();
        Ok(repositories)
    }
}
