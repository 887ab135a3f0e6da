use crate::config::CatalogConfig;
use crate::error::{decode_error, transport_error, ClientError};
use crate::model::{ImagesBody, RepositoriesBody};
use async_trait::async_trait;
use chartcert_domain::{CatalogError, CatalogRepository, CatalogSource, CatalogTag};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-api-key";

// Bound on pages fetched by a bulk listing, in case the service ignores `page`.
const MAX_PAGES: usize = 200;

/// Client for the catalog's repository and image endpoints.
///
/// Holds only immutable configuration and reqwest's connection pool, so one
/// client may serve concurrent certification runs.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        let mut api_key = header::HeaderValue::from_str(&config.api_key)?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    fn repositories_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn images_url(&self, repository: &str, registry: &str) -> String {
        format!(
            "{}/registry/{}/repository/{}/images",
            self.repositories_url(),
            registry,
            repository
        )
    }

    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, CatalogError> {
        debug!(url, ?query, "Querying catalog");
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(CatalogError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await.map_err(|e| transport_error(url, e))?;
        Ok(body.to_vec())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, CatalogError> {
        let body = self.fetch(url, query).await?;
        serde_json::from_slice(&body).map_err(|e| decode_error(url, e))
    }

    /// Full catalog rows for `repository`.
    pub async fn lookup_repository(&self, repository: &str) -> Result<Vec<CatalogRepository>, CatalogError> {
        let url = self.repositories_url();
        let query = [("filter", format!("repository=={}", repository))];
        let body: RepositoriesBody = self.fetch_json(url, &query).await?;

        if body.data.is_empty() {
            return Err(CatalogError::RepositoryNotFound(repository.to_string()));
        }
        Ok(body.data.into_iter().map(CatalogRepository::from).collect())
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn list_registries_for_repository(&self, repository: &str) -> Result<Vec<String>, CatalogError> {
        let rows = self.lookup_repository(repository).await?;
        Ok(rows.into_iter().map(|row| row.registry).collect())
    }

    async fn list_tags(&self, repository: &str, registry: &str) -> Result<Vec<CatalogTag>, CatalogError> {
        let url = self.images_url(repository, registry);
        let query = [(
            "filter",
            format!("repositories=em=(repository=={};registry=={})", repository, registry),
        )];
        let body: ImagesBody = self.fetch_json(&url, &query).await?;

        if body.data.is_empty() {
            return Err(CatalogError::RegistryNotFound(registry.to_string()));
        }
        Ok(body.tags_for(repository, registry))
    }

    async fn list_all_repositories(&self, registry: &str, page_size: usize) -> Result<Vec<String>, CatalogError> {
        let url = self.repositories_url();
        let page_size = if page_size == 0 { self.config.page_size } else { page_size };
        let mut repositories = Vec::new();

        for page in 0..MAX_PAGES {
            let query = [
                ("page_size", page_size.to_string()),
                ("page", page.to_string()),
                ("filter", format!("registry=={}", registry)),
            ];
            let body = self.fetch(url, &query).await?;

            // Bulk discovery is best effort: an undecodable page ends the listing.
            let body: RepositoriesBody = match serde_json::from_slice(&body) {
                Ok(body) => body,
                Err(e) => {
                    warn!(url, page, error = %e, "Discarding undecodable repository page");
                    break;
                }
            };

            let received = body.data.len();
            repositories.extend(body.data.into_iter().map(|entry| entry.repository));

            let exhausted = body.total.map_or(false, |total| repositories.len() >= total);
            if received < page_size || exhausted {
                break;
            }
        }

        Ok(repositories)
    }
}
