use crate::error::ClientError;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://catalog.redhat.com/api/containers/v1/repositories";
pub const DEFAULT_API_KEY: &str = "RedHatChartVerifier";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PAGE_SIZE: usize = 500;

pub const ENV_CATALOG_URL: &str = "CHARTCERT_CATALOG_URL";
pub const ENV_API_KEY: &str = "CHARTCERT_CATALOG_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "CHARTCERT_CATALOG_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "CHARTCERT_CATALOG_PAGE_SIZE";

/// Where the catalog lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Repositories endpoint; the other endpoints hang below it.
    pub base_url: String,
    pub api_key: String,
    /// Upper bound for a single request, connection included.
    pub timeout: Duration,
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `CHARTCERT_CATALOG_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_CATALOG_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            config.api_key = key;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ClientError::InvalidConfig(format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT_SECS, secs)))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            config.page_size = size
                .trim()
                .parse()
                .map_err(|_| ClientError::InvalidConfig(format!("{} must be a number, got '{}'", ENV_PAGE_SIZE, size)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!("catalog URL must be http(s): '{}'", self.base_url)));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        if self.page_size == 0 {
            return Err(ClientError::InvalidConfig("page size must be greater than zero".to_string()));
        }
        Ok(())
    }
}
