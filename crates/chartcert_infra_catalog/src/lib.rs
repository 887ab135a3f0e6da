//! HTTP access to the image catalog service.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use error::ClientError;
