//! CLI command implementations.

pub mod admin;
pub mod products;

use clave_compas_storefront::catalog::{CatalogClient, CatalogError};
use clave_compas_storefront::config::{CatalogConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur before a command reaches the catalog.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Build a catalog client from `CLAVE_API_URL`, loading `.env` first.
pub fn client() -> Result<CatalogClient, SetupError> {
    dotenvy::dotenv().ok();
    client_from_env()
}

fn client_from_env() -> Result<CatalogClient, SetupError> {
    let config = CatalogConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Using catalog");
    Ok(CatalogClient::new(&config)?)
}
