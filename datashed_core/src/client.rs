//! HTTP client for the dataset catalog service
//!
//! One client implements both listing and download against the catalog's
//! JSON API:
//!
//! - `GET {base}/api/v1/datasets` — listing of all datasets with summary
//!   metadata (`instance_count` and `feature_count` are nullable)
//! - `GET {base}/api/v1/datasets/{id}` — full dataset description, stored
//!   verbatim as `description.json`
//! - `GET {base}/api/v1/datasets/{id}/file?encoding=feather|csv` — data file
//!   bytes, streamed to disk
//!
//! Timeouts are enforced here through reqwest; the refresher inherits them.

use crate::catalog::{Catalog, DatasetId, DatasetSummary};
use crate::error::{CatalogError, Error, IoError, Result};
use crate::fetch::{DatasetFetcher, StorageEncoding};
use async_trait::async_trait;
use futures::StreamExt;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Configuration for the catalog HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogClientConfig {
    /// Base URL of the catalog service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://catalog.datashed.dev".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Listing response envelope
#[derive(Debug, Deserialize)]
struct ListDatasetsResponse {
    datasets: Vec<DatasetSummary>,
}

/// Client for the catalog service, implementing listing and download
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client from configuration
    pub fn new(config: CatalogClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("datashed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Catalog(CatalogError::from_reqwest(e)))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Error::from)
    }

    /// Map a non-success response to a catalog error
    async fn status_error(id: Option<DatasetId>, response: reqwest::Response) -> Error {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Error::Catalog(CatalogError::dataset_not_found(id.0));
        }

        let message = response.text().await.unwrap_or_default();
        Error::Catalog(CatalogError::server_error(status.as_u16(), &message))
    }

    /// Stream a response body to a file
    async fn download_to(response: reqwest::Response, path: &Path) -> Result<()> {
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| IoError::from_std(e).with_path(path))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Catalog(CatalogError::from_reqwest(e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| IoError::from_std(e).with_path(path))?;
        }

        file.flush()
            .await
            .map_err(|e| IoError::from_std(e).with_path(path))?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn list_datasets(&self) -> Result<Vec<DatasetSummary>> {
        let url = self.endpoint("api/v1/datasets")?;
        debug!("Listing datasets from {url}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Catalog(CatalogError::from_reqwest(e)))?;

        if !response.status().is_success() {
            return Err(Self::status_error(None, response).await);
        }

        let listing: ListDatasetsResponse = response
            .json()
            .await
            .map_err(|e| Error::Catalog(CatalogError::from_reqwest(e)))?;

        debug!("Catalog listing returned {} datasets", listing.datasets.len());
        Ok(listing.datasets)
    }
}

#[async_trait]
impl DatasetFetcher for CatalogClient {
    async fn fetch(&self, id: DatasetId, encoding: StorageEncoding, dest: &Path) -> Result<()> {
        tokio::fs::create_dir_all(dest)
            .await
            .map_err(|e| IoError::from_std(e).with_path(dest))?;

        // Description first: a missing dataset fails before any data bytes
        // land in the entry.
        let url = self.endpoint(&format!("api/v1/datasets/{id}"))?;
        debug!("Fetching description for dataset {id}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Catalog(CatalogError::from_reqwest(e)))?;
        if !response.status().is_success() {
            return Err(Self::status_error(Some(id), response).await);
        }
        Self::download_to(response, &dest.join("description.json")).await?;

        let mut url = self.endpoint(&format!("api/v1/datasets/{id}/file"))?;
        url.query_pairs_mut()
            .append_pair("encoding", encoding.as_query_value());
        debug!("Fetching data file for dataset {id} as {encoding}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Catalog(CatalogError::from_reqwest(e)))?;
        if !response.status().is_success() {
            return Err(Self::status_error(Some(id), response).await);
        }
        Self::download_to(response, &dest.join(encoding.data_file_name())).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_invalid_base_url() {
        let config = CatalogClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };

        let result = CatalogClient::new(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_listing_response_parses_nullable_counts() {
        let body = r#"{
            "datasets": [
                {"id": 31, "name": "credit-g", "instance_count": 1000, "feature_count": 21},
                {"id": 32, "name": "pendigits", "instance_count": null, "feature_count": 17}
            ]
        }"#;

        let listing: ListDatasetsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(listing.datasets.len(), 2);
        assert_eq!(listing.datasets[0].instance_count, Some(1000));
        assert_eq!(listing.datasets[1].instance_count, None);
    }
}
