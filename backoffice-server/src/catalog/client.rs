//! Catalog API Client
//!
//! Thin reqwest wrapper over the external e-commerce catalog. Credentials
//! travel as `consumer_key` / `consumer_secret` query parameters on every
//! request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::CatalogConfig;

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Product as the remote catalog represents it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price as a decimal string, the remote convention
    #[serde(default)]
    pub regular_price: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub categories: Vec<RemoteCategory>,
    #[serde(default)]
    pub images: Vec<RemoteImage>,
    #[serde(default)]
    pub attributes: Vec<RemoteAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCategory {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteImage {
    pub src: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAttribute {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Outbound product payload for create/update
#[derive(Debug, Clone, Serialize)]
pub struct RemoteProductPush {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub regular_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub manage_stock: bool,
    pub stock_quantity: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<RemoteCategory>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<RemoteAttribute>,
}

#[derive(Debug, Serialize)]
struct BatchRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    update: Vec<BatchStatusUpdate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    delete: Vec<i64>,
}

#[derive(Debug, Serialize)]
struct BatchStatusUpdate {
    id: i64,
    status: String,
}

/// External catalog client
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Underlying HTTP client, shared with image mirroring
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("consumer_key", self.config.key.as_str()),
            ("consumer_secret", self.config.secret.as_str()),
        ]
    }

    async fn check<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<T>().await?)
    }

    /// One page of remote products; an empty page means the end was reached
    pub async fn list_products(&self, page: u32) -> Result<Vec<RemoteProduct>, CatalogError> {
        let url = format!("{}/products", self.config.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&self.auth())
            .query(&[("page", page), ("per_page", PAGE_SIZE)])
            .send()
            .await?;
        Self::check(resp).await
    }

    /// All remote products, paging until a short page
    pub async fn list_all_products(&self) -> Result<Vec<RemoteProduct>, CatalogError> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.list_products(page).await?;
            let len = batch.len();
            all.extend(batch);
            if len < PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
        Ok(all)
    }

    pub async fn create_product(
        &self,
        payload: &RemoteProductPush,
    ) -> Result<RemoteProduct, CatalogError> {
        let url = format!("{}/products", self.config.base_url);
        let resp = self
            .http
            .post(&url)
            .query(&self.auth())
            .json(payload)
            .send()
            .await?;
        Self::check(resp).await
    }

    pub async fn update_product(
        &self,
        external_id: i64,
        payload: &RemoteProductPush,
    ) -> Result<RemoteProduct, CatalogError> {
        let url = format!("{}/products/{external_id}", self.config.base_url);
        let resp = self
            .http
            .put(&url)
            .query(&self.auth())
            .json(payload)
            .send()
            .await?;
        Self::check(resp).await
    }

    /// Hard delete; when the remote refuses, fall back to a batch status
    /// update moving the record to "trash". Either outcome counts as success.
    pub async fn delete_product(&self, external_id: i64) -> Result<(), CatalogError> {
        let url = format!("{}/products/{external_id}", self.config.base_url);
        let resp = self
            .http
            .delete(&url)
            .query(&self.auth())
            .query(&[("force", "true")])
            .send()
            .await?;

        if resp.status().is_success() {
            return Ok(());
        }
        tracing::debug!(external_id, status = %resp.status(), "Hard delete refused, trashing");

        let batch_url = format!("{}/products/batch", self.config.base_url);
        let body = BatchRequest {
            update: vec![BatchStatusUpdate {
                id: external_id,
                status: "trash".to_string(),
            }],
            delete: Vec::new(),
        };
        let resp = self
            .http
            .post(&batch_url)
            .query(&self.auth())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
