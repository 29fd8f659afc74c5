//! Invoicing API Client
//!
//! JSON over HTTP with a static `key` header. Document creation returns the
//! remote id and document number; the rendered PDF becomes available with a
//! delay, so [`InvoicingClient::fetch_pdf`] retries with backoff.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::core::config::InvoicingConfig;

const PDF_ATTEMPTS: u32 = 5;
const PDF_BACKOFF_STEP_MS: u64 = 500;
const PDF_MIN_BYTES: usize = 1024;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Invalid invoice line {index}: {field} must be positive")]
    InvalidLine { index: usize, field: &'static str },

    #[error("Invoicing API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invoicing HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PDF not ready after {attempts} attempts")]
    PdfNotReady { attempts: u32 },

    #[error("Database error: {0}")]
    Database(String),
}

/// Line item on an outbound document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentItem {
    pub name: String,
    pub quantity: i64,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
    pub tax: f64,
}

#[derive(Debug, Serialize)]
pub struct DocumentRequest {
    #[serde(rename = "contactName")]
    pub contact_name: String,
    /// Unix seconds, the provider convention
    pub date: i64,
    pub items: Vec<DocumentItem>,
    #[serde(rename = "invoiceNum")]
    pub invoice_num: String,
    #[serde(rename = "approveDoc")]
    pub approve_doc: bool,
}

#[derive(Debug, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    #[serde(rename = "invoiceNum", default)]
    pub invoice_num: Option<String>,
}

/// External invoicing client
#[derive(Clone)]
pub struct InvoicingClient {
    http: reqwest::Client,
    config: InvoicingConfig,
}

impl InvoicingClient {
    pub fn new(config: InvoicingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn create_document(
        &self,
        request: &DocumentRequest,
    ) -> Result<DocumentResponse, InvoiceError> {
        let url = format!("{}/documents/invoice", self.config.base_url);
        let resp = self
            .http
            .post(&url)
            .header("key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InvoiceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }

    pub async fn pay_document(
        &self,
        external_id: &str,
        amount: f64,
        date: i64,
    ) -> Result<(), InvoiceError> {
        let url = format!("{}/documents/invoice/{external_id}/pay", self.config.base_url);
        let resp = self
            .http
            .post(&url)
            .header("key", &self.config.api_key)
            .json(&serde_json::json!({ "amount": amount, "date": date }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InvoiceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Fetch the rendered PDF. The document may not be renderable right
    /// after creation, so non-PDF or undersized responses are retried with
    /// a linearly increasing backoff. Exhausting the attempts is a
    /// distinct, retriable error; a transport failure is fatal.
    pub async fn fetch_pdf(&self, external_id: &str) -> Result<Vec<u8>, InvoiceError> {
        let url = format!("{}/documents/invoice/{external_id}/pdf", self.config.base_url);

        for attempt in 1..=PDF_ATTEMPTS {
            let resp = self
                .http
                .get(&url)
                .header("key", &self.config.api_key)
                .send()
                .await?;

            if resp.status().is_success() {
                let is_pdf = resp
                    .headers()
                    .get(http::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(|ct| ct.to_ascii_lowercase().contains("pdf"))
                    .unwrap_or(false);
                let bytes = resp.bytes().await?;

                if is_pdf && bytes.len() >= PDF_MIN_BYTES {
                    return Ok(bytes.to_vec());
                }
                tracing::debug!(
                    external_id,
                    attempt,
                    is_pdf,
                    size = bytes.len(),
                    "PDF not ready yet"
                );
            } else {
                tracing::debug!(external_id, attempt, status = %resp.status(), "PDF fetch rejected");
            }

            if attempt < PDF_ATTEMPTS {
                tokio::time::sleep(Duration::from_millis(PDF_BACKOFF_STEP_MS * attempt as u64))
                    .await;
            }
        }

        Err(InvoiceError::PdfNotReady {
            attempts: PDF_ATTEMPTS,
        })
    }
}
