use crate::domain::model::{
    ExportFile, ExportRequest, FileFormat, ImportBatch, ImportMode, ImportOutcome, ProductRecord,
    RowError,
};
use crate::domain::ports::ProductApi;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the admin product API. One submission per batch, no
/// retry, no idempotency key.
pub struct HttpProductApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpProductApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Serialize)]
struct ImportRequestBody<'a> {
    products: &'a [ProductRecord],
    mode: ImportMode,
}

#[derive(Deserialize)]
struct ImportResponseBody {
    success: bool,
    #[serde(default)]
    results: Option<ImportResultsBody>,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ImportResultsBody {
    total: usize,
    created: usize,
    updated: usize,
    skipped: usize,
    #[serde(default)]
    errors: Vec<RowErrorBody>,
}

#[derive(Deserialize)]
struct RowErrorBody {
    index: usize,
    #[serde(default)]
    name: String,
    #[serde(rename = "error", default)]
    message: String,
}

impl From<ImportResultsBody> for ImportOutcome {
    fn from(results: ImportResultsBody) -> Self {
        ImportOutcome {
            total: results.total,
            created: results.created,
            updated: results.updated,
            skipped: results.skipped,
            errors: results
                .errors
                .into_iter()
                .map(|row| RowError {
                    index: row.index,
                    name: row.name,
                    message: row.message,
                })
                .collect(),
        }
    }
}

/// `filename=` parameter of a Content-Disposition header value.
fn disposition_filename(response: &reqwest::Response) -> Option<String> {
    let header = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;

    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

impl HttpProductApi {
    async fn download(
        &self,
        request: reqwest::RequestBuilder,
        fallback: String,
    ) -> Result<ExportFile> {
        let response = request.timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(PipelineError::RemoteError {
                message: format!("export request failed with status {}", response.status()),
            });
        }

        let filename = disposition_filename(&response).unwrap_or(fallback);
        let bytes = response.bytes().await?.to_vec();
        tracing::debug!("Received {} ({} bytes)", filename, bytes.len());
        Ok(ExportFile { filename, bytes })
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn import_products(&self, batch: &ImportBatch) -> Result<ImportOutcome> {
        let url = self.url("/api/admin/products/import");
        let body = ImportRequestBody {
            products: batch.records(),
            mode: batch.mode(),
        };

        tracing::debug!("POST {} ({} records)", url, batch.len());
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::RemoteError {
                message: format!("import request failed with status {}", status),
            });
        }

        let parsed: ImportResponseBody = response.json().await?;
        if !parsed.success {
            let message = if parsed.message.is_empty() {
                "import rejected by server".to_string()
            } else {
                parsed.message
            };
            return Err(PipelineError::RemoteError { message });
        }

        let results = parsed.results.ok_or_else(|| PipelineError::RemoteError {
            message: "import response missing results".to_string(),
        })?;
        Ok(results.into())
    }

    async fn export_products(&self, request: &ExportRequest) -> Result<ExportFile> {
        let url = self.url("/api/admin/products/export");
        tracing::debug!("GET {} ({})", url, request.format.extension());

        let mut builder = self
            .client
            .get(url)
            .query(&[("format", request.format.extension())]);
        if let Some(category) = &request.category {
            builder = builder.query(&[("category", category.as_str())]);
        }

        self.download(
            builder,
            format!("products-export.{}", request.format.extension()),
        )
        .await
    }

    async fn export_template(&self, format: FileFormat) -> Result<ExportFile> {
        let url = self.url("/api/admin/products/export/template");
        tracing::debug!("GET {} ({})", url, format.extension());

        let builder = self
            .client
            .get(url)
            .query(&[("format", format.extension())]);

        self.download(builder, format!("products-template.{}", format.extension()))
            .await
    }
}
