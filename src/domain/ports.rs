use crate::domain::model::{ExportFile, ExportRequest, FileFormat, ImportBatch, ImportOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn output_path(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
}

/// The remote admin API. Create-vs-update semantics live behind this
/// boundary, selected by the batch mode.
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn import_products(&self, batch: &ImportBatch) -> Result<ImportOutcome>;
    async fn export_products(&self, request: &ExportRequest) -> Result<ExportFile>;
    async fn export_template(&self, format: FileFormat) -> Result<ExportFile>;
}
