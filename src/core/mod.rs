pub mod batch;
pub mod coerce;
pub mod parser;
pub mod session;

pub use crate::domain::model::{
    ExportFile, ExportRequest, FileFormat, ImportBatch, ImportMode, ImportOutcome, ImportPreview,
    ProductRecord, RawRecord, RowError,
};
pub use crate::domain::ports::{ConfigProvider, ProductApi, Storage};
pub use crate::utils::error::Result;
