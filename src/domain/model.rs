use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One parsed row, before coercion. Values keep whatever shape the
/// source file gave them (string, number, boolean, nested list).
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub data: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
}

/// Typed product fields. Coercion is partial, so every field is
/// optional at the struct level; absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub images: Vec<ProductImage>,
}

impl ProductRecord {
    /// A record may enter a batch iff `name` is non-empty and `price`
    /// is present. Price 0 is allowed.
    pub fn is_valid(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty()) && self.price.is_some()
    }
}

/// Whether the remote should only create new products or also update
/// existing ones (matched by slug).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    Create,
    Upsert,
}

/// Input and export file formats accepted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
        }
    }
}

/// The set of valid records built from one uploaded file, submitted as
/// a single remote operation. Immutable once built.
#[derive(Debug, Clone)]
pub struct ImportBatch {
    records: Vec<ProductRecord>,
    mode: ImportMode,
}

impl ImportBatch {
    pub(crate) fn new(records: Vec<ProductRecord>, mode: ImportMode) -> Self {
        Self { records, mode }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A batch with zero accepted records is invalid as a whole.
    pub fn is_valid(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Bounded sample of a batch shown to the user before commit.
#[derive(Debug, Clone)]
pub struct ImportPreview {
    pub sample: Vec<ProductRecord>,
    pub total_count: usize,
    pub is_valid: bool,
}

/// Per-record failure reported by the remote inside an otherwise
/// successful submission. `index` is the 0-based batch index.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub index: usize,
    pub name: String,
    pub message: String,
}

/// Aggregated result of one batch submission, built atomically from
/// the remote response.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: FileFormat,
    pub category: Option<String>,
}

/// A server-rendered snapshot file as received from the remote.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}
