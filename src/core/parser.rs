use crate::domain::model::{FileFormat, RawRecord};
use crate::utils::error::{PipelineError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Resolve the declared format from a file name. Only `.json` and
/// `.csv` uploads are accepted.
pub fn format_for_path(path: &str) -> Result<FileFormat> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(FileFormat::Json),
        Some("csv") => Ok(FileFormat::Csv),
        _ => Err(PipelineError::ParseError {
            message: format!("unsupported file format: {}", path),
        }),
    }
}

/// Parse raw file text into an ordered sequence of untyped records.
pub fn parse_records(content: &str, format: FileFormat) -> Result<Vec<RawRecord>> {
    match format {
        FileFormat::Json => parse_json(content),
        FileFormat::Csv => parse_csv(content),
    }
}

/// JSON uploads are an object with a `products` array; each object
/// element becomes one record, order preserved.
fn parse_json(content: &str) -> Result<Vec<RawRecord>> {
    let root: serde_json::Value =
        serde_json::from_str(content).map_err(|e| PipelineError::ParseError {
            message: format!("invalid JSON: {}", e),
        })?;

    let products = root
        .get("products")
        .and_then(|value| value.as_array())
        .ok_or_else(|| PipelineError::ParseError {
            message: "missing products array".to_string(),
        })?;

    let mut records = Vec::with_capacity(products.len());
    for item in products {
        if let serde_json::Value::Object(fields) = item {
            let mut data = HashMap::new();
            for (key, value) in fields {
                data.insert(key.clone(), value.clone());
            }
            records.push(RawRecord { data });
        }
    }

    Ok(records)
}

/// CSV uploads: `#`-prefixed lines are comments, the first significant
/// line is the header. Rows may be shorter than the header; missing
/// trailing fields are absent rather than empty. Extra fields beyond
/// the header are dropped.
fn parse_csv(content: &str) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::ParseError {
            message: format!("malformed header row: {}", e),
        })?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| PipelineError::ParseError {
            message: format!("malformed data row: {}", e),
        })?;

        let mut data = HashMap::new();
        for (name, field) in headers.iter().zip(row.iter()) {
            data.insert(
                name.to_string(),
                serde_json::Value::String(field.to_string()),
            );
        }
        records.push(RawRecord { data });
    }

    if records.is_empty() {
        return Err(PipelineError::ParseError {
            message: "no data rows".to_string(),
        });
    }

    Ok(records)
}
