use crate::domain::model::{ImportBatch, ImportMode, ImportPreview, ProductRecord};

/// How many records the confirmation preview shows.
pub const PREVIEW_SAMPLE_SIZE: usize = 5;

/// Build a batch from coerced records. Records failing the required
/// field gate (non-empty name, present price) are silently excluded;
/// per-item outcomes are only reported at submission time.
pub fn build_batch(records: Vec<ProductRecord>, mode: ImportMode) -> ImportBatch {
    let accepted = records
        .into_iter()
        .filter(ProductRecord::is_valid)
        .collect();
    ImportBatch::new(accepted, mode)
}

/// Read-only projection of a batch for user confirmation. Deterministic
/// for the same batch; does not mutate it.
pub fn preview(batch: &ImportBatch) -> ImportPreview {
    ImportPreview {
        sample: batch
            .records()
            .iter()
            .take(PREVIEW_SAMPLE_SIZE)
            .cloned()
            .collect(),
        total_count: batch.len(),
        is_valid: batch.is_valid(),
    }
}
