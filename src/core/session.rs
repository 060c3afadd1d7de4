use crate::core::{batch, coerce, parser};
use crate::domain::model::{
    FileFormat, ImportBatch, ImportMode, ImportOutcome, ImportPreview,
};
use crate::domain::ports::ProductApi;
use crate::utils::error::{PipelineError, Result};

/// Import flow states. `Parsed` with an invalid batch is terminal
/// until `reset`; `Submitting -> Completed` is the only transition
/// that mutates remote state.
#[derive(Debug)]
pub enum ImportState {
    NoFile,
    FileSelected {
        filename: String,
        content: String,
        format: FileFormat,
    },
    Parsed {
        batch: ImportBatch,
    },
    Submitting,
    Completed {
        outcome: ImportOutcome,
    },
    Failed {
        message: String,
    },
}

impl ImportState {
    fn label(&self) -> &'static str {
        match self {
            ImportState::NoFile => "no file",
            ImportState::FileSelected { .. } => "file selected",
            ImportState::Parsed { .. } => "parsed",
            ImportState::Submitting => "submitting",
            ImportState::Completed { .. } => "completed",
            ImportState::Failed { .. } => "failed",
        }
    }
}

/// Drives one file through select -> parse -> preview -> submit as
/// explicit commands over `ImportState`. The session owns its batch
/// exclusively; commands out of order are state errors.
pub struct ImportSession {
    state: ImportState,
    mode: ImportMode,
}

impl ImportSession {
    pub fn new(mode: ImportMode) -> Self {
        Self {
            state: ImportState::NoFile,
            mode,
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    /// Accept an uploaded file. The format is declared by the file
    /// extension; anything but `.json`/`.csv` is rejected here.
    pub fn select_file(&mut self, filename: &str, content: String) -> Result<()> {
        if !matches!(self.state, ImportState::NoFile) {
            return Err(self.unexpected_command("select_file"));
        }

        let format = parser::format_for_path(filename)?;
        tracing::debug!("Selected {} ({} input)", filename, format.extension());
        self.state = ImportState::FileSelected {
            filename: filename.to_string(),
            content,
            format,
        };
        Ok(())
    }

    /// Parse, coerce and validate the selected file, producing the
    /// confirmation preview. On a parse failure the session moves to
    /// `Failed` and a new file must be selected after `reset`.
    pub fn parse(&mut self) -> Result<ImportPreview> {
        let (filename, content, format) =
            match std::mem::replace(&mut self.state, ImportState::NoFile) {
                ImportState::FileSelected {
                    filename,
                    content,
                    format,
                } => (filename, content, format),
                other => {
                    self.state = other;
                    return Err(self.unexpected_command("parse"));
                }
            };

        let raw = match parser::parse_records(&content, format) {
            Ok(raw) => raw,
            Err(e) => {
                self.state = ImportState::Failed {
                    message: e.to_string(),
                };
                return Err(e);
            }
        };

        let coerced = raw.iter().map(coerce::coerce_record).collect();
        let batch = batch::build_batch(coerced, self.mode);
        tracing::info!(
            "Parsed {}: {} rows, {} valid",
            filename,
            raw.len(),
            batch.len()
        );

        let preview = batch::preview(&batch);
        self.state = ImportState::Parsed { batch };
        Ok(preview)
    }

    /// Re-derive the confirmation preview from the parsed batch.
    pub fn preview(&self) -> Result<ImportPreview> {
        match &self.state {
            ImportState::Parsed { batch } => Ok(batch::preview(batch)),
            _ => Err(self.unexpected_command("preview")),
        }
    }

    /// Submit the batch to the remote import operation. Blocked while
    /// the batch has zero valid records. There is no retry and no
    /// idempotency key; repeating the command after a failure issues a
    /// fresh, independent submission.
    pub async fn submit<A: ProductApi>(&mut self, api: &A) -> Result<ImportOutcome> {
        let batch = match std::mem::replace(&mut self.state, ImportState::Submitting) {
            ImportState::Parsed { batch } if batch.is_valid() => batch,
            ImportState::Parsed { batch } => {
                // Terminal until reset: keep the parsed (invalid) batch.
                self.state = ImportState::Parsed { batch };
                return Err(PipelineError::ValidationError {
                    message: "batch has no valid records".to_string(),
                });
            }
            other => {
                self.state = other;
                return Err(self.unexpected_command("submit"));
            }
        };

        tracing::info!("Submitting {} records ({:?})", batch.len(), batch.mode());
        match api.import_products(&batch).await {
            Ok(outcome) => {
                tracing::info!(
                    "Import finished: {} created, {} updated, {} skipped, {} errors",
                    outcome.created,
                    outcome.updated,
                    outcome.skipped,
                    outcome.errors.len()
                );
                self.state = ImportState::Completed {
                    outcome: outcome.clone(),
                };
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Import submission failed: {}", e);
                self.state = ImportState::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Return to `NoFile`, discarding any parsed batch or outcome.
    pub fn reset(&mut self) {
        self.state = ImportState::NoFile;
    }

    fn unexpected_command(&self, command: &str) -> PipelineError {
        PipelineError::StateError {
            message: format!("{} not allowed while {}", command, self.state.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ExportFile, ExportRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted remote API; records the batches it receives.
    struct MockApi {
        outcome: Result<ImportOutcome>,
        submitted: Mutex<Vec<(usize, ImportMode)>>,
    }

    impl MockApi {
        fn succeeding(outcome: ImportOutcome) -> Self {
            Self {
                outcome: Ok(outcome),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(PipelineError::RemoteError {
                    message: message.to_string(),
                }),
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProductApi for MockApi {
        async fn import_products(&self, batch: &ImportBatch) -> Result<ImportOutcome> {
            self.submitted
                .lock()
                .unwrap()
                .push((batch.len(), batch.mode()));
            match &self.outcome {
                Ok(outcome) => Ok(outcome.clone()),
                Err(e) => Err(PipelineError::RemoteError {
                    message: e.to_string(),
                }),
            }
        }

        async fn export_products(&self, _request: &ExportRequest) -> Result<ExportFile> {
            unimplemented!("not exercised by session tests")
        }

        async fn export_template(&self, _format: FileFormat) -> Result<ExportFile> {
            unimplemented!("not exercised by session tests")
        }
    }

    fn outcome(created: usize, updated: usize) -> ImportOutcome {
        ImportOutcome {
            total: created + updated,
            created,
            updated,
            skipped: 0,
            errors: Vec::new(),
        }
    }

    const CSV: &str = "name,price\nWidget,10\nGadget,20\n";

    #[tokio::test]
    async fn full_flow_reaches_completed() {
        let api = MockApi::succeeding(outcome(2, 0));
        let mut session = ImportSession::new(ImportMode::Upsert);

        session.select_file("products.csv", CSV.to_string()).unwrap();
        let preview = session.parse().unwrap();
        assert_eq!(preview.total_count, 2);
        assert!(preview.is_valid);

        let outcome = session.submit(&api).await.unwrap();
        assert_eq!(outcome.created, 2);
        assert!(matches!(session.state(), ImportState::Completed { .. }));
        assert_eq!(*api.submitted.lock().unwrap(), vec![(2, ImportMode::Upsert)]);
    }

    #[tokio::test]
    async fn commands_out_of_order_are_state_errors() {
        let api = MockApi::succeeding(outcome(0, 0));
        let mut session = ImportSession::new(ImportMode::Create);

        assert!(matches!(
            session.parse(),
            Err(PipelineError::StateError { .. })
        ));
        assert!(matches!(
            session.submit(&api).await,
            Err(PipelineError::StateError { .. })
        ));
        assert!(matches!(
            session.preview(),
            Err(PipelineError::StateError { .. })
        ));

        session.select_file("products.csv", CSV.to_string()).unwrap();
        assert!(matches!(
            session.select_file("other.csv", CSV.to_string()),
            Err(PipelineError::StateError { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_batch_blocks_submission_until_reset() {
        let api = MockApi::succeeding(outcome(0, 0));
        let mut session = ImportSession::new(ImportMode::Upsert);

        // Rows all missing a price: parse succeeds, batch is invalid.
        session
            .select_file("products.csv", "name,stock\nWidget,4\n".to_string())
            .unwrap();
        let preview = session.parse().unwrap();
        assert!(!preview.is_valid);
        assert_eq!(preview.total_count, 0);

        let err = session.submit(&api).await.unwrap_err();
        assert!(matches!(err, PipelineError::ValidationError { .. }));
        // Terminal until reset: still parsed, nothing was submitted.
        assert!(matches!(session.state(), ImportState::Parsed { .. }));
        assert!(api.submitted.lock().unwrap().is_empty());

        session.reset();
        assert!(matches!(session.state(), ImportState::NoFile));
        session.select_file("products.csv", CSV.to_string()).unwrap();
    }

    #[tokio::test]
    async fn parse_failure_moves_to_failed() {
        let mut session = ImportSession::new(ImportMode::Upsert);
        session
            .select_file("products.json", "{\"items\": []}".to_string())
            .unwrap();

        let err = session.parse().unwrap_err();
        assert!(err.to_string().contains("missing products array"));
        assert!(matches!(session.state(), ImportState::Failed { .. }));
    }

    #[tokio::test]
    async fn remote_failure_moves_to_failed_with_no_outcome() {
        let api = MockApi::failing("connection refused");
        let mut session = ImportSession::new(ImportMode::Upsert);

        session.select_file("products.csv", CSV.to_string()).unwrap();
        session.parse().unwrap();

        let err = session.submit(&api).await.unwrap_err();
        assert!(matches!(err, PipelineError::RemoteError { .. }));
        assert!(matches!(session.state(), ImportState::Failed { .. }));
    }

    #[test]
    fn unsupported_extension_is_rejected_at_selection() {
        let mut session = ImportSession::new(ImportMode::Upsert);
        let err = session
            .select_file("products.xlsx", String::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::ParseError { .. }));
        assert!(matches!(session.state(), ImportState::NoFile));
    }
}
