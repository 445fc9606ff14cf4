use crate::core::dispatcher::Dispatcher;
use crate::core::reporter::{BatchReporter, TracingObserver};
use crate::core::row_processor::RowProcessor;
use crate::core::schema::SchemaValidator;
use crate::core::{BatchObserver, ConfigProvider, RecordStore, Storage, TableDecoder};
use crate::domain::model::{BatchResponse, BatchSummary, RowOutcome, Table};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_upload_extension;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One upload = one batch: schema check, then row by row
/// normalize -> dispatch -> report.
pub struct UploadEngine<S, D, R, C>
where
    S: Storage,
    D: TableDecoder,
    R: RecordStore,
    C: ConfigProvider,
{
    storage: S,
    decoder: D,
    store: R,
    config: C,
    validator: SchemaValidator,
    processor: RowProcessor,
    observer: Arc<dyn BatchObserver>,
}

impl<S, D, R, C> UploadEngine<S, D, R, C>
where
    S: Storage,
    D: TableDecoder,
    R: RecordStore,
    C: ConfigProvider,
{
    pub fn new(storage: S, decoder: D, store: R, config: C) -> Self {
        let processor = RowProcessor::new(config.detail_default().to_string(), config.detail_max_len());
        Self {
            storage,
            decoder,
            store,
            config,
            validator: SchemaValidator::default(),
            processor,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the batch and folds the result into the caller-facing JSON body.
    pub async fn respond(&self, upload: Option<&str>) -> BatchResponse {
        self.respond_with_cancel(upload, CancellationToken::new()).await
    }

    pub async fn respond_with_cancel(&self, upload: Option<&str>, cancel: CancellationToken) -> BatchResponse {
        match self.run_with_cancel(upload, cancel).await {
            Ok(summary) => BatchResponse::from_summary(&summary),
            Err(e) => {
                tracing::error!(
                    "❌ Batch failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                BatchResponse::from_error(&e)
            }
        }
    }

    pub async fn run(&self, upload: Option<&str>) -> Result<BatchSummary> {
        self.run_with_cancel(upload, CancellationToken::new()).await
    }

    pub async fn run_with_cancel(
        &self,
        upload: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<BatchSummary> {
        let path = upload.filter(|p| !p.trim().is_empty()).ok_or(EtlError::MissingFile)?;
        validate_upload_extension(path, self.config.allowed_extensions())?;

        tracing::info!("📥 Reading statement: {}", path);
        let bytes = self.storage.read_file(path).await?;

        let skip_rows = self.config.skip_rows();
        let table = self.decoder.decode(path, &bytes, skip_rows)?;
        tracing::info!(
            "📋 Decoded {} rows with {} columns (skipped {} leading rows)",
            table.len(),
            table.columns.len(),
            skip_rows
        );

        self.process_table(&table, &cancel).await
    }

    /// Validates the header once, then processes rows strictly in order.
    pub async fn process_table(&self, table: &Table, cancel: &CancellationToken) -> Result<BatchSummary> {
        self.validator.validate(&table.columns)?;

        let mut reporter = BatchReporter::new(table.len(), self.observer.clone());
        let mut dispatcher = Dispatcher::new(&self.store, self.config.dispatch_delay());

        for (row_index, row) in table.rows.iter().enumerate() {
            if cancel.is_cancelled() {
                reporter.mark_cancelled();
                break;
            }

            let outcome = match self.processor.process(row) {
                Ok(record) => {
                    if !dispatcher.wait_turn(cancel).await {
                        reporter.mark_cancelled();
                        break;
                    }
                    dispatcher.dispatch(row_index, record).await
                }
                Err(reason) => RowOutcome::Skipped(reason),
            };
            reporter.record(row_index, outcome);
        }

        if reporter.summary().cancelled {
            tracing::warn!(
                "🛑 Batch cancelled after {} of {} rows",
                reporter.summary().processed_rows(),
                table.len()
            );
        }

        Ok(reporter.finish())
    }
}
