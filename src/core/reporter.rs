use crate::domain::model::{BatchSummary, RowOutcome, SkippedRow};
use crate::domain::ports::BatchObserver;
use std::sync::Arc;

/// Default observer: one tracing event per row, one per batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BatchObserver for TracingObserver {
    fn row_outcome(&self, row_index: usize, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Uploaded(record) => {
                tracing::info!(row = row_index, date = %record.iso_date(), "✅ Row uploaded")
            }
            RowOutcome::Skipped(reason) => {
                tracing::warn!(row = row_index, reason = %reason, "⏭️ Row skipped")
            }
        }
    }

    fn batch_finished(&self, summary: &BatchSummary) {
        tracing::info!(
            total_rows = summary.total_rows,
            uploaded = summary.uploaded_count,
            skipped = summary.skipped.len(),
            cancelled = summary.cancelled,
            "📊 Batch finished: {}",
            summary.message()
        );
    }
}

/// Folds row outcomes into a [`BatchSummary`], in row order.
pub struct BatchReporter {
    summary: BatchSummary,
    observer: Arc<dyn BatchObserver>,
}

impl BatchReporter {
    pub fn new(total_rows: usize, observer: Arc<dyn BatchObserver>) -> Self {
        Self {
            summary: BatchSummary::new(total_rows),
            observer,
        }
    }

    pub fn record(&mut self, row_index: usize, outcome: RowOutcome) {
        self.observer.row_outcome(row_index, &outcome);
        match outcome {
            RowOutcome::Uploaded(_) => self.summary.uploaded_count += 1,
            RowOutcome::Skipped(reason) => self.summary.skipped.push(SkippedRow { row_index, reason }),
        }
    }

    pub fn mark_cancelled(&mut self) {
        self.summary.cancelled = true;
    }

    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    pub fn finish(self) -> BatchSummary {
        self.observer.batch_finished(&self.summary);
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Record, SkipReason};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingObserver {
        rows: Mutex<Vec<usize>>,
        batches: Mutex<usize>,
    }

    impl BatchObserver for CountingObserver {
        fn row_outcome(&self, row_index: usize, _outcome: &RowOutcome) {
            self.rows.lock().unwrap().push(row_index);
        }

        fn batch_finished(&self, _summary: &BatchSummary) {
            *self.batches.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_accumulates_in_row_order() {
        let observer = Arc::new(CountingObserver::default());
        let mut reporter = BatchReporter::new(3, observer.clone());

        let record = Record {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            detail: "Abono".to_string(),
            charge_amount: 0.0,
            credit_amount: 10.0,
            balance: 10.0,
        };
        reporter.record(0, RowOutcome::Uploaded(record.clone()));
        reporter.record(1, RowOutcome::Skipped(SkipReason::EmptyDate));
        reporter.record(2, RowOutcome::Uploaded(record));

        let summary = reporter.finish();
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.uploaded_count, 2);
        assert_eq!(
            summary.skipped,
            vec![SkippedRow {
                row_index: 1,
                reason: SkipReason::EmptyDate
            }]
        );
        assert_eq!(summary.message(), "2 of 3 uploaded");
        assert_eq!(*observer.rows.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(*observer.batches.lock().unwrap(), 1);
    }
}
