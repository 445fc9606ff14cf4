use crate::domain::model::{Record, RowOutcome, SkipReason};
use crate::domain::ports::RecordStore;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Sends records one at a time with a fixed minimum gap between calls.
/// The gap runs from the end of one store call to the start of the next.
///
/// Store failures are turned into `Skipped(DispatchFailed)` and never
/// propagate. Nothing is deduplicated: dispatching the same record twice
/// creates two remote records.
pub struct Dispatcher<R: RecordStore> {
    store: R,
    delay: Duration,
    last_dispatch: Option<Instant>,
}

impl<R: RecordStore> Dispatcher<R> {
    pub fn new(store: R, delay: Duration) -> Self {
        Self {
            store,
            delay,
            last_dispatch: None,
        }
    }

    /// Waits out the remainder of the inter-dispatch gap.
    /// Returns `false` if `cancel` fired first.
    pub async fn wait_turn(&self, cancel: &CancellationToken) -> bool {
        let Some(last) = self.last_dispatch else {
            return !cancel.is_cancelled();
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep_until(last + self.delay) => true,
        }
    }

    pub async fn dispatch(&mut self, row_index: usize, record: Record) -> RowOutcome {
        if let Some(last) = self.last_dispatch {
            tokio::time::sleep_until(last + self.delay).await;
        }
        let result = self.store.create(&record).await;
        self.last_dispatch = Some(Instant::now());

        match result {
            Ok(()) => {
                tracing::debug!(row = row_index, date = %record.iso_date(), "📤 Record created");
                RowOutcome::Uploaded(record)
            }
            Err(e) => {
                // the observer reports the skip, this only keeps the raw error
                tracing::debug!(row = row_index, error = %e, "Record store rejected row");
                RowOutcome::Skipped(SkipReason::DispatchFailed(e.to_string()))
            }
        }
    }
}
