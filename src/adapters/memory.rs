use crate::domain::model::Record;
use crate::domain::ports::RecordStore;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Record store kept in process memory. Backs `--dry-run` and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<Record>>,
    create_calls: AtomicUsize,
    fail_on_detail: Option<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any record whose detail equals `detail`.
    pub fn fail_on(mut self, detail: &str) -> Self {
        self.fail_on_detail = Some(detail.to_string());
        self
    }

    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn create(&self, record: &Record) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_detail.as_deref() == Some(record.detail.as_str()) {
            return Err(EtlError::StoreError {
                status: 400,
                message: format!("rejected record '{}'", record.detail),
            });
        }

        let mut records = self.records.lock().map_err(|_| EtlError::ProcessingError {
            message: "in-memory store lock poisoned".to_string(),
        })?;
        records.push(record.clone());
        Ok(())
    }
}
