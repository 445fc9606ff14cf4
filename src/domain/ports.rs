use crate::domain::model::{BatchSummary, Record, RowOutcome, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Turns an uploaded spreadsheet into a [`Table`], dropping `skip_rows`
/// leading title rows before the header. `file_name` is the upload's name,
/// for decoders that pick a format from it.
pub trait TableDecoder: Send + Sync {
    fn decode(&self, file_name: &str, bytes: &[u8], skip_rows: usize) -> Result<Table>;
}

/// Remote record store. One call creates exactly one external record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, record: &Record) -> Result<()>;
}

#[async_trait]
impl<'a, T: RecordStore + ?Sized> RecordStore for &'a T {
    async fn create(&self, record: &Record) -> Result<()> {
        (**self).create(record).await
    }
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    async fn create(&self, record: &Record) -> Result<()> {
        (**self).create(record).await
    }
}

pub trait BatchObserver: Send + Sync {
    fn row_outcome(&self, row_index: usize, outcome: &RowOutcome);
    fn batch_finished(&self, summary: &BatchSummary);
}

pub trait ConfigProvider: Send + Sync {
    fn skip_rows(&self) -> usize;
    fn dispatch_delay(&self) -> std::time::Duration;
    fn allowed_extensions(&self) -> &[String];
    fn detail_default(&self) -> &str;
    fn detail_max_len(&self) -> usize;
}
