pub mod dispatcher;
pub mod etl;
pub mod normalize;
pub mod reporter;
pub mod row_processor;
pub mod schema;

pub use crate::domain::model::{BatchSummary, Record, RowOutcome, SkipReason, Table};
pub use crate::domain::ports::{BatchObserver, ConfigProvider, RecordStore, Storage, TableDecoder};
pub use crate::utils::error::Result;
