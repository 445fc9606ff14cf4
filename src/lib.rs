pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, PipelineConfig};

pub use adapters::{CsvDecoder, InMemoryStore, NotionStore, StatementDecoder, XlsxDecoder};
pub use crate::core::etl::UploadEngine;
pub use domain::model::{BatchResponse, BatchSummary, CellValue, RawRow, Record, RowOutcome, SkipReason, Table};
pub use utils::error::{EtlError, Result};
