// Adapters layer: concrete implementations of the domain ports.

pub mod csv_decoder;
pub mod memory;
pub mod notion;
pub mod statement_decoder;
pub mod xlsx_decoder;

pub use csv_decoder::CsvDecoder;
pub use memory::InMemoryStore;
pub use notion::NotionStore;
pub use statement_decoder::StatementDecoder;
pub use xlsx_decoder::XlsxDecoder;
