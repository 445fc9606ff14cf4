use crate::adapters::csv_decoder::CsvDecoder;
use crate::adapters::xlsx_decoder::XlsxDecoder;
use crate::domain::model::Table;
use crate::domain::ports::TableDecoder;
use crate::utils::error::Result;
use std::path::Path;

/// Picks the workbook or the delimited-text decoder from the upload's extension.
#[derive(Debug, Clone, Default)]
pub struct StatementDecoder {
    csv: CsvDecoder,
    xlsx: XlsxDecoder,
}

impl StatementDecoder {
    pub fn new(csv: CsvDecoder) -> Self {
        Self {
            csv,
            xlsx: XlsxDecoder::new(),
        }
    }

    fn is_workbook(file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm"))
            .unwrap_or(false)
    }
}

impl TableDecoder for StatementDecoder {
    fn decode(&self, file_name: &str, bytes: &[u8], skip_rows: usize) -> Result<Table> {
        if Self::is_workbook(file_name) {
            self.xlsx.decode(file_name, bytes, skip_rows)
        } else {
            self.csv.decode(file_name, bytes, skip_rows)
        }
    }
}
