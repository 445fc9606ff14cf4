use crate::domain::model::{CellValue, RawRow, Table};
use crate::domain::ports::TableDecoder;
use crate::utils::error::Result;

/// Decodes a delimited statement export into a [`Table`].
///
/// Every non-blank cell is kept as text; typing is left to the normalizers.
/// Fully blank rows (trailing filler in bank exports) are dropped.
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    delimiter: u8,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDecoder {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl TableDecoder for CsvDecoder {
    fn decode(&self, _file_name: &str, bytes: &[u8], skip_rows: usize) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(bytes);

        let mut records = reader.records().skip(skip_rows);

        let columns: Vec<String> = match records.next() {
            Some(header) => header?
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                .collect(),
            None => {
                tracing::warn!("Statement has no header row after skipping {} rows", skip_rows);
                return Ok(Table::default());
            }
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let row: RawRow = columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let cell = match record.get(i) {
                        Some(s) if !s.trim().is_empty() => CellValue::Text(s.to_string()),
                        _ => CellValue::Empty,
                    };
                    (name.clone(), cell)
                })
                .collect();
            rows.push(row);
        }

        tracing::debug!("Decoded {} data rows", rows.len());
        Ok(Table::new(columns, rows))
    }
}
