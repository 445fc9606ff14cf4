use crate::domain::model::{CellValue, RawRow, Table};
use crate::domain::ports::TableDecoder;
use crate::utils::error::Result;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use std::io::Cursor;

/// Decodes the first worksheet of an Excel statement into a [`Table`].
///
/// Cells keep the type the workbook gives them: date-formatted cells arrive as
/// dates, plain numbers as numbers. `skip_rows` counts from the top of the
/// sheet, including blank rows above the first used cell.
#[derive(Debug, Clone, Default)]
pub struct XlsxDecoder;

impl XlsxDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl TableDecoder for XlsxDecoder {
    fn decode(&self, _file_name: &str, bytes: &[u8], skip_rows: usize) -> Result<Table> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => {
                tracing::warn!("Workbook has no worksheets");
                return Ok(Table::default());
            }
        };

        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows_iter = range
            .rows()
            .enumerate()
            .filter(|(i, _)| first_row + i >= skip_rows)
            .map(|(_, cells)| cells);

        let columns: Vec<String> = match rows_iter.next() {
            Some(header) => header.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
            None => {
                tracing::warn!("Worksheet has no header row after skipping {} rows", skip_rows);
                return Ok(Table::default());
            }
        };

        let mut rows = Vec::new();
        for cells in rows_iter {
            let values: Vec<CellValue> = cells.iter().map(cell_value).collect();
            if values.iter().all(CellValue::is_empty) {
                continue;
            }

            let row: RawRow = columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), values.get(i).cloned().unwrap_or(CellValue::Empty)))
                .collect();
            rows.push(row);
        }

        tracing::debug!("Decoded {} worksheet rows", rows.len());
        Ok(Table::new(columns, rows))
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(n) => CellValue::Number(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Number(dt.as_f64()),
        },
        // ISO strings only show up in strict-mode workbooks
        Data::DateTimeIso(s) => chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::DateTime)
            .or_else(|_| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map(CellValue::Date))
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
