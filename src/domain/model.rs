use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const COL_DATE: &str = "Fecha";
pub const COL_DETAIL: &str = "Detalle";
pub const COL_CHARGE: &str = "Monto cargo ($)";
pub const COL_CREDIT: &str = "Monto abono ($)";
pub const COL_BALANCE: &str = "Saldo ($)";

/// 必要欄位，順序與範本相同
pub const REQUIRED_COLUMNS: [&str; 5] = [COL_DATE, COL_DETAIL, COL_CHARGE, COL_CREDIT, COL_BALANCE];

/// A single untyped cell as produced by a table decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Null, blank text, or NaN all count as "no value".
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One source row: column name -> cell, in header order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    /// Missing columns read as `CellValue::Empty`.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.cells
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Decoded table handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalized five-field record written to the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub date: NaiveDate,
    pub detail: String,
    pub charge_amount: f64,
    pub credit_amount: f64,
    pub balance: f64,
}

impl Record {
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Why a row was skipped. Never escalated past the row boundary.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum SkipReason {
    #[error("empty date")]
    EmptyDate,

    #[error("invalid date format: '{0}'")]
    InvalidDateFormat(String),

    #[error("invalid date type: '{0}'")]
    InvalidDateType(String),

    #[error("invalid numeric value '{value}' in '{field}'")]
    InvalidNumeric { field: String, value: String },

    #[error("dispatch failed: {0}")]
    DispatchFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Uploaded(Record),
    Skipped(SkipReason),
}

impl RowOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, RowOutcome::Uploaded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub row_index: usize,
    pub reason: SkipReason,
}

/// Per-batch tally. Appended in row order, owned by one batch invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub uploaded_count: usize,
    pub skipped: Vec<SkippedRow>,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Default::default()
        }
    }

    /// Rows that reached a terminal outcome.
    pub fn processed_rows(&self) -> usize {
        self.uploaded_count + self.skipped.len()
    }

    pub fn message(&self) -> String {
        format!("{} of {} uploaded", self.uploaded_count, self.total_rows)
    }
}

/// JSON body returned to the caller. The status travels alongside the body,
/// never inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Success {
        message: String,
    },
    Failure {
        error: String,
        #[serde(skip)]
        status: u16,
    },
}

impl BatchResponse {
    pub fn from_summary(summary: &BatchSummary) -> Self {
        BatchResponse::Success {
            message: summary.message(),
        }
    }

    pub fn from_error(error: &crate::utils::error::EtlError) -> Self {
        BatchResponse::Failure {
            error: error.to_string(),
            status: error.status_code(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchResponse::Success { .. })
    }

    /// 200 for a finished batch, otherwise the status of the batch-fatal error.
    pub fn status_code(&self) -> u16 {
        match self {
            BatchResponse::Success { .. } => 200,
            BatchResponse::Failure { status, .. } => *status,
        }
    }
}
