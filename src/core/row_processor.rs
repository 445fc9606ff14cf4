use crate::core::normalize::{coerce_number, normalize_date, sanitize_text, DEFAULT_DETAIL, MAX_DETAIL_LEN};
use crate::domain::model::{
    RawRow, Record, SkipReason, COL_BALANCE, COL_CHARGE, COL_CREDIT, COL_DATE, COL_DETAIL,
};
use chrono::NaiveDate;

/// Stages a row passes through before it becomes a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowState {
    Pending,
    DateChecked { date: NaiveDate },
    DetailChecked { date: NaiveDate, detail: String },
    NumbersChecked {
        date: NaiveDate,
        detail: String,
        amounts: Amounts,
    },
    RecordReady(Record),
}

/// Charge, credit and balance after coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amounts {
    pub charge: f64,
    pub credit: f64,
    pub balance: f64,
}

/// Composes the field normalizers. A failing stage short-circuits the row;
/// sibling rows are never affected.
#[derive(Debug, Clone)]
pub struct RowProcessor {
    detail_default: String,
    detail_max_len: usize,
}

impl Default for RowProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL.to_string(), MAX_DETAIL_LEN)
    }
}

impl RowProcessor {
    pub fn new(detail_default: String, detail_max_len: usize) -> Self {
        Self {
            detail_default,
            detail_max_len,
        }
    }

    pub fn process(&self, row: &RawRow) -> Result<Record, SkipReason> {
        let mut state = RowState::Pending;
        loop {
            state = match self.advance(state, row)? {
                RowState::RecordReady(record) => return Ok(record),
                next => next,
            };
        }
    }

    /// Runs the next stage.
    pub fn advance(&self, state: RowState, row: &RawRow) -> Result<RowState, SkipReason> {
        match state {
            RowState::Pending => Ok(RowState::DateChecked {
                date: normalize_date(row.get(COL_DATE))?,
            }),
            RowState::DateChecked { date } => Ok(RowState::DetailChecked {
                date,
                detail: sanitize_text(row.get(COL_DETAIL), &self.detail_default, self.detail_max_len),
            }),
            RowState::DetailChecked { date, detail } => Ok(RowState::NumbersChecked {
                date,
                detail,
                amounts: Amounts {
                    charge: coerce_number(COL_CHARGE, row.get(COL_CHARGE))?,
                    credit: coerce_number(COL_CREDIT, row.get(COL_CREDIT))?,
                    balance: coerce_number(COL_BALANCE, row.get(COL_BALANCE))?,
                },
            }),
            RowState::NumbersChecked {
                date,
                detail,
                amounts,
            } => Ok(RowState::RecordReady(Record {
                date,
                detail,
                charge_amount: amounts.charge,
                credit_amount: amounts.credit,
                balance: amounts.balance,
            })),
            done @ RowState::RecordReady(_) => Ok(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CellValue;

    fn row(date: CellValue, detail: &str, charge: CellValue, credit: CellValue, balance: CellValue) -> RawRow {
        vec![
            (COL_DATE, date),
            (COL_DETAIL, CellValue::Text(detail.to_string())),
            (COL_CHARGE, charge),
            (COL_CREDIT, credit),
            (COL_BALANCE, balance),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_valid_row_becomes_record() {
        let processor = RowProcessor::default();
        let record = processor
            .process(&row(
                CellValue::Text("15-03-2024".into()),
                "  Compra   supermercado ",
                CellValue::Number(25990.0),
                CellValue::Empty,
                CellValue::Text("1200000".into()),
            ))
            .unwrap();

        assert_eq!(record.iso_date(), "2024-03-15");
        assert_eq!(record.detail, "Compra supermercado");
        assert_eq!(record.charge_amount, 25990.0);
        assert_eq!(record.credit_amount, 0.0);
        assert_eq!(record.balance, 1_200_000.0);
    }

    #[test]
    fn test_date_failure_short_circuits() {
        let processor = RowProcessor::default();
        // numbers are also bad, but the date stage fails first
        let result = processor.process(&row(
            CellValue::Empty,
            "x",
            CellValue::Text("abc".into()),
            CellValue::Empty,
            CellValue::Empty,
        ));
        assert_eq!(result, Err(SkipReason::EmptyDate));
    }

    #[test]
    fn test_numeric_failure_names_field() {
        let processor = RowProcessor::default();
        let result = processor.process(&row(
            CellValue::Text("2024-03-15".into()),
            "x",
            CellValue::Empty,
            CellValue::Text("12,5".into()),
            CellValue::Empty,
        ));
        assert_eq!(
            result,
            Err(SkipReason::InvalidNumeric {
                field: COL_CREDIT.to_string(),
                value: "12,5".to_string(),
            })
        );
    }

    #[test]
    fn test_stage_sequence() {
        let processor = RowProcessor::default();
        let raw = row(
            CellValue::Text("2024-01-31".into()),
            "",
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
        );

        let state = processor.advance(RowState::Pending, &raw).unwrap();
        assert!(matches!(state, RowState::DateChecked { .. }));
        let state = processor.advance(state, &raw).unwrap();
        assert_eq!(
            state,
            RowState::DetailChecked {
                date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                detail: "Sin detalle".to_string(),
            }
        );
        let state = processor.advance(state, &raw).unwrap();
        assert!(matches!(
            state,
            RowState::NumbersChecked {
                amounts: Amounts { charge, credit, balance },
                ..
            } if charge == 0.0 && credit == 0.0 && balance == 0.0
        ));
        let state = processor.advance(state, &raw).unwrap();
        let record = match state {
            RowState::RecordReady(record) => record,
            other => panic!("expected a finished record, got {:?}", other),
        };
        assert_eq!(record.detail, "Sin detalle");

        // terminal stage is stable
        let again = processor.advance(RowState::RecordReady(record.clone()), &raw).unwrap();
        assert_eq!(again, RowState::RecordReady(record));
    }
}
