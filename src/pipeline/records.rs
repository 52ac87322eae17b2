//! Sheet to JSON record conversion
//!
//! The first row of a sheet supplies the field names; every row below it
//! becomes one record. Records keep header order so the serialized output is
//! stable between runs.

use std::collections::HashSet;

use calamine::{Data, DataType};
use serde_json::{Map, Number, Value};

use super::error::ConvertError;
use super::loader::{Sheet, Workbook};

/// One data row keyed by header label
pub type Record = Map<String, Value>;

/// Rendering used for every date cell
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Label given to blank header cells (`__EMPTY`, `__EMPTY_1`, ...)
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Convert every row below the header into a record.
///
/// The number of records always equals [`Sheet::data_row_count`]. Cells that
/// are missing or empty become `null`.
pub fn sheet_to_records(sheet: &Sheet) -> Vec<Record> {
    let headers = header_labels(sheet);

    sheet
        .rows()
        .skip(1)
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(col, label)| {
                    let value = row.get(col).map(cell_to_value).unwrap_or(Value::Null);
                    (label.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// Header labels for a sheet, one per column of its used range.
///
/// Labels are used verbatim. Blank cells get `__EMPTY` names and repeated
/// labels get a numeric suffix so no column is lost.
pub fn header_labels(sheet: &Sheet) -> Vec<String> {
    let Some(header_row) = sheet.rows().next() else {
        return Vec::new();
    };

    let mut seen = HashSet::with_capacity(header_row.len());
    header_row
        .iter()
        .map(|cell| {
            let base = match header_text(cell) {
                Some(text) => text,
                None => EMPTY_HEADER.to_string(),
            };
            unique_label(base, &mut seen)
        })
        .collect()
}

fn unique_label(base: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(base.clone()) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}_{}", base, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn header_text(cell: &Data) -> Option<String> {
    match cell_to_value(cell) {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Map a single cell to its JSON value
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        // Durations have no calendar date; keep the day count
        Data::DateTime(dt) if dt.is_duration() => float_value(dt.as_f64()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => Value::String(date.format(DATE_FORMAT).to_string()),
            None => fallback_date_value(cell),
        },
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(e.to_string()),
    }
}

// Whole floats are written as integers, like a spreadsheet displays them
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 {
        Value::Number(Number::from(f as i64))
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

// Serials and ISO strings chrono cannot place on a calendar
fn fallback_date_value(cell: &Data) -> Value {
    match cell {
        Data::DateTime(dt) => float_value(dt.as_f64()),
        Data::DateTimeIso(s) => Value::String(s.clone()),
        _ => Value::Null,
    }
}

impl Workbook {
    /// Convert the named sheet to records
    pub fn records_for(&self, sheet_name: &str) -> Result<Vec<Record>, ConvertError> {
        let sheet = self.sheet(sheet_name).ok_or_else(|| ConvertError::Convert {
            sheet: sheet_name.to_string(),
            message: "sheet is listed in the workbook but has no cell data".to_string(),
        })?;
        Ok(sheet_to_records(sheet))
    }
}
