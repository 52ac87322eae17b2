//! Workbook loader for Excel and CSV files

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;

use super::error::ConvertError;
use super::input::extension_of;

/// Sheet name used for CSV sources, which have no sheets of their own
pub const CSV_SHEET_NAME: &str = "Sheet1";

/// A named cell grid. Row 0 is the header row.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub range: Range<Data>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// Build a sheet from row vectors. Short rows are padded with empty cells.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let range = if height == 0 || width == 0 {
            Range::empty()
        } else {
            let mut range = Range::new((0, 0), ((height - 1) as u32, (width - 1) as u32));
            for (r, row) in rows.into_iter().enumerate() {
                for (c, cell) in row.into_iter().enumerate() {
                    range.set_value((r as u32, c as u32), cell);
                }
            }
            range
        };

        Self::new(name, range)
    }

    /// (rows, columns) of the used range
    pub fn size(&self) -> (usize, usize) {
        self.range.get_size()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Data]> {
        self.range.rows()
    }

    /// Number of rows below the header row
    pub fn data_row_count(&self) -> usize {
        self.size().0.saturating_sub(1)
    }
}

/// A parsed spreadsheet: sheet names in workbook order plus the sheets by name.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheet_names: Vec<String>,
    sheets: HashMap<String, Sheet>,
}

impl Workbook {
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        let sheet_names = sheets.iter().map(|s| s.name.clone()).collect();
        let sheets = sheets.into_iter().map(|s| (s.name.clone(), s)).collect();
        Self {
            sheet_names,
            sheets,
        }
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    pub fn len(&self) -> usize {
        self.sheet_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheet_names.is_empty()
    }

    /// Sheets in workbook order
    pub fn iter(&self) -> impl Iterator<Item = &Sheet> {
        self.sheet_names
            .iter()
            .filter_map(|name| self.sheets.get(name))
    }
}

/// Load a workbook from a file (Excel formats via calamine, CSV via the csv crate)
pub fn load_workbook(path: &Path) -> Result<Workbook, ConvertError> {
    let workbook = match extension_of(path).as_str() {
        ".csv" => load_csv(path)?,
        _ => load_excel(path)?,
    };

    log::debug!(
        "event=workbook_loaded path={} sheets={}",
        path.display(),
        workbook.len()
    );
    Ok(workbook)
}

fn load_excel(path: &Path) -> Result<Workbook, ConvertError> {
    let mut excel = open_workbook_auto(path).map_err(|e| ConvertError::read(path, e))?;

    let names: Vec<String> = excel.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = excel
            .worksheet_range(&name)
            .map_err(|e| ConvertError::read(path, e))?;
        sheets.push(Sheet::new(name, range));
    }

    Ok(Workbook::from_sheets(sheets))
}

fn load_csv(path: &Path) -> Result<Workbook, ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ConvertError::read(path, e))?;

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| ConvertError::read(path, e))?;
        rows.push(
            record
                .iter()
                .map(|field| parse_csv_field(&decode_csv_field(field)))
                .collect(),
        );
    }

    Ok(Workbook::from_sheets(vec![Sheet::from_rows(CSV_SHEET_NAME, rows)]))
}

/// Decode a raw CSV field. UTF-8 is used when valid, Windows-1252 otherwise,
/// which is what spreadsheet applications export by default.
pub fn decode_csv_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

/// Type a CSV field the way a spreadsheet application would on import
pub fn parse_csv_field(field: &str) -> Data {
    if field.is_empty() {
        return Data::Empty;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Data::Int(i);
    }
    if looks_numeric(field) {
        if let Ok(f) = field.parse::<f64>() {
            return Data::Float(f);
        }
    }
    if field.eq_ignore_ascii_case("true") {
        return Data::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return Data::Bool(false);
    }
    if field.len() == 10 && NaiveDate::parse_from_str(field, "%Y-%m-%d").is_ok() {
        return Data::DateTimeIso(field.to_string());
    }
    Data::String(field.to_string())
}

// f64::from_str also accepts "inf", "NaN" and friends, which should stay text
fn looks_numeric(field: &str) -> bool {
    field
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && field.chars().any(|c| c.is_ascii_digit())
}
