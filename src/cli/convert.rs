//! Workbook to JSON conversion with progress spinners

use std::path::Path;

use crate::pipeline::{load_workbook, write_records, ConversionResult, ConvertError, Record};
use crate::utils::{create_spinner, finish_with_success, finish_with_warning};

/// First rows of the first non-empty sheet, kept for the preview
#[derive(Debug, Clone, Default)]
pub struct SheetPreview {
    pub sheet_name: String,
    pub records: Vec<Record>,
}

/// Everything a finished conversion hands back to the session
#[derive(Debug, Clone, Default)]
pub struct ConversionOutcome {
    pub results: Vec<ConversionResult>,
    pub preview: Option<SheetPreview>,
}

/// Read `input`, convert every sheet and write one JSON file per sheet.
///
/// # Arguments
/// * `input` - Path to a validated spreadsheet file
/// * `output_dir` - Directory for the JSON files. Defaults to the input's directory
/// * `preview_rows` - Number of records to keep for the preview (0 keeps none)
///
/// Sheets are processed sequentially in workbook order. The first failing
/// sheet aborts the request; files already written for earlier sheets stay.
pub fn run_convert(
    input: &Path,
    output_dir: Option<&Path>,
    preview_rows: usize,
) -> Result<ConversionOutcome, ConvertError> {
    let spinner = create_spinner("Reading workbook...");
    let workbook = load_workbook(input)
        .inspect_err(|_| finish_with_warning(&spinner, "Could not read workbook"))?;
    finish_with_success(
        &spinner,
        &format!(
            "Found {} sheet(s): {}",
            workbook.len(),
            workbook.sheet_names().join(", ")
        ),
    );

    let mut outcome = ConversionOutcome::default();
    for name in workbook.sheet_names() {
        let spinner = create_spinner(&format!("Converting '{}'...", name));
        let records = workbook.records_for(name).inspect_err(|_| {
            finish_with_warning(&spinner, &format!("Could not convert '{}'", name))
        })?;
        let result = write_records(name, &records, input, output_dir).inspect_err(|_| {
            finish_with_warning(&spinner, &format!("Could not write '{}'", name))
        })?;
        finish_with_success(
            &spinner,
            &format!("{}: {} row(s) written", name, result.row_count),
        );

        if outcome.preview.is_none() && preview_rows > 0 && !records.is_empty() {
            outcome.preview = Some(SheetPreview {
                sheet_name: name.clone(),
                records: records.into_iter().take(preview_rows).collect(),
            });
        }
        outcome.results.push(result);
    }

    log::info!(
        "event=conversion_complete input={} sheets={}",
        input.display(),
        outcome.results.len()
    );
    Ok(outcome)
}
