//! JSON output for converted sheets

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::ConvertError;
use super::loader::load_workbook;
use super::records::{sheet_to_records, Record};

/// Outcome of writing one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub sheet_name: String,
    pub output_path: PathBuf,
    pub row_count: usize,
}

/// Derive the output path for a sheet: `<input_stem>_<sheet>.json`.
///
/// The file lands in `output_dir` when given, otherwise next to the input.
pub fn output_path_for(input: &Path, sheet_name: &str, output_dir: Option<&Path>) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or_else(|| Path::new(".")),
    };
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let sheet = sheet_name.replace(['/', '\\'], "_");
    dir.join(format!("{}_{}.json", stem, sheet))
}

/// Serialize records as a pretty-printed JSON array (2-space indent)
pub fn write_json<W: Write>(writer: W, records: &[Record]) -> std::io::Result<()> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()
}

/// Write one sheet's records to its derived output path, overwriting any previous file
pub fn write_records(
    sheet_name: &str,
    records: &[Record],
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<ConversionResult, ConvertError> {
    let output_path = output_path_for(input, sheet_name, output_dir);

    let file = File::create(&output_path).map_err(|e| ConvertError::write(&output_path, e))?;
    write_json(BufWriter::new(file), records).map_err(|e| ConvertError::write(&output_path, e))?;

    log::info!(
        "event=sheet_written sheet={} rows={} path={}",
        sheet_name,
        records.len(),
        output_path.display()
    );

    Ok(ConversionResult {
        sheet_name: sheet_name.to_string(),
        output_path,
        row_count: records.len(),
    })
}

/// Read a workbook and write one JSON file per sheet, in workbook order
pub fn convert_workbook(
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<Vec<ConversionResult>, ConvertError> {
    let workbook = load_workbook(input)?;

    workbook
        .iter()
        .map(|sheet| {
            let records = sheet_to_records(sheet);
            write_records(&sheet.name, &records, input, output_dir)
        })
        .collect()
}

/// Read back a JSON file produced by [`write_records`]
pub fn read_records(path: &Path) -> Result<Vec<Record>, ConvertError> {
    let file = File::open(path).map_err(|e| ConvertError::read(path, e))?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| ConvertError::read(path, e))
}
