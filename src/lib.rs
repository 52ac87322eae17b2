//! xl2json: Spreadsheet to JSON Library
//!
//! Reads Excel and CSV workbooks, turns every sheet into an array of records
//! keyed by the header row, and writes one JSON file per sheet.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
