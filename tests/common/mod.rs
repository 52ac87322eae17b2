//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::TempDir;

/// Create an .xlsx workbook with two sheets of known content
///
/// `People` (3 data rows):
/// - `name`: text
/// - `age`: numbers, with a blank cell for Bob
/// - `joined`: dates formatted as yyyy-mm-dd
/// - `active`: booleans
///
/// `Scores` (2 data rows):
/// - `team`, `score` with a fractional score
pub fn create_people_xlsx(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let people = workbook.add_worksheet();
    people.set_name("People").unwrap();
    for (col, header) in ["name", "age", "joined", "active"].iter().enumerate() {
        people.write_string(0, col as u16, *header).unwrap();
    }
    let rows = [
        ("Ann", Some(36.0), (2021, 1, 4), true),
        ("Bob", None, (2022, 7, 19), false),
        ("Cleo", Some(29.0), (2024, 3, 15), true),
    ];
    for (i, (name, age, (y, m, d), active)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        people.write_string(row, 0, *name).unwrap();
        if let Some(age) = age {
            people.write_number(row, 1, *age).unwrap();
        }
        let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
        people
            .write_datetime_with_format(row, 2, &date, &date_format)
            .unwrap();
        people.write_boolean(row, 3, *active).unwrap();
    }

    let scores = workbook.add_worksheet();
    scores.set_name("Scores").unwrap();
    scores.write_string(0, 0, "team").unwrap();
    scores.write_string(0, 1, "score").unwrap();
    scores.write_string(1, 0, "red").unwrap();
    scores.write_number(1, 1, 12.5).unwrap();
    scores.write_string(2, 0, "blue").unwrap();
    scores.write_number(2, 1, 7.0).unwrap();

    workbook.save(&path).unwrap();
    path
}

/// Create a single-sheet .xlsx with a `name`/`age` header and one `Ann` row with no age
pub fn create_name_age_xlsx(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").unwrap();
    sheet.write_string(0, 0, "name").unwrap();
    sheet.write_string(0, 1, "age").unwrap();
    sheet.write_string(1, 0, "Ann").unwrap();
    workbook.save(&path).unwrap();
    path
}

/// Write a CSV file with the given content
pub fn create_csv(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Create a temporary directory holding the two-sheet people workbook
pub fn create_temp_people_xlsx() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = create_people_xlsx(temp_dir.path(), "people.xlsx");
    (temp_dir, path)
}

/// Serve a single HTTP response on a loopback port.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and the server thread,
/// which exits after answering one request.
pub fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };

        // Read until the end of the request headers
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let header = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        let _ = stream.write_all(header.as_bytes());
        let _ = stream.write_all(&body);
        let _ = stream.flush();
    });

    (format!("http://{}", addr), handle)
}

/// Read a JSON output file into a value
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Names of all files in a directory, sorted
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
