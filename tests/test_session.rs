//! Scripted interactive sessions

use std::io::Cursor;
use std::time::Duration;

use tempfile::TempDir;
use xl2json::cli::{
    ReaderInput, Session, SessionConfig, SessionOutcome, SessionState, PROMPT, QUIT_FAREWELL,
};
use xl2json::pipeline::FetchOptions;

#[path = "common/mod.rs"]
mod common;

type ScriptedSession = Session<ReaderInput<Cursor<String>>, Vec<u8>>;

fn scripted(script: String, config: SessionConfig) -> ScriptedSession {
    Session::new(ReaderInput::new(Cursor::new(script)), Vec::new(), config)
}

fn config_in(temp_dir: &TempDir) -> SessionConfig {
    SessionConfig {
        output_dir: None,
        preview_rows: 3,
        fetch: FetchOptions {
            temp_dir: temp_dir.path().join("downloads"),
            timeout: Some(Duration::from_secs(10)),
        },
    }
}

#[test]
fn test_session_converts_local_file() {
    let (temp_dir, path) = common::create_temp_people_xlsx();
    let mut session = scripted(format!("{}\nq\n", path.display()), config_in(&temp_dir));

    let outcome = session.run().unwrap();

    assert_eq!(outcome, SessionOutcome::Quit);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(session.failures(), 0);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].sheet_count(), 2);
    assert_eq!(session.history()[0].total_rows(), 5);

    let text = String::from_utf8(session.into_output()).unwrap();
    assert!(text.contains(PROMPT));
    assert!(text.contains("CONVERSION SUMMARY"));
    assert!(text.contains("People"));
    assert!(text.contains("\"name\": \"Ann\""), "Preview shows the first records");
    assert!(text.contains(QUIT_FAREWELL));
    assert!(temp_dir.path().join("people_People.json").exists());
    assert!(temp_dir.path().join("people_Scores.json").exists());
}

#[test]
fn test_session_accepts_quoted_path() {
    let (temp_dir, path) = common::create_temp_people_xlsx();
    let script = format!("  \"{}\"  \nq\n", path.display());
    let mut session = scripted(script, config_in(&temp_dir));

    session.run().unwrap();

    assert_eq!(session.failures(), 0);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_session_recovers_after_failure() {
    let (temp_dir, path) = common::create_temp_people_xlsx();
    let bad = temp_dir.path().join("notes.txt");
    std::fs::write(&bad, "not a spreadsheet").unwrap();

    let script = format!(
        "{}\n{}\n{}\nq\n",
        bad.display(),
        temp_dir.path().join("missing.xlsx").display(),
        path.display()
    );
    let mut session = scripted(script, config_in(&temp_dir));

    assert_eq!(session.run().unwrap(), SessionOutcome::Quit);
    assert_eq!(session.failures(), 2);
    assert_eq!(session.history().len(), 1);

    let text = String::from_utf8(session.into_output()).unwrap();
    assert!(text.contains("unsupported file format '.txt'"));
    assert!(text.contains("file not found"));
    assert!(!temp_dir.path().join("notes_Sheet1.json").exists());
}

#[test]
fn test_session_reports_corrupt_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.xlsx");
    std::fs::write(&path, b"garbage").unwrap();

    let mut session = scripted(format!("{}\nq\n", path.display()), config_in(&temp_dir));
    session.run().unwrap();

    assert_eq!(session.failures(), 1);
    let text = String::from_utf8(session.into_output()).unwrap();
    assert!(text.contains("failed to read"));
}

#[test]
fn test_session_converts_url_and_removes_download() {
    let (_fixture_dir, fixture) = common::create_temp_people_xlsx();
    let (base, server) = common::serve_once("200 OK", std::fs::read(&fixture).unwrap());
    let temp_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();

    let mut config = config_in(&temp_dir);
    config.output_dir = Some(out_dir.path().to_path_buf());
    let mut session = scripted(format!("{}/people.xlsx\nq\n", base), config);

    session.run().unwrap();
    server.join().unwrap();

    assert_eq!(session.failures(), 0);
    assert!(session.history()[0].remote);
    assert_eq!(
        common::list_files(out_dir.path()),
        ["people_People.json", "people_Scores.json"]
    );
    assert!(
        common::list_files(&temp_dir.path().join("downloads")).is_empty(),
        "Temporary download must be deleted"
    );
}

#[test]
fn test_session_removes_download_when_conversion_fails() {
    let (base, server) = common::serve_once("200 OK", b"not a workbook".to_vec());
    let temp_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();

    let mut config = config_in(&temp_dir);
    config.output_dir = Some(out_dir.path().to_path_buf());
    let mut session = scripted(format!("{}/bad.xlsx\nq\n", base), config);

    session.run().unwrap();
    server.join().unwrap();

    assert_eq!(session.failures(), 1);
    assert!(common::list_files(out_dir.path()).is_empty());
    assert!(common::list_files(&temp_dir.path().join("downloads")).is_empty());
}

#[test]
fn test_session_end_of_input_without_quit() {
    let (temp_dir, path) = common::create_temp_people_xlsx();
    let mut session = scripted(format!("{}\n", path.display()), config_in(&temp_dir));

    assert_eq!(session.run().unwrap(), SessionOutcome::EndOfInput);

    let text = String::from_utf8(session.into_output()).unwrap();
    assert!(text.contains("1 conversion(s) this session, 2 JSON file(s) written"));
}
