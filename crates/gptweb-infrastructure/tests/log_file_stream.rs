use std::fs;
use std::io::{BufRead, BufReader};

use chrono::Local;
use gptweb_core::editor::{Position, TextRange};
use gptweb_core::event::{EventKind, EventRecord, SelectionKind, UserPayload};
use gptweb_core::sink::EventSink;
use gptweb_infrastructure::JsonlLogSink;
use tempfile::TempDir;

#[test]
fn test_log_file_reads_back_as_record_stream() {
    let temp_dir = TempDir::new().unwrap();
    let sink = JsonlLogSink::for_session(temp_dir.path(), Local::now()).unwrap();

    let e1 = EventRecord::user(
        EventKind::DocumentState,
        "onDidOpenTextDocument",
        1_000,
        None,
        Some("/work/app.py".to_string()),
        Some(UserPayload::Document {
            version: 1,
            line_count: 30,
            language_id: "python".to_string(),
        }),
    );
    let e2 = EventRecord::text_selection(
        "onDidChangeTextEditorSelection",
        1_001,
        "/work/app.py",
        SelectionKind::Keyboard,
        vec![TextRange::new(Position::new(2, 0), Position::new(2, 8))],
        "print(1)",
    );

    sink.append(&e1).unwrap();
    sink.append(&e2).unwrap();

    let file_name = sink.path().file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("log_"));
    assert!(file_name.ends_with(".txt"));

    let raw = fs::read_to_string(sink.path()).unwrap();
    assert_eq!(raw.matches("\r\n").count(), 2);

    let reader = BufReader::new(fs::File::open(sink.path()).unwrap());
    let records: Vec<EventRecord> = reader
        .lines()
        .map(|line| EventRecord::from_line(&line.unwrap()).unwrap())
        .collect();

    assert_eq!(records, vec![e1, e2]);
}
