mod common;

use std::fs;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use common::{GatedClient, RecordingEditor, drain};
use gptweb_application::{AskOutcome, DispatchOutcome, Extension, WebSearchOutcome};
use gptweb_core::config::Settings;
use gptweb_core::editor::{EditorOccurrence, Position, RawSelectionSource, TextRange};
use gptweb_core::event::{EventDetail, EventKind, EventRecord, LINE_TERMINATOR};
use gptweb_core::protocol::OutboundMessage;
use gptweb_infrastructure::SettingsStorage;
use tempfile::TempDir;

fn settings_with_output(dir: &str) -> Settings {
    Settings {
        output_directory: dir.to_string(),
        ..Settings::default()
    }
}

fn selection(text: &str, range: TextRange) -> EditorOccurrence {
    EditorOccurrence::SelectionChanged {
        file_name: "/work/main.rs".to_string(),
        document_text: text.to_string(),
        source: Some(RawSelectionSource::Keyboard),
        selections: vec![range],
    }
}

fn read_records(extension: &Extension) -> Vec<EventRecord> {
    let path = extension.log_path().expect("telemetry should be active");
    let content = fs::read_to_string(path).unwrap();
    content
        .split_terminator(LINE_TERMINATOR)
        .map(|line| EventRecord::from_line(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_occurrences_reach_the_session_log() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("logs");
    let created_at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();

    let extension = Extension::activate(
        settings_with_output(output.to_str().unwrap()),
        Arc::new(GatedClient::default()),
        Arc::new(RecordingEditor::default()),
        created_at,
    );
    let mut rx = extension.bridge().attach();

    let log_path = extension.log_path().unwrap().clone();
    assert_eq!(log_path, output.join("log_3-5-2024_2-07-09_PM.txt"));

    let doc = "fn main() {\n    \n}\n";
    let cursor_only = TextRange::new(Position::new(1, 0), Position::new(1, 4));
    let real = TextRange::new(Position::new(0, 3), Position::new(0, 7));

    assert_eq!(
        extension.on_editor_occurrence(&selection(doc, cursor_only)),
        Some(DispatchOutcome::Suppressed)
    );
    assert_eq!(
        extension.on_editor_occurrence(&selection(doc, real)),
        Some(DispatchOutcome::Recorded(EventKind::TextSelections))
    );
    extension.on_editor_occurrence(&EditorOccurrence::WindowStateChanged { focused: true });

    // both selections are forwarded, logged or not
    assert_eq!(
        drain(&mut rx),
        vec![
            OutboundMessage::SetSelection { value: cursor_only },
            OutboundMessage::SetSelection { value: real },
        ]
    );

    let records = read_records(&extension);
    assert_eq!(records.len(), 2);
    match records[0].detail() {
        EventDetail::TextSelection { selected_text, .. } => assert_eq!(selected_text, "main"),
        other => panic!("unexpected detail: {other:?}"),
    }
    assert_eq!(records[1].kind(), EventKind::WindowState);
}

#[tokio::test]
async fn test_chat_survives_unusable_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let client = Arc::new(GatedClient::default());
    let extension = Extension::activate(
        settings_with_output(blocker.join("logs").to_str().unwrap()),
        client.clone(),
        Arc::new(RecordingEditor::default()),
        Local::now(),
    );

    assert!(extension.log_path().is_none());
    assert_eq!(
        extension.on_editor_occurrence(&EditorOccurrence::WindowStateChanged { focused: false }),
        None
    );

    client.reply(Ok("Still answering.".to_string()));
    assert_eq!(extension.explain_selection().await, AskOutcome::Answered);
    assert_eq!(client.requests()[0].messages[1].content, "Explain the code");
}

#[tokio::test]
async fn test_web_search_opens_encoded_query() {
    let temp_dir = TempDir::new().unwrap();
    let editor = Arc::new(RecordingEditor::default());
    editor.select("vec.iter()\n.map(f)", Some("rust"));
    editor.answer_search_with(Some("rust iter map"));

    let extension = Extension::activate(
        settings_with_output(temp_dir.path().to_str().unwrap()),
        Arc::new(GatedClient::default()),
        editor.clone(),
        Local::now(),
    );

    let outcome = extension.web_search().await.unwrap();
    let url = "https://www.google.com/search?q=rust+iter+map".to_string();
    assert_eq!(outcome, WebSearchOutcome::Opened(url.clone()));

    let calls = editor.calls();
    assert_eq!(
        calls,
        vec![
            "prompt_search_query:vec.iter() .map(f) rust".to_string(),
            format!("open_external:{url}"),
        ]
    );

    let records = read_records(&extension);
    let names: Vec<&str> = records.iter().map(|r| r.event_name()).collect();
    assert_eq!(names, vec!["onShowSearchQueryBox", "onWebSearch"]);
    assert!(records.iter().all(|r| r.kind() == EventKind::WebSearch));
}

#[tokio::test]
async fn test_web_search_follows_edited_search_engine() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings_with_output(temp_dir.path().join("logs").to_str().unwrap());
    let storage = Arc::new(SettingsStorage::new(temp_dir.path().join("settings.toml")));
    storage.save(&settings).unwrap();

    let editor = Arc::new(RecordingEditor::default());
    editor.select("tokio::spawn", Some("rust"));
    editor.answer_search_with(Some("tokio spawn"));

    let extension = Extension::activate(
        settings,
        Arc::new(GatedClient::default()),
        editor.clone(),
        Local::now(),
    )
    .with_settings_storage(storage.clone());

    // edited after activation
    storage
        .update(|s| s.query_prefix = "https://duckduckgo.com/?q=%SELECTION%".to_string())
        .unwrap();

    assert_eq!(
        extension.web_search().await.unwrap(),
        WebSearchOutcome::Opened("https://duckduckgo.com/?q=tokio+spawn".to_string())
    );
}

#[tokio::test]
async fn test_web_search_keeps_startup_engine_when_settings_are_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("settings.toml");
    let storage = Arc::new(SettingsStorage::new(storage_path.clone()));

    let editor = Arc::new(RecordingEditor::default());
    editor.select("x", None);
    editor.answer_search_with(Some("x"));

    let extension = Extension::activate(
        settings_with_output(temp_dir.path().join("logs").to_str().unwrap()),
        Arc::new(GatedClient::default()),
        editor,
        Local::now(),
    )
    .with_settings_storage(storage);

    fs::write(&storage_path, "query_prefix = [not toml").unwrap();

    assert_eq!(
        extension.web_search().await.unwrap(),
        WebSearchOutcome::Opened("https://www.google.com/search?q=x".to_string())
    );
}

#[tokio::test]
async fn test_web_search_without_selection_notifies() {
    let temp_dir = TempDir::new().unwrap();
    let editor = Arc::new(RecordingEditor::default());
    let extension = Extension::activate(
        settings_with_output(temp_dir.path().to_str().unwrap()),
        Arc::new(GatedClient::default()),
        editor.clone(),
        Local::now(),
    );

    assert_eq!(
        extension.web_search().await.unwrap(),
        WebSearchOutcome::NoSelection
    );
    assert_eq!(editor.calls(), vec!["show_information:No text selected".to_string()]);
    assert!(read_records(&extension).is_empty());
}
