//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use gptweb_core::editor::{CodeContext, EditorSurface};
use gptweb_core::error::Result;
use gptweb_core::event::EventRecord;
use gptweb_core::protocol::OutboundMessage;
use gptweb_core::remote::{CompletionClient, CompletionRequest, RemoteError};
use gptweb_core::sink::EventSink;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

type Reply = std::result::Result<String, RemoteError>;

/// Completion client whose replies are released by the test.
#[derive(Default)]
pub struct GatedClient {
    pending: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl GatedClient {
    /// Queues a gate for the next request and returns its release handle.
    pub fn gate(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(rx);
        tx
    }

    /// Queues an immediate reply.
    pub fn reply(&self, reply: Reply) {
        let _ = self.gate().send(reply);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for GatedClient {
    async fn complete(&self, request: CompletionRequest) -> Reply {
        self.requests.lock().unwrap().push(request);
        let gate = self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("no reply queued for request");
        gate.await
            .unwrap_or_else(|_| Err(RemoteError::with_message("gate dropped")))
    }
}

/// Editor surface that records every call.
#[derive(Default)]
pub struct RecordingEditor {
    selection: Mutex<Option<CodeContext>>,
    search_reply: Mutex<Option<String>>,
    reveal_gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingEditor {
    pub fn select(&self, code: &str, language_id: Option<&str>) {
        *self.selection.lock().unwrap() = Some(CodeContext {
            code: code.to_string(),
            language_id: language_id.map(str::to_string),
        });
    }

    pub fn answer_search_with(&self, query: Option<&str>) {
        *self.search_reply.lock().unwrap() = query.map(str::to_string);
    }

    /// Makes the next `reveal_chat_view` suspend until the returned handle fires.
    pub fn hold_reveal(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.reveal_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EditorSurface for RecordingEditor {
    async fn selected_code(&self) -> Option<CodeContext> {
        self.selection.lock().unwrap().clone()
    }

    async fn collapse_selection(&self) {
        self.push("collapse_selection".to_string());
    }

    async fn reveal_chat_view(&self) {
        self.push("reveal_chat_view".to_string());
        let gate = self.reveal_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    async fn open_settings(&self, key: &str) {
        self.push(format!("open_settings:{key}"));
    }

    async fn prompt_search_query(&self, initial: &str) -> Option<String> {
        self.push(format!("prompt_search_query:{initial}"));
        self.search_reply.lock().unwrap().clone()
    }

    async fn open_external(&self, url: &str) {
        self.push(format!("open_external:{url}"));
    }

    async fn show_information(&self, message: &str) {
        self.push(format!("show_information:{message}"));
    }
}

/// Event sink that keeps records in memory.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<EventRecord>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl EventSink for MemorySink {
    fn append(&self, record: &EventRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Drains every message currently queued on a surface.
pub fn drain(rx: &mut UnboundedReceiver<OutboundMessage>) -> Vec<OutboundMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

pub fn progress(in_progress: bool) -> OutboundMessage {
    OutboundMessage::ShowInProgress { in_progress }
}
