use serde::{Deserialize, Serialize};

/// Category of a telemetry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    TextChanges,
    FileOperation,
    WindowState,
    TextSelections,
    WebSearch,
    TerminalState,
    DocumentState,
    AddResponse,
    AddRequest,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::TextChanges,
        EventKind::FileOperation,
        EventKind::WindowState,
        EventKind::TextSelections,
        EventKind::WebSearch,
        EventKind::TerminalState,
        EventKind::DocumentState,
        EventKind::AddResponse,
        EventKind::AddRequest,
    ];

    /// The wire name, e.g. `"textChanges"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TextChanges => "textChanges",
            EventKind::FileOperation => "fileOperation",
            EventKind::WindowState => "windowState",
            EventKind::TextSelections => "textSelections",
            EventKind::WebSearch => "webSearch",
            EventKind::TerminalState => "terminalState",
            EventKind::DocumentState => "documentState",
            EventKind::AddResponse => "addResponse",
            EventKind::AddRequest => "addRequest",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for kind in EventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
