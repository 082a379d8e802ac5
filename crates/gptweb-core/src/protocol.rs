//! Display protocol vocabulary.
//!
//! Messages exchanged between the chat session and its rendering surface.
//! Both directions are JSON objects discriminated by a `type` field.

use serde::{Deserialize, Serialize};

use crate::editor::TextRange;

/// Commands sent by the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundCommand {
    AskQuestion { value: String },
    OpenSettings,
    OpenSearchSettings,
    ClearConversation,
    StopGenerating,
}

/// Echo of an accepted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEcho {
    pub question: String,
    /// Attached code, empty when none.
    pub code_block: String,
}

/// Events sent to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    ShowInProgress {
        #[serde(rename = "inProgress")]
        in_progress: bool,
    },
    AddQuestion {
        value: QuestionEcho,
        id: String,
    },
    AddResponse {
        value: String,
        id: String,
    },
    AddError {
        value: String,
    },
    SetSelection {
        value: TextRange,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_wire_format() {
        let ask: InboundCommand =
            serde_json::from_str(r#"{"type":"askQuestion","value":"why?"}"#).unwrap();
        assert_eq!(
            ask,
            InboundCommand::AskQuestion {
                value: "why?".to_string()
            }
        );

        let stop: InboundCommand = serde_json::from_str(r#"{"type":"stopGenerating"}"#).unwrap();
        assert_eq!(stop, InboundCommand::StopGenerating);

        assert!(serde_json::from_str::<InboundCommand>(r#"{"type":"selfDestruct"}"#).is_err());
    }

    #[test]
    fn test_outbound_wire_format() {
        let progress = serde_json::to_value(OutboundMessage::ShowInProgress { in_progress: true })
            .unwrap();
        assert_eq!(progress["type"], "showInProgress");
        assert_eq!(progress["inProgress"], true);

        let question = serde_json::to_value(OutboundMessage::AddQuestion {
            value: QuestionEcho {
                question: "explain".to_string(),
                code_block: "x = 1".to_string(),
            },
            id: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(question["type"], "addQuestion");
        assert_eq!(question["value"]["codeBlock"], "x = 1");
    }
}
