// src/api/types.rs

use crate::provider::TokenUsage;
use crate::session::{Turn, TurnRole};
use serde::{Deserialize, Serialize};

/// A transcript entry as clients send it. Roles are free-form on the wire
/// and may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub role: Option<String>,
    pub content: String,
}

impl HistoryEntry {
    /// Only `user` and `assistant` entries are forwarded to the model.
    pub fn to_turn(&self) -> Option<Turn> {
        let role = match self.role.as_deref()? {
            "user" => TurnRole::User,
            "assistant" => TurnRole::Assistant,
            _ => return None,
        };
        Some(Turn {
            role,
            content: self.content.clone(),
        })
    }

    /// For the coaching transcript: anything that is not the user is "them".
    pub fn to_transcript_turn(&self) -> Turn {
        if self.role.as_deref() == Some("user") {
            Turn::user(self.content.clone())
        } else {
            Turn::assistant(self.content.clone())
        }
    }
}

/// Body of `POST /api/scenarios/test`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionBody {
    pub scenario_id: Option<String>,
    pub prompt: Option<String>,
    pub user_input: Option<String>,
    pub model: Option<String>,
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub success: bool,
    pub response: String,
    pub metadata: CompletionMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionMetadata {
    pub scenario_id: String,
    pub model: String,
    pub usage: UsageMetadata,
    pub cost: f64,
    pub timestamp: String,
}

/// Token counts in the upstream's naming.
#[derive(Debug, Serialize)]
pub struct UsageMetadata {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<TokenUsage> for UsageMetadata {
    fn from(usage: TokenUsage) -> Self {
        Self {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens: usage.total(),
        }
    }
}

/// Body of `POST /api/scenarios/feedback-generate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackBody {
    pub scenario_id: Option<String>,
    pub conversation: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub feedback: String,
    pub metadata: RecordMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    pub timestamp: String,
}

/// Body of `POST /api/scenarios/feedback`: a tester's rating of a scenario prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatingBody {
    pub scenario_id: Option<String>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub improvements: Option<String>,
    pub prompt: Option<String>,
}

/// A stored rating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRating {
    pub id: String,
    pub scenario_id: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RatingSavedResponse {
    pub success: bool,
    pub message: String,
    pub metadata: RecordMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingQuery {
    pub scenario_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RatingListResponse {
    pub success: bool,
    pub feedback: Vec<ScenarioRating>,
}

/// Body of `POST /api/coming-soon-auth`.
#[derive(Debug, Deserialize)]
pub struct AccessBody {
    pub password: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error body of the access endpoint.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_role_filter() {
        let system = HistoryEntry {
            role: Some("system".into()),
            content: "ignore me".into(),
        };
        assert!(system.to_turn().is_none());
        assert_eq!(system.to_transcript_turn(), Turn::assistant("ignore me"));

        let user = HistoryEntry {
            role: Some("user".into()),
            content: "hi".into(),
        };
        assert_eq!(user.to_turn(), Some(Turn::user("hi")));
    }

    #[test]
    fn test_history_entry_without_role_is_skipped() {
        let body: CompletionBody = serde_json::from_str(
            r#"{"scenarioId":"rejection","userInput":"no",
                "conversationHistory":[{"content":"orphan"},{"role":"user","content":"hi"}]}"#,
        )
        .unwrap();
        let turns: Vec<Turn> = body
            .conversation_history
            .iter()
            .filter_map(HistoryEntry::to_turn)
            .collect();
        assert_eq!(turns, vec![Turn::user("hi")]);
        assert_eq!(
            body.conversation_history[0].to_transcript_turn(),
            Turn::assistant("orphan")
        );
    }

    #[test]
    fn test_record_metadata_omits_missing_scenario() {
        let json = serde_json::to_value(RecordMetadata {
            scenario_id: None,
            timestamp: "2024-01-01T00:00:00Z".into(),
        })
        .unwrap();
        assert!(json.get("scenarioId").is_none());
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_completion_body_defaults() {
        let body: CompletionBody =
            serde_json::from_str(r#"{"scenarioId":"rejection","userInput":"no"}"#).unwrap();
        assert_eq!(body.scenario_id.as_deref(), Some("rejection"));
        assert!(body.prompt.is_none());
        assert!(body.conversation_history.is_empty());
    }

    #[test]
    fn test_usage_metadata_naming() {
        let usage = UsageMetadata::from(TokenUsage {
            input_tokens: 10,
            output_tokens: 4,
        });
        let json = serde_json::to_value(usage).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14})
        );
    }
}
