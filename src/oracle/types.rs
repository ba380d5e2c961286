use crate::llm::{Role, Turn};
use serde::{Deserialize, Deserializer};

/// Keeps string values and treats anything else (numbers, objects, null) as absent,
/// so a mistyped field reaches validation instead of failing extraction.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReadingRequest {
    #[serde(default, alias = "base64Image", deserialize_with = "string_or_none")]
    pub image_data: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub message: Option<String>,
    #[serde(default, alias = "conversationHistory")]
    pub history: Vec<HistoryTurn>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub birth_date: Option<String>,
}

/// A prior turn, either `{role, text}` or the API-native `{role, parts: [{text}]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub parts: Vec<HistoryPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl HistoryTurn {
    /// Collapses the turn to plain text. Turns without any text are dropped.
    pub fn into_turn(self) -> Option<Turn> {
        let text = match self.text {
            Some(text) => text,
            None => self
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n"),
        };

        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Turn {
            role: self.role,
            text: text.to_string(),
        })
    }
}
