//! AI assistant service payloads

use serde::{Deserialize, Serialize};

/// Chat request (`POST /chat`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub branch_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Chat reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub branch_name: Option<String>,
    pub session_id: String,
}

/// Branch facts the assistant answers from (`GET /branches/:id/info`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchInfo {
    pub branch_id: String,
    pub branch_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub closing_hours: Option<String>,
}

/// History wipe acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearHistoryReply {
    #[serde(default)]
    pub message: Option<String>,
    pub branch_id: String,
}

/// Assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    #[serde(default)]
    pub config_id: Option<String>,
    pub system_prompt: String,
    /// Creativity in percent, `0..=100`
    pub temperature: u8,
}

/// Assistant configuration update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<u8>,
}

/// Who wrote a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_omits_missing_session() {
        let req = ChatRequest {
            branch_id: "b1".into(),
            message: "Mấy giờ mở cửa?".into(),
            session_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("session_id").is_none());
    }
}
