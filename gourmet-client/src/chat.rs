//! AI assistant conversation

use crate::client::GourmetClient;
use crate::http::HttpClient;
use crate::retry::{RetryPolicy, retry_any};
use crate::storage::{KeyValueStoreExt, keys};
use crate::validation::{Validate, validate_temperature};
use crate::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{AiConfig, AiConfigUpdate, BranchInfo, ChatReply, ChatRequest, ChatRole};
use std::sync::Arc;
use std::time::Duration;

pub const CHAT_ATTEMPTS: u32 = 3;
pub const CHAT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// One turn of the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Persisted form under `ai_chat_messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredChat {
    branch_id: String,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    messages: Vec<ChatMessage>,
    timestamp: DateTime<Utc>,
}

/// Conversation with the assistant of one branch
pub struct ChatSession<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    branch_id: String,
    session_id: Option<String>,
    branch_name: Option<String>,
    messages: Vec<ChatMessage>,
    policy: RetryPolicy,
}

impl<H: HttpClient> ChatSession<H> {
    /// Open a chat for `branch_id`, restoring history saved for the same branch
    pub fn open(client: Arc<GourmetClient<H>>, branch_id: impl Into<String>) -> ClientResult<Self> {
        let branch_id = branch_id.into();
        if branch_id.trim().is_empty() {
            return Err(ClientError::invalid("branch_id is required to chat"));
        }
        let mut session = Self {
            client,
            branch_id,
            session_id: None,
            branch_name: None,
            messages: Vec::new(),
            policy: RetryPolicy::fixed(CHAT_ATTEMPTS, CHAT_RETRY_DELAY),
        };
        session.restore();
        Ok(session)
    }

    fn restore(&mut self) {
        let Some(stored) = self
            .client
            .store()
            .get_json::<StoredChat>(keys::AI_CHAT_MESSAGES)
        else {
            return;
        };
        if stored.branch_id != self.branch_id {
            tracing::debug!(
                stored = %stored.branch_id,
                current = %self.branch_id,
                "Ignoring chat history of another branch"
            );
            return;
        }
        tracing::debug!(messages = stored.messages.len(), "Chat history restored");
        self.session_id = stored.session_id;
        self.messages = stored.messages;
    }

    fn persist(&self) -> ClientResult<()> {
        let stored = StoredChat {
            branch_id: self.branch_id.clone(),
            session_id: self.session_id.clone(),
            messages: self.messages.clone(),
            timestamp: Utc::now(),
        };
        self.client.store().set_json(keys::AI_CHAT_MESSAGES, &stored)
    }

    fn record(&mut self, role: ChatRole, content: &str) -> ClientResult<()> {
        self.messages.push(ChatMessage {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
        self.persist()
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Branch name as last reported by the assistant
    pub fn branch_name(&self) -> Option<&str> {
        self.branch_name.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Override the retry schedule
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Branch facts for the chat header
    pub async fn branch_info(&mut self) -> ClientResult<BranchInfo> {
        let info = self.client.ai_branch_info(&self.branch_id).await?;
        self.branch_name = Some(info.branch_name.clone());
        Ok(info)
    }

    /// Send a message; the user turn is kept even if every attempt fails
    pub async fn send(&mut self, message: &str) -> ClientResult<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClientError::invalid("message must not be empty"));
        }
        self.record(ChatRole::User, message)?;

        let request = ChatRequest {
            branch_id: self.branch_id.clone(),
            message: message.to_string(),
            session_id: self.session_id.clone(),
        };
        let client = Arc::clone(&self.client);
        let reply = retry_any(self.policy, || client.chat(&request)).await?;

        if !reply.session_id.is_empty() {
            self.session_id = Some(reply.session_id.clone());
        }
        if let Some(name) = &reply.branch_name {
            self.branch_name = Some(name.clone());
        }
        self.record(ChatRole::Assistant, &reply.response)?;
        tracing::debug!(branch_id = %self.branch_id, turns = self.messages.len(), "Chat reply received");
        Ok(reply)
    }

    /// Wipe the local history, then ask the service to forget the branch
    pub async fn clear_history(&mut self) -> ClientResult<()> {
        self.messages.clear();
        self.session_id = None;
        self.client.store().remove(keys::AI_CHAT_MESSAGES)?;
        let reply = self.client.clear_chat_history(&self.branch_id).await?;
        tracing::info!(branch_id = %reply.branch_id, "Chat history cleared");
        Ok(())
    }
}

/// Update the assistant settings; temperature is checked before sending
pub async fn update_ai_settings<H: HttpClient>(
    client: &GourmetClient<H>,
    system_prompt: Option<String>,
    temperature: Option<i64>,
) -> ClientResult<AiConfig> {
    let update = AiConfigUpdate {
        system_prompt,
        temperature: temperature.map(validate_temperature).transpose()?,
    };
    update.validate()?;
    let config = client.update_ai_config(&update).await?;
    tracing::info!(temperature = config.temperature, "AI settings updated");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_chat_layout() {
        let stored = StoredChat {
            branch_id: "b1".into(),
            session_id: Some("s1".into()),
            messages: vec![ChatMessage {
                role: ChatRole::User,
                content: "Có món chay không?".into(),
                timestamp: Utc::now(),
            }],
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["branchId"], "b1");
        assert_eq!(value["sessionId"], "s1");
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
