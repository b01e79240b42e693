// gourmet-client/src/client/ai.rs
// AI 助手服务 API

use super::GourmetClient;
use crate::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use shared::models::{AiConfig, AiConfigUpdate, BranchInfo, ChatReply, ChatRequest, ClearHistoryReply};

impl<H: HttpClient> GourmetClient<H> {
    pub async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatReply> {
        self.call_ai(ApiRequest::post("chat").json(request)?).await
    }

    pub async fn ai_branch_info(&self, branch_id: &str) -> ClientResult<BranchInfo> {
        self.call_ai(ApiRequest::get(format!("branches/{branch_id}/info")))
            .await
    }

    /// Forget the assistant's conversation for a branch
    pub async fn clear_chat_history(&self, branch_id: &str) -> ClientResult<ClearHistoryReply> {
        self.call_ai(ApiRequest::delete(format!("chat/history/{branch_id}")))
            .await
    }

    pub async fn ai_config(&self) -> ClientResult<AiConfig> {
        self.call_ai(ApiRequest::get("ai-config")).await
    }

    pub async fn update_ai_config(&self, update: &AiConfigUpdate) -> ClientResult<AiConfig> {
        self.call_ai(ApiRequest::put("ai-config").json(update)?).await
    }
}
