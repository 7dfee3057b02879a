use crate::model::JudgeResponse;
use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<JudgeResponse>;
    fn provider_name(&self) -> &'static str;
}

pub mod openai;
pub mod scripted;
