use super::LlmClient;
use crate::model::JudgeResponse;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Deterministic client: pops canned judgment texts in order, then falls
/// back to a fixed reply if one was configured. Used by tests and by the
/// offline `--judge scripted` mode.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<String>>,
    fallback: Option<String>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
        }
    }

    /// A client that accepts everything once the script runs out.
    pub fn accepting() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some("That is a valid answer.".to_string()),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<JudgeResponse> {
        let next = self.replies.lock().unwrap().pop_front();
        let text = match next.or_else(|| self.fallback.clone()) {
            Some(t) => t,
            None => anyhow::bail!("scripted client exhausted (no replies left)"),
        };
        Ok(JudgeResponse {
            text,
            provider: "scripted".to_string(),
            model: "scripted".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
