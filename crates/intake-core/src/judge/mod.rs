use crate::model::Question;
use crate::providers::llm::LlmClient;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

const JUDGE_PREAMBLE: &str = "You are an AI language model designed to assist users by asking a series of medical questions. \
After each question, validate the user's response and, if incorrect, ask them to try again up to three times. \
Once the user answers correctly, send the response to the backend and move on to the next question.";

/// Decides whether a judgment text accepts the candidate answer. The
/// judgment is advisory: it only gates retries, never persistence.
pub trait JudgePolicy: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_acceptable(&self, question: &Question, answer: &str, judgment: &str) -> bool;
}

/// Default policy, kept from the reference behavior: the case-folded
/// judgment must contain the substring "valid". Caveat: "not valid" also
/// matches and is accepted. Use [`TokenPolicy`] for an explicit contract.
pub struct SubstringPolicy;

impl JudgePolicy for SubstringPolicy {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn is_acceptable(&self, _question: &Question, _answer: &str, judgment: &str) -> bool {
        judgment.to_lowercase().contains("valid")
    }
}

/// Strict policy: the judgment must carry a standalone VALID token that is
/// not negated; any INVALID token rejects.
pub struct TokenPolicy;

impl JudgePolicy for TokenPolicy {
    fn name(&self) -> &'static str {
        "token"
    }

    fn is_acceptable(&self, _question: &Question, _answer: &str, judgment: &str) -> bool {
        let mut prev = String::new();
        for word in judgment
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_ascii_lowercase();
            if word == "invalid" {
                return false;
            }
            if word == "valid" && prev != "not" {
                return true;
            }
            prev = word;
        }
        false
    }
}

pub struct JudgeService {
    client: Arc<dyn LlmClient>,
    policy: Box<dyn JudgePolicy>,
    timeout: Duration,
}

impl JudgeService {
    pub fn new(client: Arc<dyn LlmClient>, policy: Box<dyn JudgePolicy>, timeout: Duration) -> Self {
        Self {
            client,
            policy,
            timeout,
        }
    }

    /// One advisory judgment call. A timeout counts as a rejection; a
    /// transport or credential failure is fatal and propagates.
    pub async fn judge(&self, question: &Question, answer: &str) -> anyhow::Result<bool> {
        let prompt = format!(
            "{}\n\nIs '{}' a valid answer for the question: '{}'?",
            JUDGE_PREAMBLE, answer, question.prompt
        );

        let fut = self.client.complete(&prompt);
        let resp = match timeout(self.timeout, fut).await {
            Ok(resp) => resp?,
            Err(_) => {
                warn!(
                    question = question.id.wire_name(),
                    provider = self.client.provider_name(),
                    "judge call timed out, counting as rejection"
                );
                return Ok(false);
            }
        };

        let accepted = self.policy.is_acceptable(question, answer, &resp.text);
        debug!(
            question = question.id.wire_name(),
            policy = self.policy.name(),
            accepted,
            "judgment received"
        );
        Ok(accepted)
    }
}
