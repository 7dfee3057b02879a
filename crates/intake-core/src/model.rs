use serde::{Deserialize, Serialize};

/// Identity of one question in the fixed intake set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    DiabetesHistory,
    LastCheckup,
    Medications,
}

impl QuestionId {
    /// 1-based position in the questionnaire.
    pub fn number(&self) -> u32 {
        match self {
            QuestionId::DiabetesHistory => 1,
            QuestionId::LastCheckup => 2,
            QuestionId::Medications => 3,
        }
    }

    /// Legacy wire name (`question_<n>`), used in logs only.
    pub fn wire_name(&self) -> &'static str {
        match self {
            QuestionId::DiabetesHistory => "question_1",
            QuestionId::LastCheckup => "question_2",
            QuestionId::Medications => "question_3",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: &'static str,
}

impl Question {
    /// The fixed ordered question set the session walks through.
    pub fn intake_set() -> Vec<Question> {
        vec![
            Question {
                id: QuestionId::DiabetesHistory,
                prompt: "Do you have a history of diabetes? (Yes/No)",
            },
            Question {
                id: QuestionId::LastCheckup,
                prompt: "When was your last medical check-up? (YYYY-MM-DD)",
            },
            Question {
                id: QuestionId::Medications,
                prompt: "Are you currently taking any medications? (If yes, list them)",
            },
        ]
    }
}

/// Raw answers collected in one session. A field is `Some` only when the
/// judge accepted an answer for it; a question that exhausted its retries
/// stays `None` (no sentinel is recorded).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub diabetes_history: Option<String>,
    pub last_checkup: Option<String>,
    pub medications: Option<String>,
}

impl AnswerSet {
    pub fn get(&self, id: QuestionId) -> Option<&str> {
        match id {
            QuestionId::DiabetesHistory => self.diabetes_history.as_deref(),
            QuestionId::LastCheckup => self.last_checkup.as_deref(),
            QuestionId::Medications => self.medications.as_deref(),
        }
    }

    pub fn set(&mut self, id: QuestionId, value: String) {
        match id {
            QuestionId::DiabetesHistory => self.diabetes_history = Some(value),
            QuestionId::LastCheckup => self.last_checkup = Some(value),
            QuestionId::Medications => self.medications = Some(value),
        }
    }
}

/// Same shape as [`AnswerSet`], values are hex-encoded ciphertext tokens.
/// Absent answers stay absent; no placeholder ciphertext is generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncryptedAnswers {
    pub diabetes_history: Option<String>,
    pub last_checkup: Option<String>,
    pub medications: Option<String>,
}

/// What the judge LLM said about one candidate answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// Terminal state of a session run.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Saved { record_id: i64 },
    Rejected,
}
