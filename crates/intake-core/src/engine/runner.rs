use crate::crypto::FieldCipher;
use crate::judge::JudgeService;
use crate::model::{AnswerSet, Question, SessionOutcome};
use crate::report::console;
use crate::storage::Store;
use crate::validate;
use std::io::Write;
use tracing::info;

/// Attempts allowed per question before it is skipped.
pub const MAX_ATTEMPTS: u32 = 3;

/// Console abstraction so tests can drive a session with scripted input.
pub trait Prompter {
    fn say(&mut self, line: &str);
    fn ask(&mut self, prompt: &str) -> anyhow::Result<String>;
}

pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        // Strip the line terminator only; the validator is deliberately
        // sensitive to interior and leading/trailing spaces.
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

pub struct SessionRunner {
    pub judge: JudgeService,
    pub store: Store,
    pub cipher: FieldCipher,
    pub user_id: i64,
}

impl SessionRunner {
    /// Walk the question list: prompt, judge, retry up to [`MAX_ATTEMPTS`],
    /// record on acceptance, skip on exhaustion. Each question contributes
    /// at most one entry and per-question attempt state is discarded once
    /// the question resolves.
    pub async fn collect(
        &self,
        prompter: &mut dyn Prompter,
        questions: &[Question],
    ) -> anyhow::Result<AnswerSet> {
        let mut answers = AnswerSet::default();

        for question in questions {
            let mut attempts = 0u32;
            while attempts < MAX_ATTEMPTS {
                prompter.say(&format!(
                    "Question {}: {}",
                    question.id.number(),
                    question.prompt
                ));
                let raw = prompter.ask("Answer: ")?;

                if self.judge.judge(question, &raw).await? {
                    answers.set(question.id, raw);
                    break;
                }

                attempts += 1;
                prompter.say(console::RETRY_NOTICE);
            }

            if attempts == MAX_ATTEMPTS {
                info!(question = question.id.wire_name(), "question skipped after exhausted retries");
                prompter.say(&console::skip_notice(question.prompt));
            }
        }

        Ok(answers)
    }

    /// The full session state machine: collect, then validate strictly,
    /// then encrypt and persist exactly one record on success. Nothing is
    /// persisted on rejection.
    pub async fn run(
        &self,
        prompter: &mut dyn Prompter,
        questions: &[Question],
    ) -> anyhow::Result<SessionOutcome> {
        let answers = self.collect(prompter, questions).await?;

        let outcome = if validate::validate(&answers) {
            let encrypted = self.cipher.encrypt_answers(&answers)?;
            let record_id = self.store.insert_history(self.user_id, &encrypted)?;
            prompter.say(console::SAVED);
            SessionOutcome::Saved { record_id }
        } else {
            info!(user_id = self.user_id, "answer set rejected by strict validation");
            prompter.say(console::REJECTED);
            SessionOutcome::Rejected
        };

        prompter.say(console::CLOSING);
        Ok(outcome)
    }
}
