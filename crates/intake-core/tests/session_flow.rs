use intake_core::crypto::FieldCipher;
use intake_core::engine::runner::{Prompter, SessionRunner};
use intake_core::judge::{JudgeService, SubstringPolicy};
use intake_core::model::{Question, QuestionId, SessionOutcome};
use intake_core::providers::llm::scripted::ScriptedClient;
use intake_core::storage::Store;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const ACCEPT: &str = "That is a valid answer.";
const REJECT: &str = "That does not look right.";

struct ScriptedPrompter {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedPrompter {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    fn prompts_for_question(&self, number: u32) -> usize {
        let prefix = format!("Question {}:", number);
        self.transcript
            .iter()
            .filter(|l| l.starts_with(&prefix))
            .count()
    }

    fn said(&self, line: &str) -> bool {
        self.transcript.iter().any(|l| l == line)
    }
}

impl Prompter for ScriptedPrompter {
    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn ask(&mut self, _prompt: &str) -> anyhow::Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("prompter script exhausted"))
    }
}

fn runner(db_path: &Path, judgments: &[&str]) -> anyhow::Result<SessionRunner> {
    let store = Store::open(db_path)?;
    store.init_schema()?;
    let client = Arc::new(ScriptedClient::new(
        judgments.iter().map(|s| s.to_string()).collect(),
    ));
    Ok(SessionRunner {
        judge: JudgeService::new(client, Box::new(SubstringPolicy), Duration::from_secs(5)),
        store,
        cipher: FieldCipher::generate(),
        user_id: 12345,
    })
}

fn row_count(db_path: &Path) -> anyhow::Result<i64> {
    let conn = rusqlite::Connection::open(db_path)?;
    Ok(conn.query_row("SELECT count(*) FROM medical_history", [], |r| r.get(0))?)
}

#[tokio::test]
async fn exhausted_retries_leave_no_entry_and_issue_three_prompts() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("intake.db");

    // Every attempt for every question gets rejected.
    let runner = runner(&db, &[REJECT; 9])?;
    let mut prompter = ScriptedPrompter::new(&[
        "a", "b", "c", "d", "e", "f", "g", "h", "i",
    ]);

    let answers = runner
        .collect(&mut prompter, &Question::intake_set())
        .await?;

    assert_eq!(answers, Default::default());
    for n in 1..=3 {
        assert_eq!(prompter.prompts_for_question(n), 3);
    }
    Ok(())
}

#[tokio::test]
async fn acceptance_stops_retries_and_records_the_last_answer() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("intake.db");

    // Question 1 accepted on the second attempt, the rest first try.
    let runner = runner(&db, &[REJECT, ACCEPT, ACCEPT, ACCEPT])?;
    let mut prompter = ScriptedPrompter::new(&["first try", "Yes", "2024-01-01", "none"]);

    let answers = runner
        .collect(&mut prompter, &Question::intake_set())
        .await?;

    assert_eq!(prompter.prompts_for_question(1), 2);
    assert_eq!(prompter.prompts_for_question(2), 1);
    assert_eq!(answers.get(QuestionId::DiabetesHistory), Some("Yes"));
    assert_eq!(answers.last_checkup.as_deref(), Some("2024-01-01"));
    assert_eq!(answers.medications.as_deref(), Some("none"));
    Ok(())
}

#[tokio::test]
async fn happy_path_persists_one_encrypted_record() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("intake.db");

    let runner = runner(&db, &[ACCEPT, ACCEPT, ACCEPT])?;
    let mut prompter = ScriptedPrompter::new(&["Yes", "2024-01-01", "none"]);

    let outcome = runner.run(&mut prompter, &Question::intake_set()).await?;
    assert!(matches!(outcome, SessionOutcome::Saved { .. }));
    assert!(prompter.said("Data successfully saved."));
    assert!(prompter.said(
        "Thank you for completing the questionnaire. Have a great day!"
    ));

    assert_eq!(row_count(&db)?, 1);

    let conn = rusqlite::Connection::open(&db)?;
    let (user_id, diabetes, checkup, meds): (i64, String, String, String) = conn.query_row(
        "SELECT user_id, diabetes, last_checkup, medications FROM medical_history",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )?;
    assert_eq!(user_id, 12345);

    // Stored at rest as ciphertext, readable with the session key.
    assert_ne!(diabetes, "Yes");
    assert_eq!(runner.cipher.decrypt_field(&diabetes)?, "Yes");
    assert_eq!(runner.cipher.decrypt_field(&checkup)?, "2024-01-01");
    assert_eq!(runner.cipher.decrypt_field(&meds)?, "none");
    Ok(())
}

#[tokio::test]
async fn rejected_session_persists_nothing() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("intake.db");

    // Question 1 never accepted; the rest pass.
    let runner = runner(&db, &[REJECT, REJECT, REJECT, ACCEPT, ACCEPT])?;
    let mut prompter = ScriptedPrompter::new(&["maybe", "maybe", "maybe", "2024-01-01", "none"]);

    let outcome = runner.run(&mut prompter, &Question::intake_set()).await?;
    assert_eq!(outcome, SessionOutcome::Rejected);
    assert!(prompter.said("The data provided is invalid."));
    assert!(prompter.said(
        "Skipping to the next question after 3 failed attempts for: 'Do you have a history of diabetes? (Yes/No)'"
    ));
    assert_eq!(row_count(&db)?, 0);
    Ok(())
}

#[tokio::test]
async fn judge_transport_failure_is_fatal() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("intake.db");

    // Script runs dry with no fallback: the second judgment call errors.
    let runner = runner(&db, &[ACCEPT])?;
    let mut prompter = ScriptedPrompter::new(&["Yes", "2024-01-01", "none"]);

    let result = runner.run(&mut prompter, &Question::intake_set()).await;
    assert!(result.is_err());
    assert_eq!(row_count(&db)?, 0);
    Ok(())
}
