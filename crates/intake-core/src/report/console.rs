use crate::crypto::FieldCipher;
use crate::storage::HistoryRow;

pub const SAVED: &str = "Data successfully saved.";
pub const REJECTED: &str = "The data provided is invalid.";
pub const CLOSING: &str = "Thank you for completing the questionnaire. Have a great day!";
pub const RETRY_NOTICE: &str = "That response doesn't seem right. Please try again.";

pub fn skip_notice(prompt: &str) -> String {
    format!(
        "Skipping to the next question after 3 failed attempts for: '{}'",
        prompt
    )
}

/// Decrypt and print persisted submissions, one per line. Fields that were
/// skipped during collection print as "-".
pub fn print_history(rows: &[HistoryRow], cipher: &FieldCipher) -> anyhow::Result<()> {
    for row in rows {
        let field = |token: Option<&str>| -> anyhow::Result<String> {
            match token {
                Some(t) => cipher.decrypt_field(t),
                None => Ok("-".to_string()),
            }
        };
        println!(
            "#{} user={} diabetes={} last_checkup={} medications={} ({})",
            row.id,
            row.user_id,
            field(row.answers.diabetes_history.as_deref())?,
            field(row.answers.last_checkup.as_deref())?,
            field(row.answers.medications.as_deref())?,
            row.created_at,
        );
    }
    eprintln!("Records: {}", rows.len());
    Ok(())
}
