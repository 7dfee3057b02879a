use crate::model::AnswerSet;
use chrono::NaiveDate;

/// Strict schema check over the collected answers. Pure; short-circuit
/// conjunction in rule order:
/// - diabetes history must be present and exactly "Yes" or "No"
///   (case-sensitive, untrimmed);
/// - last checkup, if present, must parse as a real YYYY-MM-DD date;
/// - medications is never checked.
pub fn validate(answers: &AnswerSet) -> bool {
    match answers.diabetes_history.as_deref() {
        Some("Yes") | Some("No") => {}
        _ => return false,
    }

    if let Some(date) = answers.last_checkup.as_deref() {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return false;
        }
    }

    true
}
