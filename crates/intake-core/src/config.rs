use crate::crypto::FieldCipher;
use std::io::{BufRead, Write};
use tracing::warn;

/// Fixed demo identity; stands in for real session management.
pub const DEMO_USER_ID: i64 = 12345;

pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_JUDGE_TIMEOUT_SECONDS: u64 = 30;

/// Read a required secret from the environment, falling back to an
/// interactive prompt on stderr when it is unset or empty.
pub fn require_secret(var: &str) -> anyhow::Result<String> {
    if let Ok(value) = std::env::var(var) {
        if !value.is_empty() {
            return Ok(value);
        }
    }

    // TODO: mask the interactive read (getpass-style); this echoes the
    // typed secret to the terminal.
    eprint!("{}: ", var);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let value = line.trim().to_string();
    anyhow::ensure!(!value.is_empty(), "no value provided for {}", var);
    Ok(value)
}

/// Build the field cipher from configured key material, or generate a fresh
/// key when none is configured. Generated keys are surfaced so the data
/// written in this run stays readable in later ones.
pub fn load_cipher(key_hex: Option<&str>) -> anyhow::Result<FieldCipher> {
    match key_hex {
        Some(hex) => FieldCipher::from_hex(hex),
        None => {
            let cipher = FieldCipher::generate();
            warn!(
                key = cipher.key_hex().as_str(),
                "INTAKE_ENCRYPTION_KEY not set; generated a fresh key. Save it or this run's records will be unreadable."
            );
            Ok(cipher)
        }
    }
}
