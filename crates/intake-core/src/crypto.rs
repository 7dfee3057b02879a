use crate::model::{AnswerSet, EncryptedAnswers};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};

const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;

/// Field-level symmetric cipher (XChaCha20-Poly1305). The key is injected
/// at construction; lifecycle lives in config, not in this module.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: XChaCha20Poly1305,
    key: Key,
}

impl FieldCipher {
    pub fn generate() -> Self {
        let key = XChaCha20Poly1305::generate_key(&mut OsRng);
        Self::from_key(key)
    }

    pub fn from_hex(key_hex: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|e| anyhow::anyhow!("encryption key is not valid hex: {}", e))?;
        anyhow::ensure!(
            bytes.len() == KEY_LEN,
            "encryption key must be {} bytes ({} hex chars), got {} bytes",
            KEY_LEN,
            KEY_LEN * 2,
            bytes.len()
        );
        Ok(Self::from_key(Key::clone_from_slice(&bytes)))
    }

    fn from_key(key: Key) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(&key),
            key,
        }
    }

    pub fn key_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// Fresh random nonce per value; token is hex(nonce || ciphertext).
    pub fn encrypt_field(&self, value: &str) -> anyhow::Result<String> {
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, value.as_bytes())
            .map_err(|e| anyhow::anyhow!("field encryption failed: {}", e))?;
        let mut raw = nonce.to_vec();
        raw.extend_from_slice(&ciphertext);
        Ok(hex::encode(raw))
    }

    pub fn decrypt_field(&self, token: &str) -> anyhow::Result<String> {
        let raw = hex::decode(token)
            .map_err(|e| anyhow::anyhow!("ciphertext token is not valid hex: {}", e))?;
        anyhow::ensure!(raw.len() > NONCE_LEN, "ciphertext token too short");
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| anyhow::anyhow!("field decryption failed (wrong key?)"))?;
        Ok(String::from_utf8(plaintext)?)
    }

    /// Per-field encryption over the answer set; absent fields stay absent.
    pub fn encrypt_answers(&self, answers: &AnswerSet) -> anyhow::Result<EncryptedAnswers> {
        Ok(EncryptedAnswers {
            diabetes_history: answers
                .diabetes_history
                .as_deref()
                .map(|v| self.encrypt_field(v))
                .transpose()?,
            last_checkup: answers
                .last_checkup
                .as_deref()
                .map(|v| self.encrypt_field(v))
                .transpose()?,
            medications: answers
                .medications
                .as_deref()
                .map(|v| self.encrypt_field(v))
                .transpose()?,
        })
    }
}
