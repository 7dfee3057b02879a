use crate::model::EncryptedAnswers;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub id: i64,
    pub user_id: i64,
    pub answers: EncryptedAnswers,
    pub created_at: String,
}

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    /// Single atomic insert of one submission. Absent ciphertexts are
    /// stored as NULL, never as placeholder values. Store failure is fatal
    /// to the run and is never retried here.
    pub fn insert_history(
        &self,
        user_id: i64,
        answers: &EncryptedAnswers,
    ) -> anyhow::Result<i64> {
        let created_at = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO medical_history(user_id, diabetes, last_checkup, medications, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                answers.diabetes_history,
                answers.last_checkup,
                answers.medications,
                created_at,
            ],
        )?;
        let record_id = conn.last_insert_rowid();
        info!(record_id, user_id, "medical history record inserted");
        Ok(record_id)
    }

    pub fn list_history(&self) -> anyhow::Result<Vec<HistoryRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, diabetes, last_checkup, medications, created_at
             FROM medical_history ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(HistoryRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                answers: EncryptedAnswers {
                    diabetes_history: row.get(2)?,
                    last_checkup: row.get(3)?,
                    medications: row.get(4)?,
                },
                created_at: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
