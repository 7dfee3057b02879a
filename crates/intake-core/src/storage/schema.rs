pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS medical_history (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id INTEGER NOT NULL,
  diabetes TEXT,
  last_checkup TEXT,
  medications TEXT,
  created_at TEXT NOT NULL
);
"#;
