pub const SCHEMA_VERSION: i64 = 1;

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS candidates (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL CHECK (length(trim(name)) > 0),
  registered_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS test_results (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  candidate_id INTEGER NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
  sequence_index INTEGER NOT NULL CHECK (sequence_index >= 0),
  value INTEGER NOT NULL CHECK (value >= 0),
  parity TEXT NOT NULL CHECK (parity IN ('even', 'odd')),
  UNIQUE (candidate_id, sequence_index)
);

CREATE INDEX IF NOT EXISTS idx_test_results_parity ON test_results(parity);
"#;
