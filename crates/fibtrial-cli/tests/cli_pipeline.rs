use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Runs inside the database's directory so the default report.md lands in the tempdir.
fn fibtrial(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fibtrial").unwrap();
    if let Some(dir) = db.parent() {
        cmd.current_dir(dir);
    }
    cmd.env_remove("FIBTRIAL_DB")
        .env_remove("FIBTRIAL_COUNT")
        .env_remove("FIBTRIAL_LOG")
        .env_remove("FIBTRIAL_LOG_FORMAT")
        .arg("--db")
        .arg(db)
        .arg("--log-level")
        .arg("warn");
    cmd
}

fn run_json(db: &Path, name: &str, extra: &[&str]) -> serde_json::Value {
    let out = fibtrial(db)
        .args(["run", "--name", name, "--format", "json"])
        .args(extra)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn test_run_persists_and_summarizes() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    let v = run_json(&db, "Ana", &["--count", "5"]);
    assert_eq!(v["saved"], 5);
    assert_eq!(v["summary"]["even_count"], 2);
    assert_eq!(v["summary"]["odd_count"], 3);
    assert_eq!(v["candidate"]["name"], "Ana");

    let conn = rusqlite::Connection::open(&db).unwrap();
    let n: i64 = conn
        .query_row("SELECT count(*) FROM test_results", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 5);
}

#[test]
fn test_run_writes_export_and_report() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");
    let export = dir.path().join("out/results.json");
    let report = dir.path().join("out/report.md");

    fibtrial(&db)
        .args(["run", "--name", "Ana", "--prune-above"])
        .arg("--export")
        .arg(&export)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(contains("candidate_id=1"))
        .stderr(contains("Summary: 20 total, 7 even, 13 odd"));

    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[3]["value"], 2);
    assert_eq!(rows[3]["parity"], "even");

    let md = fs::read_to_string(&report).unwrap();
    let re = regex::Regex::new(r"_Report generated at \d{4}-\d{2}-\d{2}T[^_]+_").unwrap();
    assert!(re.is_match(&md), "missing footer:\n{md}");
    assert!(md.contains("| 1 | 4181 |"));
}

#[test]
fn test_empty_name_fails_with_pipeline_code() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    fibtrial(&db)
        .args(["run", "--name", "   "])
        .assert()
        .code(1)
        .stderr(contains("E_VALIDATION"))
        .stderr(contains("candidate name must not be empty"));
}

#[test]
fn test_count_out_of_range_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    fibtrial(&db)
        .args(["run", "--name", "Ana", "--count", "0"])
        .assert()
        .code(1)
        .stderr(contains("count must be between 1 and 93"));
}

#[test]
fn test_summary_unknown_candidate_not_found() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    fibtrial(&db)
        .args(["summary", "--candidate", "9"])
        .assert()
        .code(1)
        .stderr(contains("not found"));
}

#[test]
fn test_delete_removes_results() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    run_json(&db, "Ana", &["--count", "6"]);
    run_json(&db, "Bia", &["--count", "4"]);

    fibtrial(&db)
        .args(["delete", "--candidate", "1"])
        .assert()
        .success()
        .stderr(contains("deleted candidate 1 (6 results)"));

    let out = fibtrial(&db)
        .args(["list", "--candidate", "1", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
    assert!(rows.is_empty());

    fibtrial(&db)
        .args(["delete", "--candidate", "1"])
        .assert()
        .code(1);
}

#[test]
fn test_list_parity_filter() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");
    run_json(&db, "Ana", &["--count", "10"]);

    let out = fibtrial(&db)
        .args(["list", "--parity", "even", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
    let values: Vec<u64> = rows.iter().map(|r| r["value"].as_u64().unwrap()).collect();
    assert_eq!(values, vec![0, 2, 8, 34]);
}

#[test]
fn test_config_file_and_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");
    let config = dir.path().join("fibtrial.yaml");
    fs::write(&config, "count: 7\ntop_n: 2\nflavour: mint\n").unwrap();

    let out = fibtrial(&db)
        .arg("--config")
        .arg(&config)
        .args(["run", "--name", "Ana", "--format", "json"])
        .assert()
        .success()
        .stderr(contains("flavour"))
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["summary"]["total_count"], 7);
    assert_eq!(v["top"], serde_json::json!([8, 5]));
}

#[test]
fn test_missing_config_is_config_error() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    fibtrial(&db)
        .arg("--config")
        .arg(dir.path().join("nope.yaml"))
        .args(["run", "--name", "Ana"])
        .assert()
        .code(2)
        .stderr(contains("failed to read config"));
}

#[test]
fn test_export_and_prune_commands() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");
    let out = dir.path().join("all.json");
    run_json(&db, "Ana", &["--count", "30"]);

    fibtrial(&db)
        .args(["prune", "--above", "100"])
        .assert()
        .success()
        .stderr(contains("removed 18 results above 100"));

    fibtrial(&db)
        .args(["export", "--out"])
        .arg(&out)
        .assert()
        .success();
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rows.len(), 12);

    fibtrial(&db)
        .args(["export", "--candidate", "5", "--out"])
        .arg(&out)
        .assert()
        .code(1);
}

#[test]
fn test_run_writes_default_report() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    let v = run_json(&db, "Ana", &["--count", "5"]);
    assert_eq!(v["report"], "report.md");
    let md = fs::read_to_string(dir.path().join("report.md")).unwrap();
    assert!(md.contains("- **Name**: Ana"));
}

#[test]
fn test_no_report_skips_file() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    let v = run_json(&db, "Ana", &["--count", "5", "--no-report"]);
    assert!(v["report"].is_null());
    assert!(!dir.path().join("report.md").exists());
}

#[test]
fn test_stats_command() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");
    run_json(&db, "Ana", &["--count", "6"]);
    run_json(&db, "Bia", &["--count", "4"]);

    let out = fibtrial(&db)
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["candidates"], 2);
    assert_eq!(v["results"], 10);
    assert_eq!(v["last_candidate_id"], 2);
    assert_eq!(v["version"], "1");

    fibtrial(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(contains("results:        10"));
}

#[test]
fn test_bad_env_count_is_config_error() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");

    fibtrial(&db)
        .env("FIBTRIAL_COUNT", "lots")
        .args(["run", "--name", "Ana"])
        .assert()
        .code(2)
        .stderr(contains("E_CONFIG"))
        .stderr(contains("FIBTRIAL_COUNT"));
    assert!(!db.exists());
}

#[test]
fn test_run_prune_trims_other_candidates() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fibtrial.db");
    run_json(&db, "Ana", &["--count", "30"]);

    let v = run_json(&db, "Bia", &["--count", "10", "--prune-above"]);
    assert_eq!(v["pruned"], 10);

    let out = fibtrial(&db)
        .args(["list", "--candidate", "1", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
    assert_eq!(rows.len(), 20);

    Command::cargo_bin("fibtrial")
        .unwrap()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(contains("ALL candidates"));
}
