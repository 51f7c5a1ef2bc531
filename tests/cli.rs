//! Integration tests for the pms binary.
//!
//! Only offline commands are exercised here; the HTTP client is covered
//! by `api_client.rs`.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a pms Command isolated in `dir`
fn pms(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pms");
    cmd.current_dir(dir.path())
        .arg("--state-dir")
        .arg(dir.path())
        .env_remove("PMS_API_URL")
        .env_remove("PMS_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_pms_help() {
        cargo_bin_cmd!("pms")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("kanban"))
            .stdout(predicate::str::contains("orgs"));
    }

    #[test]
    fn test_pms_version() {
        cargo_bin_cmd!("pms")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_whoami_logged_out() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .arg("whoami")
            .assert()
            .success()
            .stdout(predicate::str::contains("Not logged in."));
    }

    #[test]
    fn test_networked_command_requires_login() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["orgs", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not logged in"));
    }

    #[test]
    fn test_invalid_task_deadline_rejected_by_parser() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["tasks", "create", "--phase", "p1", "--name", "x", "--deadline", "tomorrow"])
            .assert()
            .failure();
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No pms.toml found"))
            .stdout(predicate::str::contains("http://localhost:8000/"));
    }

    #[test]
    fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created pms.toml"));

        let content = fs::read_to_string(dir.path().join("pms.toml")).unwrap();
        assert!(content.contains("base_url"));

        pms(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("pms.toml"),
            "[api]\nbase_url = \"ftp://pms.example.com\"\ntimeout_secs = 0\n",
        )
        .unwrap();

        pms(&dir)
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration warnings"))
            .stdout(predicate::str::contains("timeout_secs"));
    }

    #[test]
    fn test_cli_api_url_overrides_file() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["--api-url", "https://pms.example.com/api", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://pms.example.com/api/"));
    }

    #[test]
    fn test_broken_config_file_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pms.toml"), "[api\n").unwrap();

        pms(&dir)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse pms.toml"));
    }
}

// =============================================================================
// Kanban Column Order Tests
// =============================================================================

mod kanban {
    use super::*;

    #[test]
    fn test_show_default_order() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["kanban", "show", "ph1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1. On hold"))
            .stdout(predicate::str::contains("2. In progress"))
            .stdout(predicate::str::contains("3. Completed"));
    }

    #[test]
    fn test_move_persists_per_phase() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["kanban", "move", "ph1", "3", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1. Completed"));

        let stored = fs::read_to_string(dir.path().join("kanban.json")).unwrap();
        assert!(stored.contains("kanban_ph1"));

        pms(&dir)
            .args(["kanban", "show", "ph1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1. Completed"))
            .stdout(predicate::str::contains("2. On hold"));

        pms(&dir)
            .args(["kanban", "show", "ph2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1. On hold"));
    }

    #[test]
    fn test_move_out_of_range_fails() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["kanban", "move", "ph1", "0", "4"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("between 1 and 3"));
        assert!(!dir.path().join("kanban.json").exists());
    }

    #[test]
    fn test_reset_restores_default() {
        let dir = TempDir::new().unwrap();
        pms(&dir)
            .args(["kanban", "move", "ph1", "1", "3"])
            .assert()
            .success();
        pms(&dir)
            .args(["kanban", "reset", "ph1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("reset to default"));
        pms(&dir)
            .args(["kanban", "show", "ph1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1. On hold"));
    }

    #[test]
    fn test_malformed_saved_order_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("kanban.json"),
            r#"{"kanban_ph1": ["completed", "completed", "onHold"]}"#,
        )
        .unwrap();
        pms(&dir)
            .args(["kanban", "show", "ph1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1. On hold"));
    }
}
