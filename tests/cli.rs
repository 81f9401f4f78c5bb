//! End-to-end tests for the `mdg` binary against fixture counter files.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;


const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 9999 1 0 0 0 0 0 0 9999 1 0 0 0 0 0 0
rmnet0: 3000 10 0 0 0 0 0 0 2000 10 0 0 0 0 0 0
 wlan0: 500000 10 0 0 0 0 0 0 400000 10 0 0 0 0 0 0
";

const UID_STATS: &str = "\
idx iface acct_tag_hex uid_tag_int cnt_set rx_bytes rx_packets tx_bytes tx_packets
2 rmnet0 0x0 10123 0 1000 10 200 2
3 rmnet0 0x0 10200 0 300 3 100 1
";

const PACKAGES: &str = "\
com.example.maps 10123 0 /data/user/0/com.example.maps default none
com.example.mail 10200 0 /data/user/0/com.example.mail default none
";


struct Env {
    dir: TempDir,
    config: PathBuf,
    db: PathBuf,
}


impl Env {
    fn new() -> Self {
        Self::with_net_dev(Some(NET_DEV))
    }

    /// `None` leaves the device counter file missing.
    fn with_net_dev(net_dev: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        let net_dev_path = dir.path().join("net_dev");
        let uid_stats_path = dir.path().join("uid_stats");
        let packages_path = dir.path().join("packages.list");

        if let Some(content) = net_dev {
            fs::write(&net_dev_path, content).unwrap();
        }
        fs::write(&uid_stats_path, UID_STATS).unwrap();
        fs::write(&packages_path, PACKAGES).unwrap();

        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[platform]\n\
                 proc_net_dev = '{}'\n\
                 uid_stats = '{}'\n\
                 packages_list = '{}'\n\
                 settings_command = [\"true\"]\n",
                net_dev_path.display(),
                uid_stats_path.display(),
                packages_path.display(),
            ),
        )
        .unwrap();

        let db = dir.path().join("usage.db");
        Self { dir, config, db }
    }

    fn mdg(&self) -> Command {
        let mut cmd = Command::cargo_bin("mdg").unwrap();
        cmd.env_remove("MDG_CONFIG")
            .env_remove("MDG_DB")
            .env("MDG_LOG", "off")
            .arg("--config")
            .arg(&self.config)
            .arg("--db")
            .arg(&self.db);
        cmd
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}


fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}


#[test]
fn test_no_subcommand_prints_help() {
    Command::cargo_bin("mdg")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}


#[test]
fn test_config_init_then_show() {
    let env = Env::new();
    let fresh = env.path("nested/config.toml");

    Command::cargo_bin("mdg")
        .unwrap()
        .env_remove("MDG_CONFIG")
        .arg("--config")
        .arg(&fresh)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nested"));

    Command::cargo_bin("mdg")
        .unwrap()
        .env_remove("MDG_CONFIG")
        .arg("--config")
        .arg(&fresh)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(read(&fresh).contains("sample_interval_secs = 30"));

    env.mdg()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("daily_alert_mb = 500"))
        .stdout(predicate::str::contains("net_dev"));
}


#[test]
fn test_invalid_config_is_rejected() {
    let env = Env::new();
    fs::write(&env.config, "[monitor]\nsample_interval_secs = 0\n").unwrap();

    env.mdg()
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}


#[test]
fn test_oversized_retention_in_config_is_rejected() {
    let env = Env::new();
    let config = format!("{}\n[monitor]\nretention_days = 100000000\n", read(&env.config));
    fs::write(&env.config, config).unwrap();

    env.mdg()
        .arg("daemon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("retention_days must be at most"));
}


#[test]
fn test_sample_then_export() {
    let env = Env::new();

    env.mdg()
        .arg("sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample #1 recorded (daily)"));

    let output = env.path("out/usage.csv");
    env.mdg()
        .arg("export")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 samples"));

    let csv = read(&output);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Timestamp,Date,Total TX (Bytes),Total RX (Bytes),Total (MB),Period")
    );
    let row = lines.next().unwrap();
    assert!(row.ends_with(",2000,3000,0.00,daily"), "row was {row}");
    assert_eq!(lines.next(), None);
}


#[test]
fn test_second_sample_records_only_the_delta() {
    let env = Env::new();
    env.mdg().args(["sample", "--period", "weekly"]).assert().success();

    fs::write(
        env.path("net_dev"),
        NET_DEV.replace("rmnet0: 3000", "rmnet0: 4500"),
    )
    .unwrap();
    env.mdg().args(["sample", "--period", "weekly"]).assert().success();

    let output = env.path("usage.csv");
    env.mdg().arg("export").arg("-o").arg(&output).assert().success();

    let csv = read(&output);
    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].ends_with(",0,1500,0.00,weekly"), "row was {}", rows[1]);
}


#[test]
fn test_sample_fails_without_counters() {
    let env = Env::with_net_dev(None);

    env.mdg()
        .arg("sample")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    env.mdg()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No samples recorded"));
}


#[test]
fn test_apps_lists_latest_consumers() {
    let env = Env::new();
    env.mdg().arg("sample").assert().success();

    env.mdg()
        .arg("apps")
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.maps"))
        .stdout(predicate::str::contains("com.example.mail"));
}


#[test]
fn test_block_without_policy_is_recorded_but_not_enforced() {
    let env = Env::new();

    env.mdg()
        .args(["block", "10123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Blocked background data for com.example.maps"))
        .stdout(predicate::str::contains("Network policy not applied"));

    env.mdg()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No samples recorded"));

    env.mdg()
        .args(["unblock", "10123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unblocked"));
}


#[test]
fn test_limit_set_list_remove() {
    let env = Env::new();
    env.mdg().arg("sample").assert().success();

    env.mdg()
        .args(["limit", "set", "10123", "--daily", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100 MB/day, 3500 MB/week"));

    env.mdg()
        .args(["limit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.maps"))
        .stdout(predicate::str::contains("15000"));

    env.mdg()
        .args(["limit", "remove", "10123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Limits removed"));

    env.mdg()
        .args(["limit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No app limits configured"));
}


#[test]
fn test_manual_disable_is_recorded_in_history() {
    let env = Env::new();

    env.mdg().args(["data", "disable"]).assert().success();

    env.mdg()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"))
        .stdout(predicate::str::contains("manual"))
        .stdout(predicate::str::is_match(r"\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}").unwrap());
}


#[test]
fn test_failed_settings_launch_leaves_no_history() {
    let env = Env::new();
    let config = read(&env.config).replace("[\"true\"]", "[\"/nonexistent/am\"]");
    fs::write(&env.config, config).unwrap();

    env.mdg()
        .args(["data", "enable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    env.mdg()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No toggle history recorded"));
}


#[test]
fn test_usage_dashboard_renders() {
    let env = Env::new();
    env.mdg().arg("sample").assert().success();

    env.mdg().arg("usage").assert().success();
}


#[test]
fn test_reset_force_clears_and_backs_up() {
    let env = Env::new();
    env.mdg().arg("sample").assert().success();
    env.mdg().args(["data", "disable"]).assert().success();

    env.mdg()
        .args(["reset", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared"));

    assert!(env.path("usage.db.bak").exists());

    env.mdg()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No samples recorded"));
    env.mdg()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No toggle history recorded"));
}


#[test]
fn test_prune_rejects_out_of_range_days() {
    let env = Env::new();

    env.mdg()
        .args(["prune", "--days", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one day"));

    env.mdg()
        .args(["prune", "--days", "100000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 36500 days"));

    env.mdg()
        .args(["prune", "--days", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned 0 samples"));
}
