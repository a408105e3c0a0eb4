use anyhow::Result;
use assert_cmd::prelude::*;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// A throwaway project directory with the default `data/` layout.
struct LumenTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl LumenTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("data"))?;
        Ok(Self { _tmp: tmp, root })
    }

    fn write_raw(&self, content: &str) -> Result<()> {
        fs::write(self.root.join("data/sample_marketing_data.csv"), content)?;
        Ok(())
    }

    fn report(&self) -> Result<String> {
        Ok(fs::read_to_string(
            self.root.join("data/validation_results.csv"),
        )?)
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn lumen(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lumen"));
        cmd.current_dir(&self.root)
            .env_remove("RUST_LOG")
            .env_remove("LUMEN_DATABASE")
            .env_remove("LUMEN_TABLE")
            .env_remove("LUMEN_REPORT_PATH");
        cmd
    }
}

fn raw_export(latest: &str) -> String {
    format!(
        "Campaign ID,Source,Medium,Date,Spend,Clicks\n\
         1,google,cpc,{latest},10.5,100\n\
         2,newsletter,email,{latest},3.0,40\n\
         3,google,cpc,{latest},12.0,120\n"
    )
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[test]
fn test_ingest_then_validate_passes() -> Result<()> {
    let env = LumenTestEnv::new()?;
    env.write_raw(&raw_export(&today()))?;

    env.lumen()
        .arg("ingest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Raw rows: 3"))
        .stdout(predicate::str::contains("Cleaned rows: 3"))
        .stdout(predicate::str::contains("newsletter"));
    assert!(env.path("data/sample_marketing_data_clean.csv").exists());
    assert!(env.path("data/marketing.duckdb").exists());

    env.lumen()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));
    assert_eq!(env.report()?, "rule,severity,count,sample_rows,run_timestamp\n");
    Ok(())
}

#[test]
fn test_validate_without_table_reports_table_access() -> Result<()> {
    let env = LumenTestEnv::new()?;

    env.lumen()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("critical findings present"));

    let report = env.report()?;
    assert!(report.contains("fact_campaigns_table_access,critical,1,"));
    assert!(report.contains("Error: "));
    Ok(())
}

#[test]
fn test_stale_data_fails_on_latency() -> Result<()> {
    let env = LumenTestEnv::new()?;
    let stale = (Utc::now().date_naive() - Duration::days(30))
        .format("%Y-%m-%d")
        .to_string();
    env.write_raw(&raw_export(&stale))?;

    env.lumen().arg("ingest").assert().success();
    env.lumen()
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("data_latency"));

    let report = env.report()?;
    assert!(report.contains(&format!("data_latency,critical,1,campaign_id=1|date={stale}")));
    Ok(())
}

#[test]
fn test_blank_taxonomy_is_flagged_after_ingest() -> Result<()> {
    let env = LumenTestEnv::new()?;
    let latest = today();
    env.write_raw(&format!(
        "campaign_id,source,medium,date\n1,google,cpc,{latest}\n2,,email,{latest}\n"
    ))?;

    env.lumen().arg("ingest").assert().success();
    env.lumen().arg("validate").assert().failure();

    let report = env.report()?;
    assert!(report.contains(&format!("missing_taxonomy,critical,1,campaign_id=2|date={latest}")));
    Ok(())
}

#[test]
fn test_ingest_missing_input_fails() -> Result<()> {
    let env = LumenTestEnv::new()?;

    env.lumen()
        .arg("ingest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input CSV not found at"));
    Ok(())
}

#[test]
fn test_flags_override_defaults() -> Result<()> {
    let env = LumenTestEnv::new()?;
    let input = env.path("exports/raw.csv");
    fs::create_dir_all(env.path("exports"))?;
    fs::write(&input, raw_export(&today()))?;

    env.lumen()
        .args(["ingest", "--table", "campaigns_daily", "--database", "db/alt.duckdb"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success();

    env.lumen()
        .args([
            "validate",
            "--table",
            "campaigns_daily",
            "--database",
            "db/alt.duckdb",
            "--output",
            "out/findings.csv",
        ])
        .assert()
        .success();
    assert!(env.path("out/findings.csv").exists());
    Ok(())
}

#[test]
fn test_manifest_table_is_used() -> Result<()> {
    let env = LumenTestEnv::new()?;
    fs::write(env.path("lumen.yaml"), "name: acme\ntable: campaigns_v2\n")?;

    env.lumen()
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Project: acme"));
    assert!(env.report()?.contains("campaigns_v2_table_access"));
    Ok(())
}

#[test]
fn test_broken_manifest_fails_validation() -> Result<()> {
    let env = LumenTestEnv::new()?;
    fs::write(env.path("lumen.yaml"), "table: [unclosed\n")?;

    env.lumen()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed:"))
        .stderr(predicate::str::contains("lumen.yaml"));
    assert!(!env.path("data/validation_results.csv").exists());
    Ok(())
}
