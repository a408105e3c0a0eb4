// lumen-core/src/domain/quality/finding.rs

use chrono::{DateTime, NaiveDate, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run values shared by every rule and every report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        // The report carries second precision only
        let started_at = started_at.with_nanosecond(0).unwrap_or(started_at);
        Self { started_at }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Calendar day (UTC) used for freshness checks.
    pub fn today(&self) -> NaiveDate {
        self.started_at.date_naive()
    }

    /// `2024-03-10T06:30:00+00:00`
    pub fn run_timestamp(&self) -> String {
        self.started_at.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

/// One row of the findings report. Field order is the report's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    pub count: usize,
    pub sample_rows: String,
    pub run_timestamp: String,
}

impl Finding {
    pub const COLUMNS: [&'static str; 5] =
        ["rule", "severity", "count", "sample_rows", "run_timestamp"];

    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        count: usize,
        sample_rows: impl Into<String>,
        ctx: &RunContext,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            count,
            sample_rows: sample_rows.into(),
            run_timestamp: ctx.run_timestamp(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// True when at least one finding must fail the run.
pub fn has_critical(findings: &[Finding]) -> bool {
    findings.iter().any(Finding::is_critical)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_timestamp_format() {
        let started = Utc.with_ymd_and_hms(2024, 3, 10, 6, 30, 0).unwrap()
            + chrono::Duration::milliseconds(750);
        let ctx = RunContext::new(started);
        assert_eq!(ctx.run_timestamp(), "2024-03-10T06:30:00+00:00");
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn test_critical_flag() {
        let ctx = RunContext::now();
        let warning = Finding::new("zscore_outliers", Severity::Warning, 2, "id=1", &ctx);
        let critical = Finding::new("data_latency", Severity::Critical, 1, "", &ctx);

        assert!(!has_critical(&[]));
        assert!(!has_critical(std::slice::from_ref(&warning)));
        assert!(has_critical(&[warning, critical]));
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
    }
}
