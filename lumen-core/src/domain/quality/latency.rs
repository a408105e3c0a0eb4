// lumen-core/src/domain/quality/latency.rs

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::quality::{
    Preflight, QualityRule, RuleOutcome, RunContext, Severity, StructuralGap,
};
use crate::domain::record::{Dataset, Record, parse_date};

const DATE_COLUMN: &str = "date";

pub const DEFAULT_MAX_AGE_DAYS: i64 = 3;

/// The newest row must be at most `max_age_days` old.
#[derive(Debug, Clone, Copy)]
pub struct DataLatency {
    pub max_age_days: i64,
}

impl Default for DataLatency {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

/// First record holding the maximum parseable date.
pub fn latest_record(records: &[Record]) -> Option<(NaiveDate, &Record)> {
    records
        .iter()
        .filter_map(|record| parse_date(record.get(DATE_COLUMN)).map(|date| (date, record)))
        .fold(None, |latest, (date, record)| match latest {
            Some((best, _)) if date <= best => latest,
            _ => Some((date, record)),
        })
}

impl QualityRule for DataLatency {
    fn key(&self) -> &'static str {
        "data_latency"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn empty_sample_message(&self) -> &'static str {
        "No recent data available"
    }

    fn evaluate<'a>(&self, dataset: &'a Dataset, ctx: &RunContext) -> RuleOutcome<'a> {
        let records = match Preflight::require(dataset, &[DATE_COLUMN]) {
            Preflight::Gap(StructuralGap::EmptyDataset) => return RuleOutcome::structural(None),
            Preflight::Gap(StructuralGap::MissingColumns(_)) => {
                return RuleOutcome::structural(dataset.records().first());
            }
            Preflight::Ready(records) => records,
        };

        let Some((latest, record)) = latest_record(records) else {
            debug!(table = dataset.table(), "no parseable date in snapshot");
            return RuleOutcome::structural(None);
        };

        let age_days = (ctx.today() - latest).num_days();
        debug!(%latest, age_days, "freshness measured");
        if age_days > self.max_age_days {
            RuleOutcome::structural(Some(record))
        } else {
            RuleOutcome::pass()
        }
    }
}
