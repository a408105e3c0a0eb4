// lumen-core/src/application/validation.rs

use tracing::{error, info, instrument, warn};

use crate::domain::quality::{Finding, RunContext, Severity, default_rules, evaluate_all, has_critical};
use crate::error::LumenError;
use crate::ports::report::ReportSink;
use crate::ports::source::RecordSource;

/// Outcome of one validation run, in report order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRun {
    pub findings: Vec<Finding>,
    pub critical_found: bool,
}

/// Loads the snapshot once, runs every rule on it and hands the findings to the sink.
///
/// A snapshot that cannot be loaded is itself a critical finding; the rules are
/// skipped. Only a sink failure is returned as an error.
#[instrument(skip(source, sink, ctx), fields(engine = source.engine_name()))]
pub async fn run_validations(
    source: &dyn RecordSource,
    sink: &dyn ReportSink,
    table: &str,
    ctx: &RunContext,
) -> Result<ValidationRun, LumenError> {
    let findings = match source.load_table(table).await {
        Ok(dataset) => {
            info!(rows = dataset.len(), columns = dataset.columns().len(), "running quality rules");
            evaluate_all(&default_rules(), &dataset, ctx)
        }
        Err(e) => {
            let rule = if e.is_database_error() {
                format!("{}_table_access", table)
            } else {
                format!("{}_load_failure", table)
            };
            error!(rule = %rule, error = %e, "snapshot could not be loaded");
            vec![Finding::new(rule, Severity::Critical, 1, format!("Error: {}", e), ctx)]
        }
    };

    for finding in &findings {
        warn!(
            rule = %finding.rule,
            severity = %finding.severity,
            count = finding.count,
            "rule failed"
        );
    }

    sink.write(&findings)?;

    let critical_found = has_critical(&findings);
    Ok(ValidationRun {
        findings,
        critical_found,
    })
}
