// lumen-core/src/ports/report.rs

use crate::domain::quality::Finding;
use crate::error::LumenError;

/// Destination of a run's findings. Called once per run, also with no findings.
pub trait ReportSink: Send + Sync {
    fn write(&self, findings: &[Finding]) -> Result<(), LumenError>;
}
