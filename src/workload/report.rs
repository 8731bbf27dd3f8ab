/*!
 * Run Report
 * Human-readable and JSON rendering of a finished run
 */

use super::counters::OpCounters;
use super::preload::PreloadReport;
use crate::core::errors::BenchResult;
use crate::core::sync::LockStats;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Output format, selected with `RWSET_REPORT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    /// `RWSET_REPORT=json` selects JSON; anything else is text
    pub fn from_env() -> Self {
        match std::env::var("RWSET_REPORT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Summary of one benchmark run
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub threads: usize,
    /// Operation count asked for, before truncation
    pub requested_ops: usize,
    /// `ops_per_thread * threads`; the remainder is never run
    pub executed_ops: usize,
    pub ops_per_thread: usize,
    pub preload: PreloadReport,
    /// Merged worker counters
    pub totals: OpCounters,
    /// Wall time from the first spawn through the last join
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub final_len: usize,
    pub lock: LockStats,
}

impl BenchReport {
    pub fn render(&self, format: ReportFormat) -> BenchResult<String> {
        Ok(match format {
            ReportFormat::Text => self.to_string(),
            ReportFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// The results block alone, for callers that already printed the
    /// preload line
    pub fn results(&self) -> Results<'_> {
        Results(self)
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.preload)?;
        writeln!(f)?;
        write!(f, "{}", self.results())
    }
}

/// Text rendering of the timed region
pub struct Results<'a>(&'a BenchReport);

impl fmt::Display for Results<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let lock = &report.lock;

        writeln!(f, "=== Results (writer-priority rwlock) ===")?;
        writeln!(f, "Elapsed time = {:.6} seconds", report.elapsed.as_secs_f64())?;
        writeln!(f, "Total ops = {}", report.requested_ops)?;
        if report.executed_ops != report.requested_ops {
            writeln!(
                f,
                "Executed ops = {} ({} dropped as remainder)",
                report.executed_ops,
                report.requested_ops - report.executed_ops
            )?;
        }
        writeln!(f, "Member ops = {}", report.totals.member)?;
        writeln!(f, "Insert ops = {}", report.totals.insert)?;
        writeln!(f, "Delete ops = {}", report.totals.delete)?;
        writeln!(
            f,
            "Lock acquisitions = {} shared ({} blocked), {} exclusive ({} blocked)",
            lock.shared_acquisitions,
            lock.shared_blocked,
            lock.exclusive_acquisitions,
            lock.exclusive_blocked
        )?;
        write!(f, "=========================================")
    }
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}
