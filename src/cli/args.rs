/*!
 * Argument Parsing
 */

use crate::core::errors::{BenchError, BenchResult};

const DEFAULT_PROGRAM: &str = "rwset-bench";

/// Parsed command line: `<program> <thread_count>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub threads: usize,
}

impl Args {
    /// Parse from a full argv, program name first
    pub fn parse<I>(argv: I) -> BenchResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut argv = argv.into_iter();
        let program = argv.next().unwrap_or_else(|| DEFAULT_PROGRAM.to_string());

        let (Some(raw), None) = (argv.next(), argv.next()) else {
            return Err(BenchError::Usage { program });
        };

        let threads = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| BenchError::InvalidArgument {
                name: "thread_count",
                reason: format!("{:?} is not a thread count: {}", raw, e),
            })?;
        if threads == 0 {
            return Err(BenchError::InvalidArgument {
                name: "thread_count",
                reason: "at least one worker thread is required".into(),
            });
        }

        Ok(Self { threads })
    }
}
