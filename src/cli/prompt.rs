/*!
 * Interactive Prompts
 *
 * Asks for the preload count, total op count, search fraction and insert
 * fraction, in that order. Answers are whitespace-separated tokens, so they
 * may arrive one per line or all on one line.
 */

use crate::core::errors::{BenchError, BenchResult};
use crate::workload::{OpMix, WorkloadConfig};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Answers collected from the prompts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadAnswers {
    pub preload_keys: usize,
    pub total_ops: usize,
    pub mix: OpMix,
}

impl WorkloadAnswers {
    /// Build a run configuration around the answers
    pub fn into_config(self, threads: usize) -> WorkloadConfig {
        WorkloadConfig {
            threads,
            preload_keys: self.preload_keys,
            total_ops: self.total_ops,
            mix: self.mix,
            ..Default::default()
        }
    }
}

/// Question/answer loop over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Run all four prompts
    pub fn read_workload(&mut self) -> BenchResult<WorkloadAnswers> {
        let preload_keys = self.ask(
            "How many keys should be inserted in the main thread?",
            "preload_keys",
        )?;
        let total_ops = self.ask("How many ops total should be executed?", "total_ops")?;
        let search: f64 = self.ask(
            "Percent of ops that should be searches? (between 0 and 1)",
            "search_fraction",
        )?;
        let insert: f64 = self.ask(
            "Percent of ops that should be inserts? (between 0 and 1)",
            "insert_fraction",
        )?;

        Ok(WorkloadAnswers {
            preload_keys,
            total_ops,
            mix: OpMix::new(search, insert)?,
        })
    }

    fn ask<T>(&mut self, question: &str, field: &'static str) -> BenchResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        writeln!(self.output, "{}", question)?;
        self.output.flush()?;

        let token = self.next_token(field)?;
        token
            .parse()
            .map_err(|e| BenchError::invalid_input(field, format!("{:?}: {}", token, e)))
    }

    fn next_token(&mut self, field: &'static str) -> BenchResult<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(BenchError::invalid_input(field, "unexpected end of input"));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}
