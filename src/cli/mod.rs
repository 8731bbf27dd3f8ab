/*!
 * Command Line
 * Positional argument parsing and the interactive workload prompts
 */

mod args;
mod prompt;

pub use args::Args;
pub use prompt::{Prompter, WorkloadAnswers};
