/*!
 * rwset-bench - Main Entry Point
 *
 * Usage: rwset-bench <thread_count>
 *
 * Prompts for the preload count, total operations and the search/insert
 * fractions, runs the workload, and prints the report.
 */

use miette::Result;
use rwset_bench::cli::{Args, Prompter};
use rwset_bench::{init_tracing, PreparedRun, ReportFormat};
use std::io;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse(std::env::args())?;

    let answers = Prompter::new(io::stdin().lock(), io::stdout().lock()).read_workload()?;
    let config = answers.into_config(args.threads).with_env_overrides()?;
    info!(
        threads = config.threads,
        preload_keys = config.preload_keys,
        total_ops = config.total_ops,
        search = config.mix.search(),
        insert = config.mix.insert(),
        delete = config.mix.delete(),
        "starting benchmark"
    );

    let format = ReportFormat::from_env();
    let prepared = PreparedRun::new(&config)?;
    if format == ReportFormat::Text {
        println!("{}\n", prepared.preloaded());
    }

    let report = prepared.run()?.report;
    match format {
        ReportFormat::Text => println!("{}", report.results()),
        ReportFormat::Json => println!("{}", report.render(format)?),
    }

    Ok(())
}
