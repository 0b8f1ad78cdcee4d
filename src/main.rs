/*!
 * Command-line interface for csbundle
 */

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use csbundle::config::{Args, Config};
use csbundle::report::{ReportFormat, Reporter};
use csbundle::status::NullStatus;
use csbundle::Combiner;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    // Logs go to stderr so they never mix with the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let quiet = args.quiet;
    let combiner = Combiner::new(Config::from_args(args));

    let result = if quiet {
        combiner.run(&NullStatus)
    } else {
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg:.dim.white}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.enable_steady_tick(std::time::Duration::from_millis(100));
        progress.set_prefix(format!(
            "📊 {}",
            combiner.config().target_dir.display()
        ));

        let result = combiner.run(&progress);
        progress.finish_and_clear();
        result
    };

    match result {
        Ok(summary) => {
            if !quiet {
                Reporter::new(ReportFormat::ConsoleTable).print_report(&summary);
            }
            println!("{}", summary.archive.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
