use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use kast_cli::args::{CliArgs, Command};
use kast_cli::config::discover_config;
use kast_cli::driver;
use kast_cli::reporter::Reporter;

const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if KAST_LOG or RUST_LOG is set (zero cost otherwise).
    kast::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = discover_config(&cwd, args.config.as_deref())?;
    let color = !args.no_color && std::io::stdout().is_terminal();

    match &args.command {
        Command::Dump(dump) => {
            print!("{}", driver::dump(dump, &config)?);
        }
        Command::Stats(stats) => {
            let report = driver::stats(&stats.paths)?;
            if stats.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", driver::format_stats(&report));
            }
        }
        Command::Check(check) => {
            let report = driver::check(&check.paths)?;
            let reporter = Reporter::new(color);
            if !report.diagnostics.is_empty() {
                println!("{}", reporter.render(&report.diagnostics));
                println!();
            }
            println!(
                "{}",
                reporter.summary(report.error_count(), report.warning_count(), report.files)
            );
            if report.failed(config.warnings_as_errors(check.warnings_as_errors)) {
                std::process::exit(EXIT_DIAGNOSTICS);
            }
        }
        Command::Copy(copy) => {
            let outcome = driver::copy(copy)?;
            println!(
                "copied {} nodes; new root #{} written to {}",
                outcome.copied,
                outcome.root.0,
                copy.output.display()
            );
        }
    }
    Ok(())
}
