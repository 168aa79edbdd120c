use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use oxiclean_dynamic_import::{Config, OutputFormat};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oxiclean")]
#[command(about = "A collection of tools for cleaning up codebases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Report external dependencies that entry points load statically instead of via import()
    DynamicImport(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::DynamicImport(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!(
                "Running dynamic import check with {} entry point flag(s) (using {} threads)",
                cfg.entry_points.len(),
                num_threads
            );
            debug!("Config: root={:?}, config={:?}", cfg.root, cfg.config);

            let result = oxiclean_dynamic_import::run_dynamic_import_check(&cfg)?;
            debug!("Found {} findings", result.findings.len());

            let elapsed_ms = start.elapsed().as_millis();

            if result.findings.is_empty() && cfg.format == OutputFormat::Text {
                oxiclean_dynamic_import::print_no_findings_message(
                    &mut stdout,
                    result.entries_analyzed,
                )?;
            } else {
                oxiclean_dynamic_import::print_findings(
                    &mut stdout,
                    &result.findings,
                    &result.root,
                    cfg.format,
                )?;
            }

            if cfg.format == OutputFormat::Text {
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms on {} files from {} entry points (using {} threads).",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    result.files_analyzed.to_string().cyan(),
                    result.entries_analyzed.to_string().cyan(),
                    num_threads.to_string().cyan()
                )?;
            }
            stdout.flush()?;

            if !result.findings.is_empty() {
                // Non-zero exit to fail CI
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
