use anyhow::Result;
use clap::Parser;
use phototriage::triage_core::pipeline::UNTAGGED_FOLDER;
use phototriage::triage_core::{Cli, Commands, ProcessOptions};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("phototriage.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    match cli.command {
        Commands::Process {
            source_dir,
            dest_dir,
            yes,
            dry_run,
        } => {
            let opts = ProcessOptions {
                assume_yes: yes,
                dry_run,
            };
            let stats = phototriage::triage_core::run_pipeline(&source_dir, &dest_dir, opts)?;

            if dry_run {
                println!("\n[DRY RUN] {}", stats);
            } else {
                println!("\nProcessing complete!");
                println!("  {} files processed", stats.processed);
                println!("  {} tagged into {}", stats.tagged, dest_dir.display());
                println!(
                    "  {} without usable metadata in {}",
                    stats.untagged,
                    dest_dir.join(UNTAGGED_FOLDER).display()
                );
                if stats.stopped_early {
                    println!("Stopped at checkpoint. Verify the files and rerun to continue.");
                }
            }
        }

        Commands::ExtractDates {
            source_dir,
            output_dir,
        } => {
            let stats = phototriage::triage_core::extract::extract_dates(&source_dir, &output_dir)?;

            println!("\nExtraction complete!");
            println!("  {} files dated and moved", stats.moved);
            println!("  {} files without a filename date", stats.skipped);
            if stats.failed > 0 {
                println!("  {} files failed", stats.failed);
            }
        }

        Commands::Sort {
            source_dir,
            output_dir,
        } => {
            let stats = phototriage::triage_core::sort::sort_tree(&source_dir, &output_dir)?;

            println!("\nSort complete!");
            println!("  {} files sorted", stats.moved);
            if stats.failed > 0 {
                println!("  {} files failed", stats.failed);
            }
            println!("  {} backup copies deleted", stats.backups_deleted);
        }

        Commands::Coverage { dir } => {
            let report = phototriage::triage_core::coverage::scan_coverage(&dir)?;

            println!("\nSweep complete ({} files).", report.total());
            println!("{}", report);
        }
    }

    Ok(())
}
