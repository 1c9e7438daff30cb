use clap::{Parser, Subcommand};
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reconstruct capture timestamps for exported media and triage files by outcome")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable file logging to phototriage.log
    #[arg(long = "log", global = true)]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug, global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile sidecar metadata with media files and triage them by outcome
    Process {
        /// Export tree containing media files and their JSON sidecars
        #[arg(required = true)]
        source_dir: PathBuf,

        /// Destination for tagged files; untagged files land in a
        /// noexifdata folder beneath it
        #[arg(required = true)]
        dest_dir: PathBuf,

        /// Skip the confirmation checkpoint after the first tagged batch
        #[arg(long, short = 'y')]
        yes: bool,

        /// Show routing decisions without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Recover capture dates from filenames alone and move matching files
    ExtractDates {
        /// Directory of files without usable metadata (flat, not recursed)
        #[arg(required = true)]
        source_dir: PathBuf,

        /// Directory for files that received a filename-derived date
        #[arg(required = true)]
        output_dir: PathBuf,
    },

    /// Sort files into category folders by naming convention, then sweep
    /// exiftool backup copies
    Sort {
        /// Tree of files to categorize
        #[arg(required = true)]
        source_dir: PathBuf,

        /// Root of the categorized tree
        #[arg(required = true)]
        output_dir: PathBuf,
    },

    /// Count how many images carry an embedded capture date
    Coverage {
        /// Tree to sweep
        #[arg(required = true)]
        dir: PathBuf,
    },
}
