pub mod apply;
pub mod classify;
pub mod cli;
pub mod coverage;
pub mod error;
pub mod extract;
pub mod media;
pub mod pipeline;
pub mod resolve;
pub mod sidecar;
pub mod sort;

pub use classify::{Category, classify};
pub use cli::{Cli, Commands};
pub use error::{Result, TriageError};
pub use pipeline::{BATCH_SIZE, ProcessOptions, RunStats, WORKER_POOL_SIZE, run_pipeline};
pub use resolve::{DateSource, ResolvedDate, date_from_filename, resolve_capture_date};
pub use sidecar::{SidecarIndex, SidecarRecord};
