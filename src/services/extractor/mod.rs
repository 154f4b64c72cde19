//! The batch job: scan, open each package, transcode each picture, report.

pub mod job;
pub mod report;

// Re-export public API
pub use job::{derived_output_dir, execute, run_extraction, ExtractRequest, DEFAULT_PREFIX};
pub use report::{FileTally, RunOutcome, RunPhase, RunReport};
