//
// lib.rs
// Dicom-Modify-rs
//
// Exposes the crate's modules and re-exports the entry points for both binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Public surface of the library: value normalization, per-file rewrite, batch orchestration, and the CLI.
pub mod assignments;
pub mod batch;
pub mod cli;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod models;
pub mod rewrite;
pub mod value;

pub use assignments::TagAssignments;
pub use batch::{modify_all, modify_single, BatchJob, BatchReport, OutputTarget};
pub use cli::{run as run_cli, Cli, Commands};
pub use error::ModifyError;
pub use rewrite::modify_dicom_file;
pub use value::{normalize, TagValue};
