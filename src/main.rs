//
// main.rs
// Dicom-Modify-rs
//
// Binary entry point that hands off execution to the CLI layer.
//
// Thales Matheus Mendonça Santos - November 2025

use dicom_modify::cli;

fn main() -> anyhow::Result<()> {
    // Everything runs synchronously, one file at a time.
    cli::run()
}
