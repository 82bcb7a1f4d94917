//
// cli.rs
// Dicom-Modify-rs
//
// Defines the CLI surface with Clap, gathers tag assignments, and dispatches to the modify and show commands.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{error, warn};

use crate::assignments::TagAssignments;
use crate::batch::{self, OutputTarget};
use crate::inspect;
use crate::logging;
use crate::models::{AssignmentFile, BatchSummary};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "dicom-modify")]
#[command(about = "Edição de tags DICOM em Rust", long_about = None)]
pub struct Cli {
    /// More output per occurrence (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Modify the tags of a single DICOM file
    ModifySingle {
        file: PathBuf,
        #[command(flatten)]
        modify: ModifyArgs,
    },
    /// Modify every file in the directory of the selected DICOM file
    ModifyAll {
        file: PathBuf,
        #[command(flatten)]
        modify: ModifyArgs,
        /// Write a JSON report of per-file outcomes
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show the current value of some (or all) tags
    Show {
        file: PathBuf,
        /// Keyword or GGGG,EEEE of a tag to show (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 64)]
        max_value_len: usize,
    },
}

/// Options shared by both modify verbs.
#[derive(Args, Debug, Clone)]
pub struct ModifyArgs {
    /// Write modified files here instead of overwriting the originals
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Assignment by keyword, NAME=VALUE (the tag is created if missing)
    #[arg(short, long = "tag", value_name = "NAME=VALUE")]
    pub tags: Vec<String>,
    /// Assignment by number, GGGG,EEEE=VALUE (the tag must exist). "[a, b]" sets a list
    #[arg(short = 'n', long = "tag-number", value_name = "GGGG,EEEE=VALUE")]
    pub tag_numbers: Vec<String>,
    /// JSON file with "by_name" and "by_number" assignments; flags override it
    #[arg(short, long)]
    pub assignments: Option<PathBuf>,
}

impl ModifyArgs {
    pub fn target(&self) -> OutputTarget {
        match &self.output_dir {
            Some(dir) => OutputTarget::Directory(dir.clone()),
            None => OutputTarget::InPlace,
        }
    }

    /// Gather assignments from the optional file, then from the command-line flags.
    pub fn gather_assignments(&self) -> anyhow::Result<TagAssignments> {
        let mut assignments = match &self.assignments {
            Some(path) => AssignmentFile::load(path)?
                .into_assignments()
                .with_context(|| format!("Invalid assignment in {:?}", path))?,
            None => TagAssignments::new(),
        };

        let mut flags = TagAssignments::new();
        for arg in &self.tag_numbers {
            flags.push_number_argument(arg)?;
        }
        for arg in &self.tags {
            flags.push_name_argument(arg)?;
        }
        assignments.extend(flags);
        if assignments.is_empty() {
            // Still a valid run: every file is read and saved back unchanged.
            warn!("No tag assignments given; files will be re-saved without changes");
        }
        Ok(assignments)
    }
}

pub fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once and dispatch to a subcommand handler.
    let cli = Cli::parse();
    logging::init_logging(logging::level_from_flags(cli.verbose, cli.quiet))?;

    match cli.command {
        Commands::ModifySingle { file, modify } => {
            let assignments = modify.gather_assignments()?;
            let written = batch::modify_single(&file, &modify.target(), &assignments)
                .with_context(|| format!("Falha ao modificar {:?}", file))?;
            println!("Arquivo modificado salvo em: {:?}", written);
        }
        Commands::ModifyAll {
            file,
            modify,
            report,
        } => {
            let assignments = modify.gather_assignments()?;
            let outcome = batch::modify_all(&file, &modify.target(), &assignments)
                .context("Batch modification canceled")?;

            println!(
                "Processados {} arquivos: {} sucesso(s), {} falha(s)",
                outcome.outcomes.len(),
                outcome.succeeded(),
                outcome.failed()
            );

            if let Some(path) = report {
                let summary = BatchSummary::from(&outcome);
                let json = serde_json::to_string_pretty(&summary)
                    .context("Failed to serialize batch report")?;
                std::fs::write(&path, json).context("Failed to write batch report")?;
                println!("Relatório salvo em: {:?}", path);
            }

            if outcome.failed() > 0 {
                for failure in outcome.failures() {
                    error!(file = %failure.input.display(), "not modified");
                }
                bail!("{} file(s) could not be modified", outcome.failed());
            }
        }
        Commands::Show {
            file,
            tags,
            max_value_len,
        } => inspect::show_tags(&file, &tags, max_value_len)
            .with_context(|| format!("Falha ao abrir arquivo DICOM {:?}", file))?,
    }

    Ok(())
}
