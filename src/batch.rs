use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::assignments::TagAssignments;
use crate::error::{ModifyError, Result};
use crate::rewrite::modify_dicom_file;

/// Where modified files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Overwrite the input files.
    InPlace,
    /// Write into another directory. An empty path means nothing was selected.
    Directory(PathBuf),
}

impl OutputTarget {
    /// Output directory for files taken from the directory of `selected_file`.
    pub fn resolve(&self, selected_file: &Path) -> Result<PathBuf> {
        match self {
            OutputTarget::InPlace => Ok(parent_dir(selected_file)),
            OutputTarget::Directory(dir) if dir.as_os_str().is_empty() => {
                Err(ModifyError::NoOutputDirectory)
            }
            OutputTarget::Directory(dir) => Ok(dir.clone()),
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// The input selection must be an existing regular file. Its content is not inspected.
pub fn check_input_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ModifyError::InvalidInput(path.to_path_buf()))
    }
}

/// Result of one file of a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub error: Option<ModifyError>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

/// Ordered (input, output) pairs sharing the same assignments.
#[derive(Debug, Clone, Default)]
pub struct BatchJob {
    pub pairs: Vec<(PathBuf, PathBuf)>,
}

impl BatchJob {
    /// Pair every entry directly inside `input_dir` that is not a directory with the same
    /// file name in `output_dir`. Subdirectories are not visited; non-DICOM files and
    /// symlinks (broken ones too) are included and attempted like any other file.
    pub fn from_directory(input_dir: &Path, output_dir: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"))
            })?;
            // `path().is_dir()` follows links, so a link to a directory is skipped.
            if !entry.path().is_dir() {
                entries.push(entry);
            }
        }

        let pairs = entries
            .into_iter()
            .map(|entry| {
                let output = output_dir.join(entry.file_name());
                (entry.into_path(), output)
            })
            .collect();
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Rewrite every pair in order. Failures are logged and recorded, never fatal.
    pub fn run(&self, assignments: &TagAssignments) -> BatchReport {
        let mut report = BatchReport::default();
        for (input, output) in &self.pairs {
            let error = match modify_dicom_file(input, output, assignments) {
                Ok(()) => {
                    info!(file = %input.display(), "modified");
                    None
                }
                Err(err) => {
                    warn!("DICOM file modification failed for {}", input.display());
                    warn!("Error message: {}", error_chain(&err));
                    Some(err)
                }
            };
            report.outcomes.push(FileOutcome {
                input: input.clone(),
                output: output.clone(),
                error,
            });
        }
        report
    }
}

/// Modify every file in the directory of `selected_file`.
///
/// Precondition failures abort before any file is touched; per-file failures do not.
pub fn modify_all(
    selected_file: &Path,
    target: &OutputTarget,
    assignments: &TagAssignments,
) -> Result<BatchReport> {
    debug!(file = %selected_file.display(), "launching modify all");
    check_input_file(selected_file)?;
    let output_dir = target.resolve(selected_file)?;

    let job = BatchJob::from_directory(&parent_dir(selected_file), &output_dir)?;
    debug!("Gathered {} files to modify.", job.len());

    let report = job.run(assignments);
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        output = %output_dir.display(),
        "batch finished"
    );
    Ok(report)
}

/// Modify only `selected_file`. A failure is logged and returned, since it was the only
/// unit of work. Returns the path that was written.
pub fn modify_single(
    selected_file: &Path,
    target: &OutputTarget,
    assignments: &TagAssignments,
) -> Result<PathBuf> {
    debug!(file = %selected_file.display(), "launching modify single");
    check_input_file(selected_file)?;
    let output_dir = target.resolve(selected_file)?;
    let file_name = selected_file
        .file_name()
        .ok_or_else(|| ModifyError::InvalidInput(selected_file.to_path_buf()))?;
    let output = output_dir.join(file_name);

    if let Err(err) = modify_dicom_file(selected_file, &output, assignments) {
        warn!("DICOM file modification failed for {}", selected_file.display());
        warn!("Error message: {}", error_chain(&err));
        return Err(err);
    }
    info!(file = %output.display(), "modified");
    Ok(output)
}

/// Render an error with its sources, `outer: inner: root`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
