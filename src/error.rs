//
// error.rs
// Dicom-Modify-rs
//
// Typed errors for tag assignment parsing, per-file rewrites, and batch preconditions.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use dicom::core::{Tag, VR};
use thiserror::Error;

pub type Result<T, E = ModifyError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ModifyError {
    /// The input could not be parsed as a DICOM file (unreadable, malformed, not DICOM).
    #[error("failed to read DICOM file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: dicom::object::ReadError,
    },

    /// Numeric assignments only replace elements that already exist.
    #[error("tag {tag} is not present in the dataset")]
    MissingTag { tag: Tag },

    #[error("unknown DICOM attribute name `{0}`")]
    UnknownName(String),

    #[error("cannot assign {value:?} to {tag} ({vr}): {reason}")]
    Coercion {
        tag: Tag,
        vr: VR,
        value: String,
        reason: String,
    },

    #[error("failed to write DICOM file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: dicom::object::WriteError,
    },

    #[error("selected input {0:?} is not an existing file")]
    InvalidInput(PathBuf),

    #[error("no output directory selected")]
    NoOutputDirectory,

    #[error("invalid tag number ({group}, {element}): expected two hexadecimal 16-bit values")]
    InvalidTagNumber { group: String, element: String },

    #[error("invalid assignment `{0}`: expected KEY=VALUE")]
    InvalidAssignment(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
