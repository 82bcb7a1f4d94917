//
// rewrite.rs
// Dicom-Modify-rs
//
// Applies tag assignments to one DICOM file and saves the result, capturing any failure for the caller.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::Path;

use dicom::core::dictionary::{DataDictionary, TagRange};
use dicom::core::{DataElement, Tag, VR};
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::{open_file, DefaultDicomObject};
use tracing::debug;

use crate::assignments::TagAssignments;
use crate::error::{ModifyError, Result};

/// Read `input`, apply every assignment, and write the dataset to `output`.
///
/// Numeric assignments are applied first, in insertion order, and each one requires the
/// tag to be present already: the first missing tag aborts the file before anything is
/// written. Named assignments follow and create the element when it does not exist.
/// `output` may equal `input` to overwrite in place.
///
/// Values are not checked against the VR, value multiplicity, or length rules. Writing is
/// best-effort: when saving fails, the state of `output` is unspecified.
pub fn modify_dicom_file(input: &Path, output: &Path, assignments: &TagAssignments) -> Result<()> {
    let mut obj = open_file(input).map_err(|source| ModifyError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    apply_assignments(&mut obj, assignments)?;

    obj.write_to_file(output).map_err(|source| ModifyError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    debug!(input = %input.display(), output = %output.display(), "saved modified file");
    Ok(())
}

/// Apply the assignments to an already loaded dataset.
pub fn apply_assignments(obj: &mut DefaultDicomObject, assignments: &TagAssignments) -> Result<()> {
    for (tag, value) in assignments.by_number() {
        let vr = obj
            .element(tag)
            .map_err(|_| ModifyError::MissingTag { tag })?
            .header()
            .vr;
        let primitive = value.to_primitive(tag, vr)?;
        debug!(%tag, %vr, %value, "replacing element by number");
        obj.put(DataElement::new(tag, vr, primitive));
    }

    for (name, value) in assignments.by_name() {
        let (tag, dictionary_vr) = resolve_name(name)?;
        // An existing element keeps its VR; a new one takes the dictionary's.
        let vr = match obj.element(tag) {
            Ok(existing) => existing.header().vr,
            Err(_) => dictionary_vr,
        };
        let primitive = value.to_primitive(tag, vr)?;
        debug!(name, %tag, %vr, %value, "setting element by name");
        obj.put(DataElement::new(tag, vr, primitive));
    }

    Ok(())
}

/// Look up an attribute keyword (e.g. `PatientName`) in the standard dictionary.
pub fn resolve_name(name: &str) -> Result<(Tag, VR)> {
    let entry = StandardDataDictionary
        .by_name(name)
        .ok_or_else(|| ModifyError::UnknownName(name.to_string()))?;
    match entry.tag {
        TagRange::Single(tag) => Ok((tag, entry.vr.relaxed())),
        // Repeating groups (overlays, curves) have no single tag to address.
        _ => Err(ModifyError::UnknownName(name.to_string())),
    }
}
