//
// models.rs
// Dicom-Modify-rs
//
// Defines serializable records for assignment files and batch reports.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assignments::TagAssignments;
use crate::batch::{error_chain, BatchReport};

/// Tag assignments stored as JSON, mirroring the two input forms of the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentFile {
    /// Keyword to raw value. Values are used as typed (no list expansion).
    #[serde(default)]
    pub by_name: BTreeMap<String, String>,
    #[serde(default)]
    pub by_number: Vec<NumberAssignment>,
}

/// One numeric row: hexadecimal group and element plus the raw value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberAssignment {
    pub group: String,
    pub element: String,
    pub value: String,
}

impl AssignmentFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).context("Failed to open assignment file")?;
        serde_json::from_reader(file).context("Failed to parse assignment file")
    }

    /// Apply the same row rules as interactive input: incomplete rows are skipped.
    pub fn into_assignments(self) -> crate::error::Result<TagAssignments> {
        let mut assignments = TagAssignments::new();
        for row in &self.by_number {
            assignments.push_number_row(&row.group, &row.element, &row.value)?;
        }
        for (name, value) in &self.by_name {
            assignments.push_name_row(name, value);
        }
        Ok(assignments)
    }
}

/// Per-file line of a batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub success: bool,
    pub error: Option<String>,
}

/// Serializable view of a [`BatchReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<FileSummary>,
}

impl From<&BatchReport> for BatchSummary {
    fn from(report: &BatchReport) -> Self {
        let files = report
            .outcomes
            .iter()
            .map(|o| FileSummary {
                input: o.input.clone(),
                output: o.output.clone(),
                success: o.succeeded(),
                error: o.error.as_ref().map(|e| error_chain(e)),
            })
            .collect();
        BatchSummary {
            succeeded: report.succeeded(),
            failed: report.failed(),
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FileOutcome;
    use crate::error::ModifyError;
    use crate::value::TagValue;
    use dicom::core::Tag;

    #[test]
    fn assignment_file_follows_row_rules() {
        let json = r#"{
            "by_name": { "PatientName": "DOE^JOHN", "PatientID": "" },
            "by_number": [
                { "group": "0008", "element": "0008", "value": "[DERIVED, SECONDARY]" },
                { "group": "", "element": "0010", "value": "ignored" }
            ]
        }"#;
        let file: AssignmentFile = serde_json::from_str(json).expect("parse");
        let assignments = file.into_assignments().expect("assignments");

        assert_eq!(assignments.len(), 2);
        let (tag, value) = assignments.by_number().next().unwrap();
        assert_eq!(tag, Tag(0x0008, 0x0008));
        assert_eq!(value, &TagValue::List(vec!["DERIVED".into(), "SECONDARY".into()]));
        assert_eq!(assignments.by_name().next().unwrap().0, "PatientName");
    }

    #[test]
    fn assignment_file_rejects_bad_numbers_and_unknown_fields() {
        let file: AssignmentFile = serde_json::from_str(
            r#"{ "by_number": [ { "group": "XYZ", "element": "0010", "value": "1" } ] }"#,
        )
        .expect("parse");
        assert!(matches!(
            file.into_assignments(),
            Err(ModifyError::InvalidTagNumber { .. })
        ));

        assert!(serde_json::from_str::<AssignmentFile>(r#"{ "by_tag": {} }"#).is_err());
    }

    #[test]
    fn summary_counts_outcomes() {
        let report = BatchReport {
            outcomes: vec![
                FileOutcome {
                    input: "a.dcm".into(),
                    output: "out/a.dcm".into(),
                    error: None,
                },
                FileOutcome {
                    input: "b.dcm".into(),
                    output: "out/b.dcm".into(),
                    error: Some(ModifyError::MissingTag { tag: Tag(0x0010, 0x0010) }),
                },
            ],
        };
        let summary = BatchSummary::from(&report);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.files[0].success);
        assert!(summary.files[1].error.as_deref().unwrap().contains("(0010,0010)"));
    }
}
