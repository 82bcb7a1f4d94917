//
// assignments.rs
// Dicom-Modify-rs
//
// Collects the by-number and by-name tag assignments applied to every file of a run.
//
// Thales Matheus Mendonça Santos - November 2025

use dicom::core::Tag;
use indexmap::IndexMap;

use crate::error::{ModifyError, Result};
use crate::value::{normalize, TagValue};

/// The two assignment mappings shared by every file of a batch.
///
/// Numeric assignments replace elements that must already exist; named assignments
/// create the element when missing. Insertion order is kept so the first failing
/// numeric assignment is always the same one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagAssignments {
    by_number: IndexMap<Tag, TagValue>,
    by_name: IndexMap<String, TagValue>,
}

impl TagAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty() && self.by_name.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_number.len() + self.by_name.len()
    }

    pub fn by_number(&self) -> impl Iterator<Item = (Tag, &TagValue)> {
        self.by_number.iter().map(|(tag, value)| (*tag, value))
    }

    pub fn by_name(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.by_name.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Set an already normalized value for `tag`, replacing any previous one.
    pub fn set_number(&mut self, tag: Tag, value: impl Into<TagValue>) {
        self.by_number.insert(tag, value.into());
    }

    /// Set a value for the attribute keyword `name`. Empty names are ignored.
    pub fn set_name(&mut self, name: impl Into<String>, value: impl Into<TagValue>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        self.by_name.insert(name, value.into());
    }

    /// Add one by-name row of user input. Rows with an empty name or value are skipped.
    ///
    /// The value is stored as typed: bracketed lists are not expanded on this path. The
    /// keyword is trimmed, since a padded keyword could never resolve in the dictionary.
    pub fn push_name_row(&mut self, name: &str, raw_value: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || raw_value.is_empty() {
            return false;
        }
        self.set_name(name, raw_value);
        true
    }

    /// Add one by-number row of user input, with hexadecimal group and element.
    ///
    /// Rows with any empty field are skipped. The value goes through [`normalize`].
    pub fn push_number_row(&mut self, group: &str, element: &str, raw_value: &str) -> Result<bool> {
        if group.is_empty() || element.is_empty() || raw_value.is_empty() {
            return Ok(false);
        }
        let tag = parse_tag_number(group, element)?;
        self.set_number(tag, normalize(raw_value));
        Ok(true)
    }

    /// Parse a `NAME=VALUE` argument and add it as a by-name row.
    pub fn push_name_argument(&mut self, arg: &str) -> Result<bool> {
        let (name, value) = split_assignment(arg)?;
        Ok(self.push_name_row(name, value))
    }

    /// Parse a `GGGG,EEEE=VALUE` argument and add it as a by-number row.
    pub fn push_number_argument(&mut self, arg: &str) -> Result<bool> {
        let (key, value) = split_assignment(arg)?;
        let (group, element) = split_tag_key(key).ok_or_else(|| ModifyError::InvalidAssignment(arg.to_string()))?;
        self.push_number_row(group, element, value)
    }

    /// Merge `other` into `self`; entries of `other` win on conflicting keys.
    pub fn extend(&mut self, other: TagAssignments) {
        self.by_number.extend(other.by_number);
        self.by_name.extend(other.by_name);
    }
}

/// Interpret group and element as hexadecimal 16-bit integers (`0010`, `0x0010`).
pub fn parse_tag_number(group: &str, element: &str) -> Result<Tag> {
    let invalid = || ModifyError::InvalidTagNumber {
        group: group.to_string(),
        element: element.to_string(),
    };
    let g = parse_hex_u16(group).ok_or_else(invalid)?;
    let e = parse_hex_u16(element).ok_or_else(invalid)?;
    Ok(Tag(g, e))
}

fn parse_hex_u16(text: &str) -> Option<u16> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || digits.starts_with('+') {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

fn split_assignment(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .ok_or_else(|| ModifyError::InvalidAssignment(arg.to_string()))
}

/// Split `GGGG,EEEE` (optionally wrapped in parentheses) into its two halves.
pub(crate) fn split_tag_key(key: &str) -> Option<(&str, &str)> {
    let key = key.trim();
    let key = key
        .strip_prefix('(')
        .and_then(|k| k.strip_suffix(')'))
        .unwrap_or(key);
    key.split_once(',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hexadecimal_tag_numbers() {
        assert_eq!(parse_tag_number("0010", "0010").unwrap(), Tag(0x0010, 0x0010));
        assert_eq!(parse_tag_number("0x7FE0", " 10 ").unwrap(), Tag(0x7fe0, 0x0010));
        assert_eq!(parse_tag_number("fffe", "E000").unwrap(), Tag(0xfffe, 0xe000));
    }

    #[test]
    fn rejects_invalid_tag_numbers() {
        for (group, element) in [("10000", "0010"), ("zz", "0010"), ("0010", ""), ("0x", "1"), ("+10", "1")] {
            let err = parse_tag_number(group, element).unwrap_err();
            assert!(matches!(err, ModifyError::InvalidTagNumber { .. }), "{group},{element}");
        }
    }

    #[test]
    fn number_rows_are_normalized_and_name_rows_are_not() {
        let mut assignments = TagAssignments::new();
        assert!(assignments.push_number_row("0008", "0008", "[ORIGINAL, PRIMARY]").unwrap());
        assert!(assignments.push_name_row("ImageType", "[DERIVED, SECONDARY]"));

        let (tag, value) = assignments.by_number().next().unwrap();
        assert_eq!(tag, Tag(0x0008, 0x0008));
        assert_eq!(value, &TagValue::List(vec!["ORIGINAL".into(), "PRIMARY".into()]));

        let (name, value) = assignments.by_name().next().unwrap();
        assert_eq!(name, "ImageType");
        assert_eq!(value, &TagValue::Scalar("[DERIVED, SECONDARY]".into()));
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let mut assignments = TagAssignments::new();
        assert!(!assignments.push_name_row("", "value"));
        assert!(!assignments.push_name_row("PatientName", ""));
        assert!(!assignments.push_number_row("0010", "", "x").unwrap());
        assert!(!assignments.push_number_row("0010", "0010", "").unwrap());
        // A row without a value is skipped before the tag number is even parsed.
        assert!(!assignments.push_number_row("zz", "zz", "").unwrap());
        assert!(assignments.is_empty());
    }

    #[test]
    fn name_rows_trim_the_keyword() {
        let mut assignments = TagAssignments::new();
        assert!(assignments.push_name_row("  PatientName ", " padded value "));
        assert_eq!(
            assignments.by_name().next().unwrap(),
            ("PatientName", &TagValue::from(" padded value "))
        );
        assert!(!assignments.push_name_row("   ", "value"));
    }

    #[test]
    fn later_rows_override_earlier_ones() {
        let mut assignments = TagAssignments::new();
        assignments.push_name_row("PatientID", "A");
        assignments.push_name_row("PatientID", "B");
        assignments.push_number_row("0010", "0020", "C").unwrap();
        assignments.push_number_row("0x0010", "0x0020", "D").unwrap();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments.by_name().next().unwrap().1, &TagValue::from("B"));
        assert_eq!(assignments.by_number().next().unwrap().1, &TagValue::from("D"));
    }

    #[test]
    fn parses_command_line_arguments() {
        let mut assignments = TagAssignments::new();
        assignments.push_name_argument("PatientName=DOE^JOHN").unwrap();
        assignments.push_number_argument("(0028,0030)=[0.5, 0.5]").unwrap();
        assignments.push_number_argument("0020,000D=1.2.3=4").unwrap();

        assert_eq!(assignments.by_name().next().unwrap().1, &TagValue::from("DOE^JOHN"));
        let numbers: Vec<_> = assignments.by_number().collect();
        assert_eq!(numbers[0].0, Tag(0x0028, 0x0030));
        assert_eq!(numbers[0].1, &TagValue::List(vec!["0.5".into(), "0.5".into()]));
        assert_eq!(numbers[1].1, &TagValue::from("1.2.3=4"));

        assert!(matches!(
            assignments.push_name_argument("PatientName").unwrap_err(),
            ModifyError::InvalidAssignment(_)
        ));
        assert!(matches!(
            assignments.push_number_argument("00100010=x").unwrap_err(),
            ModifyError::InvalidAssignment(_)
        ));
    }

    #[test]
    fn extend_prefers_the_newer_mapping() {
        let mut base = TagAssignments::new();
        base.set_name("PatientName", "FROM^FILE");
        base.set_number(Tag(0x0010, 0x0020), "ID1");

        let mut overrides = TagAssignments::new();
        overrides.set_name("PatientName", "FROM^CLI");

        base.extend(overrides);
        assert_eq!(base.len(), 2);
        assert_eq!(base.by_name().next().unwrap().1, &TagValue::from("FROM^CLI"));
    }
}
