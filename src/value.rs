//
// value.rs
// Dicom-Modify-rs
//
// Normalizes user-entered tag values (scalar vs. bracketed list) and coerces them into primitive DICOM values.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use dicom::core::{PrimitiveValue, Tag, VR};
use regex::Regex;

use crate::error::{ModifyError, Result};

/// A replacement value: either a single string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Scalar(String),
    List(Vec<String>),
}

fn list_pattern() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\A\w*\[(.*)\]\w*\z").expect("Failed to compile regex"))
}

/// Convert to a list if the whole string is bracketed (`"[1, 2, 3]"`), otherwise keep it as is.
///
/// List items are split on commas and trimmed; empty items are kept.
pub fn normalize(raw: &str) -> TagValue {
    match list_pattern().captures(raw) {
        Some(caps) => {
            let inner = caps.get(1).map_or("", |m| m.as_str());
            TagValue::List(inner.split(',').map(|v| v.trim().to_string()).collect())
        }
        None => TagValue::Scalar(raw.to_string()),
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Scalar(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Scalar(value)
    }
}

impl From<Vec<String>> for TagValue {
    fn from(values: Vec<String>) -> Self {
        TagValue::List(values)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Scalar(s) => f.write_str(s),
            TagValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl TagValue {
    /// Build the primitive value to store under `tag`, following the element's VR.
    ///
    /// Text VRs take the strings verbatim. Binary numeric VRs parse every item, where a
    /// scalar may also carry several values separated by `\`. Other VRs cannot be
    /// expressed from text and are rejected.
    pub fn to_primitive(&self, tag: Tag, vr: VR) -> Result<PrimitiveValue> {
        let fail = |reason: String| ModifyError::Coercion {
            tag,
            vr,
            value: self.to_string(),
            reason,
        };

        match vr {
            VR::AE
            | VR::AS
            | VR::CS
            | VR::DA
            | VR::DS
            | VR::DT
            | VR::IS
            | VR::LO
            | VR::LT
            | VR::PN
            | VR::SH
            | VR::ST
            | VR::TM
            | VR::UC
            | VR::UI
            | VR::UR
            | VR::UT => Ok(match self {
                TagValue::Scalar(s) => PrimitiveValue::from(s.as_str()),
                TagValue::List(items) => PrimitiveValue::Strs(items.iter().cloned().collect()),
            }),
            VR::US | VR::SS | VR::UL | VR::SL | VR::UV | VR::SV | VR::FL | VR::FD => {
                let items = self.numeric_items();
                if items.is_empty() {
                    return Ok(PrimitiveValue::Empty);
                }
                let value = match vr {
                    VR::US => PrimitiveValue::U16(parse_all::<u16>(&items).map_err(fail)?.into_iter().collect()),
                    VR::SS => PrimitiveValue::I16(parse_all::<i16>(&items).map_err(fail)?.into_iter().collect()),
                    VR::UL => PrimitiveValue::U32(parse_all::<u32>(&items).map_err(fail)?.into_iter().collect()),
                    VR::SL => PrimitiveValue::I32(parse_all::<i32>(&items).map_err(fail)?.into_iter().collect()),
                    VR::UV => PrimitiveValue::U64(parse_all::<u64>(&items).map_err(fail)?.into_iter().collect()),
                    VR::SV => PrimitiveValue::I64(parse_all::<i64>(&items).map_err(fail)?.into_iter().collect()),
                    VR::FL => PrimitiveValue::F32(parse_all::<f32>(&items).map_err(fail)?.into_iter().collect()),
                    _ => PrimitiveValue::F64(parse_all::<f64>(&items).map_err(fail)?.into_iter().collect()),
                };
                Ok(value)
            }
            other => Err(fail(format!("text values are not supported for VR {other}"))),
        }
    }

    fn numeric_items(&self) -> Vec<&str> {
        match self {
            TagValue::Scalar(s) if s.trim().is_empty() => Vec::new(),
            TagValue::Scalar(s) => s.split('\\').map(str::trim).collect(),
            TagValue::List(items) => items.iter().map(|v| v.trim()).collect(),
        }
    }
}

fn parse_all<T: FromStr>(items: &[&str]) -> std::result::Result<Vec<T>, String> {
    items
        .iter()
        .map(|item| {
            item.parse::<T>()
                .map_err(|_| format!("`{item}` is not a valid number for this VR"))
        })
        .collect()
}
