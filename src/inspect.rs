//
// inspect.rs
// Dicom-Modify-rs
//
// Renders the current value of selected (or all top-level) elements so edits can be checked after a run.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt::Write;
use std::path::Path;

use dicom::core::dictionary::DataDictionary;
use dicom::core::value::Value;
use dicom::core::{PrimitiveValue, Tag};
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::{open_file, DefaultDicomObject};

use crate::assignments::{parse_tag_number, split_tag_key};
use crate::error::{ModifyError, Result};
use crate::rewrite::resolve_name;

/// Print the selected elements of `path` to stdout.
pub fn show_tags(path: &Path, selectors: &[String], max_value_len: usize) -> Result<()> {
    let output = render_tags(path, selectors, max_value_len)?;
    print!("{output}");
    Ok(())
}

/// Render one line per element: `(GGGG,EEEE) Keyword VR value`.
///
/// With no selectors every top-level element is listed. A selector is a keyword or a
/// `GGGG,EEEE` pair; selected tags missing from the file are shown as `<absent>`.
pub fn render_tags(path: &Path, selectors: &[String], max_value_len: usize) -> Result<String> {
    let obj = open_file(path).map_err(|source| ModifyError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = String::new();
    if selectors.is_empty() {
        for elem in obj.iter() {
            let tag = elem.header().tag;
            let preview = preview_value(elem.value(), max_value_len);
            let _ = writeln!(out, "{} {} {} {}", format_tag(tag), tag_name(tag), elem.header().vr, preview);
        }
        return Ok(out);
    }

    for selector in selectors {
        let tag = parse_selector(selector)?;
        render_selected(&obj, tag, max_value_len, &mut out);
    }
    Ok(out)
}

fn render_selected(obj: &DefaultDicomObject, tag: Tag, max_value_len: usize, out: &mut String) {
    match obj.element(tag) {
        Ok(elem) => {
            let preview = preview_value(elem.value(), max_value_len);
            let _ = writeln!(out, "{} {} {} {}", format_tag(tag), tag_name(tag), elem.header().vr, preview);
        }
        Err(_) => {
            let _ = writeln!(out, "{} {} <absent>", format_tag(tag), tag_name(tag));
        }
    }
}

/// A keyword (`PatientName`) or a hexadecimal pair (`0010,0010`, `(0010,0010)`).
pub fn parse_selector(selector: &str) -> Result<Tag> {
    match split_tag_key(selector) {
        Some((group, element)) => parse_tag_number(group, element),
        None => resolve_name(selector.trim()).map(|(tag, _)| tag),
    }
}

fn preview_value<I, P>(value: &Value<I, P>, max_value_len: usize) -> String {
    match value {
        Value::Primitive(p) => preview_primitive(p, max_value_len),
        Value::Sequence(seq) => format!("[sequence: {} item(s)]", seq.items().len()),
        Value::PixelSequence(p) => format!("[encapsulated: {} fragment(s)]", p.fragments().len()),
    }
}

fn preview_primitive(value: &PrimitiveValue, max_value_len: usize) -> String {
    if let PrimitiveValue::Empty = value {
        return "<empty>".to_string();
    }
    let text = value.to_str();
    if !text.is_empty() {
        return truncate(&text, max_value_len);
    }
    format!("{} bytes", value.to_bytes().len())
}

fn truncate(input: &str, limit: usize) -> String {
    match input.char_indices().nth(limit) {
        None => input.to_string(),
        Some((idx, _)) => {
            let mut truncated = input[..idx].to_string();
            truncated.push('…');
            truncated
        }
    }
}

fn format_tag(tag: Tag) -> String {
    format!("({:04X},{:04X})", tag.group(), tag.element())
}

fn tag_name(tag: Tag) -> String {
    StandardDataDictionary
        .by_tag(tag)
        .map(|e| e.alias.to_string())
        .unwrap_or_else(|| "UnknownTag".to_string())
}
