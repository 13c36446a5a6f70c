//! Span-based rewrites.
//!
//! Edits are computed against one scan of the source and applied together,
//! last span first, so earlier offsets stay valid.

use std::ops::Range;

use super::scan::Element;
use super::style::Style;
use super::StageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

impl Edit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }
}

/// Apply non-overlapping edits. Insertions at the same offset keep the order
/// they were given in.
pub fn apply_edits(src: &str, mut edits: Vec<Edit>) -> Result<String, StageError> {
    edits.sort_by_key(|e| e.range.start);
    for pair in edits.windows(2) {
        if pair[0].range.end > pair[1].range.start {
            return Err(StageError::Malformed(format!(
                "overlapping rewrites at bytes {}..{} and {}..{}",
                pair[0].range.start, pair[0].range.end, pair[1].range.start, pair[1].range.end
            )));
        }
    }
    if let Some(last) = edits.last() {
        if last.range.end > src.len() {
            return Err(StageError::Malformed(format!(
                "rewrite past end of markup ({} > {})",
                last.range.end,
                src.len()
            )));
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut at = 0;
    for edit in &edits {
        out.push_str(&src[at..edit.range.start]);
        out.push_str(&edit.text);
        at = edit.range.end;
    }
    out.push_str(&src[at..]);
    Ok(out)
}

/// Set an attribute to a raw value (`"x"`, `{0}`), or as a bare attribute
/// when `raw` is `None`.
pub fn set_attribute(src: &str, element: &Element, name: &str, raw: Option<&str>) -> Edit {
    let text = match raw {
        Some(raw) => format!("{name}={raw}"),
        None => name.to_string(),
    };
    match element.attribute(name) {
        Some(existing) => Edit::replace(existing.span.clone(), text),
        None => Edit::insert(element.insert_at(src), format!(" {text}")),
    }
}

/// Replace (or add) the element's inline style with the canonical rendering.
pub fn set_style(src: &str, element: &Element, style: &Style) -> Edit {
    match element.attribute("style") {
        Some(existing) => Edit::replace(existing.span.clone(), style.render()),
        None => Edit::insert(element.insert_at(src), format!(" {}", style.render())),
    }
}

/// Rename the element's opening and closing tags.
pub fn rename(element: &Element, tag: &str) -> Result<Vec<Edit>, StageError> {
    let mut edits = vec![Edit::replace(element.name_span(), tag)];
    if !element.self_closing {
        let close = element.close.as_ref().ok_or_else(|| {
            StageError::Malformed(format!("<{}> is never closed", element.tag))
        })?;
        let start = close.start + 2;
        edits.push(Edit::replace(start..start + element.tag.len(), tag));
    }
    Ok(edits)
}
