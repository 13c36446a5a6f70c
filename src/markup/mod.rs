//! Pattern-based toolkit for generated UI markup.
//!
//! Everything here works on a single fixed dialect (JSX-like elements with
//! `style={{ key: 'value' }}` objects). There is no grammar: the scanner
//! finds tags with the rules in [`rules`], rewrites are byte-span edits.

pub mod rules;

mod edit;
mod matching;
mod scan;
mod style;

pub use edit::{apply_edits, rename, set_attribute, set_style, Edit};
pub use matching::{match_elements, ElementMatches};
pub use scan::{children, root_element, scan, Attribute, Element};
pub use style::{format_px, Style};

use thiserror::Error;

use rules::FENCED_BLOCK;

/// Why one rewrite pass gave up. The pass is skipped, not the pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("expected pattern not found: {0}")]
    PatternMismatch(String),

    #[error("malformed markup: {0}")]
    Malformed(String),
}

/// Scan and return the elements together with the root, or fail the pass.
pub fn require_root(src: &str) -> Result<(Vec<Element>, usize), StageError> {
    let elements = scan(src);
    let root = root_element(&elements)
        .map(|e| e.index)
        .ok_or_else(|| StageError::PatternMismatch("no element in markup".to_string()))?;
    Ok((elements, root))
}

/// Pull component markup out of a generation response.
///
/// The first fenced block wins, whatever its language tag. A response with
/// no fence is used as-is when it contains at least one tag.
pub fn extract_markup(response: &str) -> Option<String> {
    if let Some(body) = FENCED_BLOCK.captures(response).and_then(|c| c.get(1)) {
        let body = body.as_str().trim();
        return (!body.is_empty()).then(|| body.to_string());
    }
    let trimmed = response.trim();
    (!scan(trimmed).is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fence_is_extracted() {
        let response = "Sure!\n```jsx\n<button>Go</button>\n```\nand a second\n```css\n.a{}\n```";
        assert_eq!(extract_markup(response).as_deref(), Some("<button>Go</button>"));
    }

    #[test]
    fn unfenced_markup_is_used_verbatim() {
        assert_eq!(
            extract_markup("  <div>hi</div>\n").as_deref(),
            Some("<div>hi</div>")
        );
        assert_eq!(extract_markup("I cannot help with that."), None);
    }

    #[test]
    fn require_root_reports_missing_elements() {
        let err = require_root("const x = 1;").unwrap_err();
        assert_eq!(err, StageError::PatternMismatch("no element in markup".into()));
        let (elements, root) = require_root("<main><p>a</p></main>").expect("root");
        assert_eq!(elements[root].tag, "main");
    }
}
