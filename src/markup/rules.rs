//! Named patterns for the fixed markup dialect.
//!
//! The dialect is JSX-like: elements with string, brace-expression or bare
//! attributes, and inline styles written as `style={{ key: 'value', ... }}`.
//! Nothing here parses a grammar; each rule recognises one small shape.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Head of an opening or closing tag.
    ///
    /// Pre: applied anywhere in the source. Post: group 1 is `/` for closing
    /// tags, group 2 is the tag name. The end of the tag is not matched; see
    /// [`find_tag_end`]. Callers must reject matches preceded by an
    /// identifier character (`useState<string>` is not a tag).
    pub static ref OPEN_OR_CLOSE_TAG: Regex =
        Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9.]*)").expect("tag pattern");

    /// A whole inline style attribute.
    ///
    /// Pre: applied to the text of one opening tag. Post: group 1 is the
    /// object body between the double braces.
    pub static ref STYLE_BLOCK: Regex =
        Regex::new(r"(?s)^style\s*=\s*\{\{(.*)\}\}$").expect("style block pattern");

    /// One `key: value` entry of a style object body.
    ///
    /// Post: the key is in group 1 (bare), 2 (single-quoted) or 3
    /// (double-quoted); group 4 is the raw value: a quoted string, a template
    /// literal, a number or a dotted identifier.
    pub static ref STYLE_PAIR: Regex = Regex::new(
        r#"(?:([A-Za-z_$][\w$]*)|'([^']*)'|"([^"]*)")\s*:\s*('[^']*'|"[^"]*"|`[^`]*`|-?\d+(?:\.\d+)?|[A-Za-z_$][\w.$]*)"#
    )
    .expect("style pair pattern");

    /// One attribute inside an opening tag.
    ///
    /// Pre: applied to the attribute region of one opening tag. Post: group 1
    /// is the name, group 2 the raw value (quotes or braces included) when
    /// present. Brace values may nest one level, which covers style objects
    /// and block-bodied handlers.
    pub static ref ATTRIBUTE: Regex = Regex::new(
        r#"([A-Za-z_:][-\w:.]*)(?:\s*=\s*("[^"]*"|'[^']*'|\{(?:[^{}"']|"[^"]*"|'[^']*'|\{(?:[^{}"']|"[^"]*"|'[^']*')*\})*\}))?"#
    )
    .expect("attribute pattern");

    /// A fenced code block with an optional language tag.
    ///
    /// Post: group 1 is the block body without the fences.
    pub static ref FENCED_BLOCK: Regex =
        Regex::new(r"(?s)```[^\n`]*\n(.*?)```").expect("fenced block pattern");
}

/// Byte offset just past the `>` that closes the tag starting at `from`.
///
/// Quotes and brace expressions are skipped, so `=>` inside a handler does
/// not end the tag. Returns `None` for an unterminated tag.
pub fn find_tag_end(src: &str, from: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'`' if depth > 0 => quote = Some(b),
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Some(i + 1),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Whether the `<` at `at` follows an identifier character.
pub fn is_type_parameter(src: &str, at: usize) -> bool {
    src[..at]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Strip one layer of quotes or braces from a raw attribute or style value.
pub fn unquote(raw: &str) -> &str {
    let raw = raw.trim();
    let stripped = ['"', '\'', '`']
        .iter()
        .find_map(|q| raw.strip_prefix(*q).and_then(|r| r.strip_suffix(*q)));
    match stripped {
        Some(inner) => inner,
        None => raw
            .strip_prefix('{')
            .and_then(|r| r.strip_suffix('}'))
            .map(unquote)
            .unwrap_or(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_head_matches_open_and_close() {
        let caps = OPEN_OR_CLOSE_TAG.captures("</Card.Header>").expect("match");
        assert_eq!(&caps[1], "/");
        assert_eq!(&caps[2], "Card.Header");
        assert!(OPEN_OR_CLOSE_TAG.captures("a < b").is_none());
    }

    #[test]
    fn type_parameters_are_detected() {
        let src = "useState<string>(x)";
        let at = src.find('<').expect("angle");
        assert!(is_type_parameter(src, at));
        assert!(!is_type_parameter("return (<div>", 8));
    }

    #[test]
    fn tag_end_skips_arrow_functions_and_strings() {
        let src = r#"<button onClick={() => go("a>b")} title='x>y'>Go</button>"#;
        let end = find_tag_end(src, 7).expect("terminated");
        assert_eq!(&src[end..end + 2], "Go");
        assert!(find_tag_end("<div style={{", 4).is_none());
    }

    #[test]
    fn style_block_captures_body() {
        let caps = STYLE_BLOCK
            .captures("style={{ width: '10px', top: 0 }}")
            .expect("match");
        assert_eq!(caps[1].trim(), "width: '10px', top: 0");
        assert!(STYLE_BLOCK.captures("style={styles.root}").is_none());
    }

    #[test]
    fn style_pairs_cover_value_shapes() {
        let body = r#"width: '10px', 'z-index': 2, color: theme.fg, label: "a:b", margin: -4.5"#;
        let pairs: Vec<(String, String)> = STYLE_PAIR
            .captures_iter(body)
            .map(|c| {
                let key = c.get(1).or(c.get(2)).or(c.get(3)).map_or("", |m| m.as_str());
                (key.to_string(), c[4].to_string())
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("width".into(), "'10px'".into()),
                ("z-index".into(), "2".into()),
                ("color".into(), "theme.fg".into()),
                ("label".into(), "\"a:b\"".into()),
                ("margin".into(), "-4.5".into()),
            ]
        );
    }

    #[test]
    fn attributes_with_nested_braces() {
        let region = r#" id="x" disabled onClick={() => { go(); }} style={{ top: '1px' }}"#;
        let names: Vec<&str> = ATTRIBUTE
            .captures_iter(region)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect();
        assert_eq!(names, vec!["id", "disabled", "onClick", "style"]);
    }

    #[test]
    fn fenced_block_ignores_language_tag() {
        let text = "Here you go:\n```tsx\n<div />\n```\nthanks";
        let caps = FENCED_BLOCK.captures(text).expect("fence");
        assert_eq!(&caps[1], "<div />\n");
    }

    #[test]
    fn unquote_strips_one_layer() {
        assert_eq!(unquote("'10px'"), "10px");
        assert_eq!(unquote("{\"label\"}"), "label");
        assert_eq!(unquote("{0}"), "0");
        assert_eq!(unquote("plain"), "plain");
    }
}
