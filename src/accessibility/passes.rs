//! The three markup-rewriting accessibility passes.
//!
//! Each pass takes the current markup and returns the rewritten markup or a
//! [`StageError`]; a pass that has nothing to do returns its input.

use crate::markup::{apply_edits, rename, require_root, set_attribute, Edit, Element, StageError};
use crate::types::{ComponentType, DesignNode};

const ARIA_LABELS: &[(&str, &str)] = &[
    ("close", "Close"),
    ("submit", "Submit"),
    ("cancel", "Cancel"),
    ("save", "Save"),
    ("delete", "Delete"),
    ("edit", "Edit"),
    ("add", "Add"),
    ("remove", "Remove"),
];

const ALT_TEXTS: &[(&str, &str)] = &[
    ("avatar", "User avatar"),
    ("logo", "Company logo"),
    ("icon", "Icon"),
    ("photo", "Photo"),
    ("image", "Image"),
];

const FOCUS_CLASSES: &str = "focus-visible:outline focus-visible:outline-2 focus-visible:outline-offset-2";
const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const PROMOTABLE: &[&str] = &["div", "span", "p"];
const MAX_HEADING_CHARS: usize = 60;

/// `aria-label` inferred from a node name; "Button" when nothing matches.
pub fn aria_label_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    ARIA_LABELS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or("Button", |(_, label)| *label)
}

/// `alt` text inferred from a node name; "Image" when nothing matches.
pub fn alt_text_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    ALT_TEXTS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or("Image", |(_, alt)| *alt)
}

/// Element kind the component type implies, if any.
pub fn expected_tag(component: ComponentType) -> Option<&'static str> {
    match component {
        ComponentType::Button => Some("button"),
        ComponentType::Input => Some("input"),
        ComponentType::Card => Some("article"),
        ComponentType::Navigation => Some("nav"),
        ComponentType::Avatar | ComponentType::Image => Some("img"),
        ComponentType::Badge | ComponentType::Container | ComponentType::Unknown => None,
    }
}

pub(crate) fn name_signals_required(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("required") || lower.contains('*')
}

pub(crate) fn name_signals_error(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("error") || lower.contains("invalid")
}

/// Elements inside the span of `root`, root included.
fn within<'e>(elements: &'e [Element], root: &Element) -> impl Iterator<Item = &'e Element> {
    let span = root.span();
    elements
        .iter()
        .filter(move |e| e.open.start >= span.start && e.open.end <= span.end)
}

fn visible_text(elements: &[Element], root: &Element) -> String {
    within(elements, root)
        .map(|e| e.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_interactive(src: &str, element: &Element) -> bool {
    element.has_attribute("onClick")
        || element.has_pointer_cursor(src)
        || element
            .attr_value("className")
            .is_some_and(|c| c.contains("hover:"))
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "&quot;"))
}

fn line_indent(src: &str, at: usize) -> &str {
    let line_start = src[..at].rfind('\n').map_or(0, |i| i + 1);
    let line = &src[line_start..at];
    let width = line.len() - line.trim_start().len();
    &line[..width]
}

fn slug(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "field".to_string()
    } else {
        slug
    }
}

/// Pass 1: give the outermost element the element kind the classification
/// implies, when the markup corroborates it.
pub fn semantic_substitution(
    src: &str,
    component: ComponentType,
    node: &DesignNode,
) -> Result<String, StageError> {
    let (elements, root_index) = require_root(src)?;
    let root = &elements[root_index];
    let has_children = within(&elements, root).count() > 1;
    let has_text = !visible_text(&elements, root).is_empty();

    let edits = match component {
        ComponentType::Button if root.tag != "button" => {
            if !(is_interactive(src, root) || has_text) {
                return Ok(src.to_string());
            }
            rename(root, "button")?
        }
        ComponentType::Card if root.tag != "article" => {
            if !(has_children || has_text) {
                return Ok(src.to_string());
            }
            let mut edits = rename(root, "article")?;
            if !root.has_attribute("role") {
                edits.push(set_attribute(src, root, "role", Some("\"article\"")));
            }
            edits
        }
        ComponentType::Navigation if root.tag != "nav" => {
            if !has_children {
                return Ok(src.to_string());
            }
            rename(root, "nav")?
        }
        ComponentType::Input if !elements.iter().any(|e| e.tag == "input") => {
            let bordered = root
                .style(src)
                .is_some_and(|s| s.keys().any(|k| k.starts_with("border")));
            if !(has_text || bordered) {
                return Ok(src.to_string());
            }
            vec![Edit::replace(root.span(), input_group(src, root, node, &elements))]
        }
        ComponentType::Avatar | ComponentType::Image if root.tag != "img" => {
            let alt = quoted(alt_text_for(&node.name));
            if has_children || has_text {
                let mut edits = Vec::new();
                if !root.has_attribute("role") {
                    edits.push(set_attribute(src, root, "role", Some("\"img\"")));
                }
                if !root.has_attribute("aria-label") {
                    edits.push(set_attribute(src, root, "aria-label", Some(alt.as_str())));
                }
                edits
            } else {
                let attrs = &src[root.name_span().end..root.insert_at(src)];
                let alt_attr = if root.has_attribute("alt") {
                    String::new()
                } else {
                    format!(" alt={alt}")
                };
                vec![Edit::replace(root.span(), format!("<img{attrs}{alt_attr} />"))]
            }
        }
        _ => return Ok(src.to_string()),
    };
    apply_edits(src, edits)
}

fn input_group(src: &str, root: &Element, node: &DesignNode, elements: &[Element]) -> String {
    let id = slug(&node.name);
    let label = node
        .name
        .split_whitespace()
        .filter(|w| {
            let w = w.to_lowercase();
            w != "input" && w != "field"
        })
        .collect::<Vec<_>>()
        .join(" ");
    let label = if label.is_empty() { "Input".to_string() } else { label };
    let placeholder = node
        .first_text()
        .map(str::to_string)
        .unwrap_or_else(|| visible_text(elements, root));
    let lower = node.name.to_lowercase();
    let input_type = ["password", "email", "search"]
        .into_iter()
        .find(|t| lower.contains(t))
        .unwrap_or("text");
    let helper = if name_signals_error(&node.name) {
        "Please correct this field".to_string()
    } else if name_signals_required(&node.name) {
        "This field is required".to_string()
    } else {
        format!("Enter your {}", label.to_lowercase())
    };

    let indent = line_indent(src, root.open.start);
    let inner = format!("{indent}  ");
    let open = &src[root.open.start..root.insert_at(src)];
    format!(
        "{open}>\n\
         {inner}<label htmlFor={id_q}>{label}</label>\n\
         {inner}<input id={id_q} type=\"{input_type}\" placeholder={placeholder_q} aria-describedby={helper_id} />\n\
         {inner}<span id={helper_id}>{helper}</span>\n\
         {indent}</{tag}>",
        id_q = quoted(&id),
        placeholder_q = quoted(&placeholder),
        helper_id = quoted(&format!("{id}-helper")),
        tag = root.tag,
    )
}

/// Pass 2: component-specific attributes.
pub fn component_attributes(
    src: &str,
    component: ComponentType,
    node: &DesignNode,
) -> Result<String, StageError> {
    let (elements, root_index) = require_root(src)?;
    let root = &elements[root_index];
    let mut edits = Vec::new();

    match component {
        ComponentType::Button => {
            for button in elements.iter().filter(|e| e.tag == "button") {
                if !button.has_attribute("type") {
                    edits.push(set_attribute(src, button, "type", Some("\"button\"")));
                }
                let text = visible_text(&elements, button);
                if text.chars().count() < 2 && !button.has_attribute("aria-label") {
                    let label = quoted(aria_label_for(&node.name));
                    edits.push(set_attribute(src, button, "aria-label", Some(label.as_str())));
                }
            }
        }
        ComponentType::Input => {
            for input in elements.iter().filter(|e| e.tag == "input") {
                if name_signals_required(&node.name) && !input.has_attribute("aria-required") {
                    edits.push(set_attribute(src, input, "aria-required", Some("\"true\"")));
                }
                if name_signals_error(&node.name) && !input.has_attribute("aria-invalid") {
                    edits.push(set_attribute(src, input, "aria-invalid", Some("\"true\"")));
                }
            }
        }
        ComponentType::Card => {
            let has_heading = elements.iter().any(|e| HEADINGS.contains(&e.tag.as_str()));
            let candidate = within(&elements, root).find(|e| {
                e.index != root.index
                    && PROMOTABLE.contains(&e.tag.as_str())
                    && e.has_text()
                    && e.text.chars().count() <= MAX_HEADING_CHARS
                    && !elements.iter().any(|c| c.parent == Some(e.index))
            });
            if let (false, Some(candidate)) = (has_heading, candidate) {
                edits.extend(rename(candidate, "h3")?);
            }
        }
        ComponentType::Avatar | ComponentType::Image => {
            let alt = quoted(alt_text_for(&node.name));
            for img in elements.iter().filter(|e| e.tag == "img") {
                if img.attr_value("alt").map_or(true, |a| a.trim().is_empty()) {
                    edits.push(set_attribute(src, img, "alt", Some(alt.as_str())));
                }
            }
        }
        _ => {}
    }

    if edits.is_empty() {
        return Ok(src.to_string());
    }
    apply_edits(src, edits)
}

/// Pass 3: pointer-styled elements that are not natively interactive get a
/// focus index and a visible focus outline.
pub fn keyboard_accessibility(src: &str, component: ComponentType) -> Result<String, StageError> {
    let (elements, _) = require_root(src)?;
    if !matches!(component, ComponentType::Button | ComponentType::Navigation) {
        return Ok(src.to_string());
    }

    let mut edits = Vec::new();
    for element in elements.iter().filter(|e| needs_focus(src, e)) {
        edits.push(set_attribute(src, element, "tabIndex", Some("{0}")));
        match element.attribute("className") {
            None => {
                let classes = quoted(FOCUS_CLASSES);
                edits.push(set_attribute(src, element, "className", Some(classes.as_str())));
            }
            Some(attr) if attr.raw.as_deref().is_some_and(|r| r.starts_with(['"', '\''])) => {
                let current = attr.value().unwrap_or_default();
                if !current.contains("focus-visible:") {
                    let merged = quoted(format!("{} {}", current.trim(), FOCUS_CLASSES).trim());
                    edits.push(set_attribute(src, element, "className", Some(merged.as_str())));
                }
            }
            // Expression class names are left to the author.
            Some(_) => {}
        }
    }

    if edits.is_empty() {
        return Ok(src.to_string());
    }
    apply_edits(src, edits)
}

pub(crate) fn needs_focus(src: &str, element: &Element) -> bool {
    element.has_pointer_cursor(src)
        && !element.is_native_interactive()
        && !element.has_attribute("tabIndex")
}
