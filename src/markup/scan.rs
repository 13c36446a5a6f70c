//! Flat element scanner.

use std::ops::Range;

use super::rules::{find_tag_end, is_type_parameter, unquote, ATTRIBUTE, OPEN_OR_CLOSE_TAG};
use super::style::Style;

const NATIVE_INTERACTIVE: &[&str] = &["button", "a", "input", "select", "textarea"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Raw value including quotes or braces; `None` for bare attributes.
    pub raw: Option<String>,
    /// Byte span of the whole attribute in the source.
    pub span: Range<usize>,
}

impl Attribute {
    pub fn value(&self) -> Option<&str> {
        self.raw.as_deref().map(unquote)
    }
}

/// One element occurrence, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub index: usize,
    pub tag: String,
    /// Span of the opening tag, `<` through `>`.
    pub open: Range<usize>,
    /// Span of the matching closing tag, if any.
    pub close: Option<Range<usize>>,
    pub self_closing: bool,
    pub depth: usize,
    pub parent: Option<usize>,
    pub attributes: Vec<Attribute>,
    /// Direct text content (child elements excluded), trimmed.
    pub text: String,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Attribute::value)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Inline style; `None` when absent or not an object literal.
    pub fn style(&self, src: &str) -> Option<Style> {
        let attr = self.attribute("style")?;
        Style::from_attribute(&src[attr.span.clone()])
    }

    /// Whole element span, opening tag through closing tag.
    pub fn span(&self) -> Range<usize> {
        let end = self.close.as_ref().map_or(self.open.end, |c| c.end);
        self.open.start..end
    }

    /// Span of the tag name inside the opening tag.
    pub fn name_span(&self) -> Range<usize> {
        let start = self.open.start + 1;
        start..start + self.tag.len()
    }

    /// Where a new attribute is inserted: after the last attribute, before
    /// any whitespace and the `>` or `/>` terminator.
    pub fn insert_at(&self, src: &str) -> usize {
        let mut end = self.open.end - 1;
        if self.self_closing {
            end -= 1;
        }
        let floor = self.name_span().end;
        while end > floor && src.as_bytes()[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        end
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn is_native_interactive(&self) -> bool {
        NATIVE_INTERACTIVE.contains(&self.tag.as_str())
    }

    /// Pointer cursor through inline style or a utility class.
    pub fn has_pointer_cursor(&self, src: &str) -> bool {
        let styled = self
            .style(src)
            .is_some_and(|s| s.get("cursor") == Some("pointer"));
        let classed = self
            .attr_value("className")
            .is_some_and(|c| c.split_whitespace().any(|c| c == "cursor-pointer"));
        styled || classed
    }
}

/// Scan `src` for elements.
///
/// Tags that never terminate end the scan; closing tags without a matching
/// open element are ignored, and open elements they skip over stay unclosed.
pub fn scan(src: &str) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut cursor = 0;

    for caps in OPEN_OR_CLOSE_TAG.captures_iter(src) {
        let Some(head) = caps.get(0) else { continue };
        if head.start() < cursor || is_type_parameter(src, head.start()) {
            continue;
        }
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let tag = caps.get(2).map_or("", |m| m.as_str());
        let Some(end) = find_tag_end(src, head.end()) else {
            break;
        };
        cursor = end;

        if closing {
            if let Some(pos) = stack.iter().rposition(|&i| elements[i].tag == tag) {
                let index = stack[pos];
                elements[index].close = Some(head.start()..end);
                stack.truncate(pos);
            }
            continue;
        }

        let self_closing = src[..end - 1].ends_with('/');
        let attr_end = if self_closing { end - 2 } else { end - 1 };
        let attributes = ATTRIBUTE
            .captures_iter(&src[head.end()..attr_end])
            .filter_map(|c| {
                let whole = c.get(0)?;
                Some(Attribute {
                    name: c.get(1)?.as_str().to_string(),
                    raw: c.get(2).map(|m| m.as_str().to_string()),
                    span: head.end() + whole.start()..head.end() + whole.end(),
                })
            })
            .collect();

        let index = elements.len();
        elements.push(Element {
            index,
            tag: tag.to_string(),
            open: head.start()..end,
            close: None,
            self_closing,
            depth: stack.len(),
            parent: stack.last().copied(),
            attributes,
            text: String::new(),
        });
        if !self_closing {
            stack.push(index);
        }
    }

    fill_text(src, &mut elements);
    elements
}

fn fill_text(src: &str, elements: &mut [Element]) {
    for i in 0..elements.len() {
        if elements[i].self_closing {
            continue;
        }
        let content_start = elements[i].open.end;
        let content_end = match &elements[i].close {
            Some(close) => close.start,
            None => src[content_start..]
                .find('<')
                .map_or(src.len(), |p| content_start + p),
        };

        let mut text = String::new();
        let mut at = content_start;
        let children: Vec<Range<usize>> = elements
            .iter()
            .filter(|e| e.parent == Some(i))
            .map(Element::span)
            .collect();
        for child in children {
            if child.start >= content_end {
                break;
            }
            text.push_str(&src[at..child.start]);
            text.push(' ');
            at = child.end.min(content_end);
        }
        if at < content_end {
            text.push_str(&src[at..content_end]);
        }
        elements[i].text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    }
}

pub fn root_element(elements: &[Element]) -> Option<&Element> {
    elements.iter().find(|e| e.depth == 0)
}

pub fn children<'a>(
    elements: &'a [Element],
    parent: usize,
) -> impl Iterator<Item = &'a Element> + 'a {
    elements.iter().filter(move |e| e.parent == Some(parent))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"export function Card<T>(props: Props<T>) {
  return (
    <div className="card" style={{ width: '320px' }}>
      <h3 data-node-id="title">Pro plan</h3>
      <img src={props.src} alt="" />
      <button onClick={() => props.onBuy()}>
        <Icon name="cart" /> Buy
      </button>
    </div>
  );
}"#;

    #[test]
    fn scans_structure_in_document_order() {
        let elements = scan(CARD);
        let tags: Vec<&str> = elements.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["div", "h3", "img", "button", "Icon"]);

        let depths: Vec<usize> = elements.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 1, 2]);
        assert_eq!(elements[4].parent, Some(3));
        assert!(elements[2].self_closing);
        assert!(elements[0].close.is_some());
    }

    #[test]
    fn direct_text_skips_child_elements() {
        let elements = scan(CARD);
        assert_eq!(elements[1].text, "Pro plan");
        assert_eq!(elements[3].text, "Buy");
        assert_eq!(elements[0].text, "");
    }

    #[test]
    fn attributes_and_style_are_extracted() {
        let elements = scan(CARD);
        let root = &elements[0];
        assert_eq!(root.attr_value("className"), Some("card"));
        let style = root.style(CARD).expect("inline style");
        assert_eq!(style.px("width"), Some(320.0));
        assert_eq!(elements[1].attr_value("data-node-id"), Some("title"));
        assert_eq!(elements[2].attr_value("src"), Some("props.src"));
        assert!(elements[3].has_attribute("onClick"));
    }

    #[test]
    fn insertion_point_precedes_terminator() {
        let src = "<div  />";
        let elements = scan(src);
        assert_eq!(elements[0].insert_at(src), 4);

        let src = r#"<span id="a" >x</span>"#;
        let elements = scan(src);
        assert_eq!(&src[..elements[0].insert_at(src)], r#"<span id="a""#);
    }

    #[test]
    fn pointer_cursor_detection() {
        let src = concat!(
            r#"<div style={{ cursor: 'pointer' }}>"#,
            r#"<span className="p-2 cursor-pointer">a</span><p>b</p></div>"#
        );
        let elements = scan(src);
        assert!(elements[0].has_pointer_cursor(src));
        assert!(elements[1].has_pointer_cursor(src));
        assert!(!elements[2].has_pointer_cursor(src));
    }

    #[test]
    fn unterminated_tag_stops_the_scan() {
        let elements = scan("<div><span style={{ top: 1 </div>");
        assert_eq!(elements.len(), 1);
        assert!(elements[0].close.is_none());
    }
}
