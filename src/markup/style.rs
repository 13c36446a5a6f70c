//! Inline style objects.

use super::rules::{unquote, STYLE_BLOCK, STYLE_PAIR};

/// Ordered `key: value` pairs of one `style={{...}}` attribute.
///
/// Values are kept as raw source text (quotes included) so untouched entries
/// round-trip verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pairs: Vec<(String, String)>,
}

impl Style {
    /// Parse an object body (the text between the double braces).
    ///
    /// Lenient: entries the pair rule does not recognise are skipped. Use
    /// [`Style::parse_exact`] when the result will be rendered back.
    pub fn parse(body: &str) -> Self {
        let pairs = STYLE_PAIR
            .captures_iter(body)
            .filter_map(|caps| {
                let key = caps.get(1).or(caps.get(2)).or(caps.get(3))?;
                let value = caps.get(4)?;
                Some((key.as_str().to_string(), value.as_str().to_string()))
            })
            .collect();
        Self { pairs }
    }

    /// Parse a body only if its recognised pairs and the separators between
    /// them cover all of it. Spreads, calls and conditional values make this
    /// `None`, since rendering would drop or garble them.
    pub fn parse_exact(body: &str) -> Option<Self> {
        let mut covered = 0;
        for m in STYLE_PAIR.find_iter(body) {
            if !is_separator(&body[covered..m.start()]) {
                return None;
            }
            covered = m.end();
        }
        is_separator(&body[covered..]).then(|| Self::parse(body))
    }

    /// Parse a whole `style={{...}}` attribute; `None` for other shapes.
    pub fn from_attribute(text: &str) -> Option<Self> {
        STYLE_BLOCK
            .captures(text.trim())
            .and_then(|caps| caps.get(1))
            .and_then(|body| Self::parse_exact(body.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value with quotes removed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_raw(key).map(unquote)
    }

    /// Numeric pixel value: `'12.5px'`, `'12.5'` and bare `12.5` all read
    /// as 12.5. Other units are not pixel values.
    pub fn px(&self, key: &str) -> Option<f64> {
        let value = self.get(key)?.trim();
        value.strip_suffix("px").unwrap_or(value).trim().parse().ok()
    }

    /// Set the raw value, keeping the key's position; later duplicates go.
    pub fn set_raw(&mut self, key: &str, raw: impl Into<String>) {
        let raw = raw.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = raw;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), raw)),
        }
    }

    pub fn set_str(&mut self, key: &str, value: &str) {
        let raw = if value.contains('\'') {
            format!("\"{value}\"")
        } else {
            format!("'{value}'")
        };
        self.set_raw(key, raw);
    }

    pub fn set_px(&mut self, key: &str, value: f64) {
        self.set_raw(key, format!("'{}'", format_px(value)));
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.len() != before
    }

    /// Canonical attribute text: `style={{ key: 'value', ... }}`.
    pub fn render(&self) -> String {
        if self.pairs.is_empty() {
            return "style={{}}".to_string();
        }
        let body = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}: {}", render_key(k), v))
            .collect::<Vec<_>>()
            .join(", ");
        format!("style={{{{ {body} }}}}")
    }
}

/// Whitespace with at most one comma.
fn is_separator(text: &str) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).all(|c| c == ',')
        && text.matches(',').count() <= 1
}

fn render_key(key: &str) -> String {
    let bare = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if bare {
        key.to_string()
    } else {
        format!("'{key}'")
    }
}

/// Format a design coordinate as a CSS pixel value.
///
/// Floating-point noise below 1e-4 is dropped and trailing zeros trimmed;
/// no other rounding happens, so `12.25` stays `12.25px`.
pub fn format_px(value: f64) -> String {
    let cleaned = (value * 10_000.0).round() / 10_000.0;
    let mut text = format!("{cleaned:.4}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    if text == "-0" {
        text = "0".to_string();
    }
    format!("{text}px")
}
