//! Attribute value translation
//!
//! Converts one [`AttributeValue`] into the text that an output sink writes after
//! the attribute name. Translation is pure and recursive: lists, highlighters and
//! their ranges are translated through the same rules as top-level values.
//!
//! ## JSON rules (first match wins)
//!
//! - `Null` → `null`, booleans → `true` / `false`
//! - numbers → their decimal form, non-finite floats → `NaN` (dropped later by the filter)
//! - colors → `"#AARRGGBB"`
//! - sizes → `[w, h]` with both dimensions truncated
//! - highlighters → `{"Background": …, "Foreground": …, "Ranges": […]}`
//! - ranges → `{"StartIndex": n, "Length": n}`
//! - strings, enum symbols and fallback text → quoted (see [`quote`])
//! - lists → `[a,b,c]`

use crate::value::AttributeValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters outside the Basic Multilingual Plane (emoji and other pictographs)
static ASTRAL_PLANE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{10000}-\x{10FFFF}]").expect("valid astral-plane pattern"));

/// Converts attribute values into serialized text
pub trait ValueTranslator {
    fn to_text(&self, name: &str, value: &AttributeValue) -> String;
}

/// Translator producing JSON fragments
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTranslator;

impl ValueTranslator for JsonTranslator {
    fn to_text(&self, name: &str, value: &AttributeValue) -> String {
        match value {
            AttributeValue::Null => "null".to_string(),
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Int(n) => n.to_string(),
            AttributeValue::Float(n) => float_text(*n),
            AttributeValue::Color(color) => quote(&color.to_string()),
            AttributeValue::Size(size) => size.to_string(),
            AttributeValue::Highlighter(highlighter) => {
                let mut fields = vec![format!(
                    "\"Background\": {}",
                    self.nested_text(name, &highlighter.background)
                )];
                if let Some(foreground) = &highlighter.foreground {
                    fields.push(format!("\"Foreground\": {}", self.nested_text(name, foreground)));
                }
                let ranges = AttributeValue::List(
                    highlighter
                        .ranges
                        .iter()
                        .map(|range| AttributeValue::Range(*range))
                        .collect(),
                );
                fields.push(format!("\"Ranges\": {}", self.to_text(name, &ranges)));
                format!("{{{}}}", fields.join(", "))
            }
            AttributeValue::Range(range) => format!(
                "{{\"StartIndex\": {}, \"Length\": {}}}",
                range.start_index, range.length
            ),
            AttributeValue::String(s) => quote(s),
            AttributeValue::Enum(symbol) => quote(symbol),
            AttributeValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|item| self.nested_text(name, item)).collect();
                format!("[{}]", parts.join(","))
            }
            AttributeValue::Other(text) => quote(text),
        }
    }
}

impl JsonTranslator {
    /// Text of a value embedded in a composite; non-finite floats become `null`
    fn nested_text(&self, name: &str, value: &AttributeValue) -> String {
        match value {
            AttributeValue::Float(n) if !n.is_finite() => "null".to_string(),
            _ => self.to_text(name, value),
        }
    }
}

/// Translator for the deprecated `name=value` format
///
/// Everything is written raw and unquoted, except that `null` becomes `[NULL]`
/// and booleans are capitalized (`True`, `False`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyTranslator;

impl ValueTranslator for LegacyTranslator {
    fn to_text(&self, _name: &str, value: &AttributeValue) -> String {
        value.to_string()
    }
}

fn float_text(n: f64) -> String {
    if n.is_finite() {
        n.to_string()
    } else {
        "NaN".to_string()
    }
}

/// Quote a string for JSON output
///
/// Pictographic characters are stripped, tabs become a single space, newlines
/// become the `\n` escape and the remaining JSON-significant characters are
/// escaped.
pub fn quote(text: &str) -> String {
    let stripped = ASTRAL_PLANE.replace_all(text, "");
    let mut out = String::with_capacity(stripped.len() + 2);
    out.push('"');
    for c in stripped.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push(' '),
            '\n' => out.push_str("\\n"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
