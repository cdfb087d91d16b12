//! Attribute values extracted from nodes
//!
//! An [`AttributeValue`] is the runtime value of one named attribute at the moment
//! of a dump. The set of variants mirrors what a scene graph typically exposes:
//! scalars, enumerated symbols, paint and layout composites, rich-text ranges and
//! nested lists. Values are serde-(de)serializable so that in-memory trees can be
//! described in JSON files (see [`crate::memory`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of one node attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Symbolic name of an enumerated value (e.g. "Visible", "Stretch")
    Enum(String),
    Color(Color),
    Size(Size),
    Highlighter(TextHighlighter),
    Range(TextRange),
    List(Vec<AttributeValue>),
    /// Anything else, carried by its default textual form
    Other(String),
}

impl AttributeValue {
    /// Shorthand for an enumerated symbol
    pub fn symbol(name: impl Into<String>) -> Self {
        AttributeValue::Enum(name.into())
    }

    /// Shorthand for the fallback textual form
    pub fn other(text: impl Into<String>) -> Self {
        AttributeValue::Other(text.into())
    }

    /// The string payload, for `String` values only
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Color> for AttributeValue {
    fn from(value: Color) -> Self {
        AttributeValue::Color(value)
    }
}

impl From<Size> for AttributeValue {
    fn from(value: Size) -> Self {
        AttributeValue::Size(value)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(values: Vec<T>) -> Self {
        AttributeValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Null, Into::into)
    }
}

/// Raw, unquoted rendering; the legacy output format relies on it.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "[NULL]"),
            AttributeValue::Bool(true) => write!(f, "True"),
            AttributeValue::Bool(false) => write!(f, "False"),
            AttributeValue::Int(n) => write!(f, "{}", n),
            AttributeValue::Float(n) => write!(f, "{}", n),
            AttributeValue::String(s) | AttributeValue::Enum(s) | AttributeValue::Other(s) => {
                write!(f, "{}", s)
            }
            AttributeValue::Color(c) => write!(f, "{}", c),
            AttributeValue::Size(s) => write!(f, "{}", s),
            AttributeValue::Highlighter(h) => {
                write!(f, "TextHighlighter({} ranges)", h.ranges.len())
            }
            AttributeValue::Range(r) => write!(f, "{},{}", r.start_index, r.length),
            AttributeValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Solid paint, stored as ARGB channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xFF, r, g, b)
    }
}

/// `#AARRGGBB`
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

/// Layout size in device-independent units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions truncated toward zero.
    ///
    /// Layout floats drift between runs; only the integer parts are stable
    /// enough to snapshot.
    pub fn truncated(&self) -> (i64, i64) {
        (self.width as i64, self.height as i64)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.truncated();
        write!(f, "[{}, {}]", w, h)
    }
}

/// A run of characters inside a text element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start_index: i64,
    pub length: i64,
}

impl TextRange {
    pub const fn new(start_index: i64, length: i64) -> Self {
        Self {
            start_index,
            length,
        }
    }
}

/// Highlight applied to a set of text ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextHighlighter {
    pub background: Box<AttributeValue>,
    #[serde(default)]
    pub foreground: Option<Box<AttributeValue>>,
    #[serde(default)]
    pub ranges: Vec<TextRange>,
}

impl TextHighlighter {
    pub fn new(background: impl Into<AttributeValue>) -> Self {
        Self {
            background: Box::new(background.into()),
            foreground: None,
            ranges: Vec::new(),
        }
    }

    pub fn with_foreground(mut self, foreground: impl Into<AttributeValue>) -> Self {
        self.foreground = Some(Box::new(foreground.into()));
        self
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.ranges.push(range);
        self
    }
}
