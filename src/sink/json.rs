//! JSON sink
//!
//! Writes a deterministic, two-space indented JSON document:
//!
//! ```text
//! {
//!   "XamlType": "StackPanel",
//!   "Visibility": "Visible",
//!   "children": [
//!     {
//!       "XamlType": "TextBlock",
//!       "Text": "hello"
//!     }
//!   ]
//! }
//! ```

use super::TreeSink;
use crate::translator::quote;

const INDENT: &str = "  ";

/// Sink producing the canonical JSON document
#[derive(Debug, Clone)]
pub struct JsonSink {
    output: String,
    kind_key: String,
    depth: usize,
    /// One entry per open object/array: whether it has no members yet
    first_member: Vec<bool>,
}

impl JsonSink {
    pub fn new(kind_key: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            kind_key: kind_key.into(),
            depth: 0,
            first_member: Vec::new(),
        }
    }

    /// Comma (unless first member), newline and indentation before a new member
    fn begin_member(&mut self) {
        if let Some(first) = self.first_member.last_mut() {
            if !*first {
                self.output.push(',');
            }
            *first = false;
        }
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.push_indent();
    }

    fn close(&mut self, bracket: char) {
        self.depth = self.depth.saturating_sub(1);
        self.first_member.pop();
        self.output.push('\n');
        self.push_indent();
        self.output.push(bracket);
    }

    fn push_indent(&mut self) {
        for _ in 0..self.depth {
            self.output.push_str(INDENT);
        }
    }
}

impl TreeSink for JsonSink {
    fn begin_node(&mut self, kind: &str) {
        self.begin_member();
        self.output.push('{');
        self.first_member.push(true);
        self.depth += 1;
        let kind_key = self.kind_key.clone();
        self.property(&kind_key, &quote(kind));
    }

    fn property(&mut self, name: &str, value: &str) {
        self.begin_member();
        self.output.push_str(&quote(name));
        self.output.push_str(": ");
        self.output.push_str(value);
    }

    fn begin_array(&mut self, name: &str) {
        self.begin_member();
        self.output.push_str(&quote(name));
        self.output.push_str(": [");
        self.first_member.push(true);
        self.depth += 1;
    }

    fn end_array(&mut self) {
        self.close(']');
    }

    fn end_node(&mut self) {
        self.close('}');
    }

    fn finish(mut self) -> String {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output
    }
}
