//! Legacy `key=value` sink (deprecated)
//!
//! Kept for old golden files. Nodes are written as `[Kind]` headers, properties as
//! indented `name=value` lines; arrays leave no trace of their own.
//!
//! ```text
//! [StackPanel]
//!   Visibility=Visible
//!   [TextBlock]
//!     Text=hello
//! ```

use super::TreeSink;

const INDENT: &str = "  ";

#[derive(Debug, Clone, Default)]
pub struct LegacySink {
    output: String,
    depth: usize,
}

impl LegacySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_line(&mut self, depth: usize, line: &str) {
        for _ in 0..depth {
            self.output.push_str(INDENT);
        }
        self.output.push_str(line);
        self.output.push('\n');
    }
}

impl TreeSink for LegacySink {
    fn begin_node(&mut self, kind: &str) {
        self.push_line(self.depth, &format!("[{}]", kind));
        self.depth += 1;
    }

    fn property(&mut self, name: &str, value: &str) {
        self.push_line(self.depth, &format!("{}={}", name, value));
    }

    fn begin_array(&mut self, _name: &str) {}

    fn end_array(&mut self) {}

    fn end_node(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn finish(self) -> String {
        self.output
    }
}
