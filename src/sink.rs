//! Output sinks
//!
//! A sink accumulates the token stream produced by the walker (node boundaries,
//! properties, the children array) into the final document text. The walker owns
//! the sink for the duration of a dump and threads it through the recursion; no
//! formatting state lives anywhere else.

mod json;
mod legacy;

pub use json::JsonSink;
pub use legacy::LegacySink;

/// Receives the token stream of one dump
pub trait TreeSink {
    /// Start a node; the sink writes the node's kind however its format requires
    fn begin_node(&mut self, kind: &str);

    /// One attribute whose value is already translated
    fn property(&mut self, name: &str, value: &str);

    fn begin_array(&mut self, name: &str);

    fn end_array(&mut self);

    fn end_node(&mut self);

    /// The finished document
    fn finish(self) -> String;
}
