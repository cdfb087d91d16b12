//! Output format selection
//!
//! Pairs each output sink with the translator that produces values in its syntax.

use crate::error::FormatError;
use crate::sink::{JsonSink, LegacySink};
use crate::translator::{JsonTranslator, LegacyTranslator};
use std::fmt;
use std::str::FromStr;

/// Document syntax of a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Canonical JSON, the only format the comparator reads
    #[default]
    Json,
    /// Deprecated `key=value` lines
    Legacy,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Legacy => "legacy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Json => "Nested JSON document, comparable with `compare`",
            OutputFormat::Legacy => "Indented [Kind] headers and name=value lines (deprecated)",
        }
    }

    pub fn available() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Legacy]
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "legacy" | "default" => Ok(OutputFormat::Legacy),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub(crate) fn json_backend(kind_key: &str) -> (JsonTranslator, JsonSink) {
    (JsonTranslator, JsonSink::new(kind_key))
}

pub(crate) fn legacy_backend() -> (LegacyTranslator, LegacySink) {
    (LegacyTranslator, LegacySink::new())
}
