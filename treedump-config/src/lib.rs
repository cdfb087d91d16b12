//! Shared configuration loader for treedump.
//!
//! `defaults/treedump.default.toml` is embedded into every binary so that the
//! documented defaults and runtime behavior stay in sync. Applications layer
//! user files and command-line overrides on top via [`Loader`] before
//! deserializing into [`TreeDumpConfig`], which then builds the library objects.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use treedump::{AttributeSpec, Comparator, FilterConfig, FormatError, OutputFormat, TreeDumper};

const DEFAULT_TOML: &str = include_str!("../defaults/treedump.default.toml");

/// Top-level configuration consumed by treedump applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeDumpConfig {
    pub filter: FilterSection,
    pub output: OutputSection,
    pub compare: CompareSection,
}

/// Which attributes and nodes make it into a dump.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSection {
    pub allow_list: Vec<String>,
    #[serde(default)]
    pub extra_names: Vec<String>,
    pub hidden_node_names: Vec<String>,
    #[serde(default)]
    pub attached: Vec<AttachedEntry>,
}

/// One attached attribute to report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttachedEntry {
    pub name: String,
    #[serde(default)]
    pub exclude_if_unset: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    pub format: String,
    pub kind_key: String,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareSection {
    pub epsilon: f64,
}

impl TreeDumpConfig {
    pub fn filter_config(&self) -> FilterConfig {
        let attached = self
            .filter
            .attached
            .iter()
            .map(|entry| {
                let spec = AttributeSpec::new(&entry.name);
                if entry.exclude_if_unset {
                    spec.excluding_unset()
                } else {
                    spec
                }
            })
            .collect();

        FilterConfig::new(self.filter.allow_list.iter().cloned(), attached)
            .with_extra_names(self.filter.extra_names.iter().cloned())
            .with_hidden_node_names(self.filter.hidden_node_names.iter().cloned())
    }

    pub fn output_format(&self) -> Result<OutputFormat, FormatError> {
        self.output.format.parse()
    }

    /// A dumper with every configured knob applied.
    pub fn dumper(&self) -> Result<TreeDumper, FormatError> {
        Ok(TreeDumper::new(self.filter_config())
            .with_format(self.output_format()?)
            .with_kind_key(self.output.kind_key.clone())
            .with_max_depth(self.output.max_depth))
    }

    pub fn comparator(&self) -> Comparator {
        Comparator::new().with_epsilon(self.compare.epsilon)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TreeDumpConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TreeDumpConfig, ConfigError> {
    Loader::new().build()
}
