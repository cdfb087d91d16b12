//! Property filtering
//!
//! Decides which attributes of a node are eligible for output ([`PropertyFilter::should_include_name`])
//! and whether a translated value is worth writing ([`PropertyFilter::should_include_value`]).
//! Also hides helper nodes (scrollbar chrome and the like) from the walk entirely.
//!
//! A [`FilterConfig`] is normalized once when it is built: attached attribute names are
//! canonicalized and duplicates are dropped, first occurrence wins. The walker then only
//! needs exact-name lookups.

use crate::node::Node;
use crate::value::AttributeValue;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Own attributes reported when the caller asks for nothing else
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "Foreground",
    "Background",
    "Padding",
    "Margin",
    "RenderSize",
    "Visibility",
    "CornerRadius",
    "BorderThickness",
    "Width",
    "Height",
    "BorderBrush",
    "VerticalAlignment",
    "HorizontalAlignment",
    "Clip",
    "FlowDirection",
    "Name",
    "Text",
];

/// Node names that hide a node (and its subtree) from the walk
pub const DEFAULT_HIDDEN_NODE_NAMES: &[&str] =
    &["VerticalScrollBar", "HorizontalScrollBar", "ScrollBarSeparator"];

pub const NAME_ATTRIBUTE: &str = "Name";

/// Names bound by an external renderer start with this prefix and are not stable
pub const EXTERNAL_BINDING_PREFIX: &str = "<reacttag>:";

const DECLARATION_SUFFIX: &str = "Property";
const EXCEPTION_PREFIX: &str = "Exception";

/// Post-extraction transform for an attached attribute
pub type ValueTransform = Arc<dyn Fn(AttributeValue) -> AttributeValue + Send + Sync>;

/// Strip the `Property` declaration suffix (`Grid.RowProperty` → `Grid.Row`)
pub fn canonical_name(name: &str) -> &str {
    match name.strip_suffix(DECLARATION_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    }
}

/// One attached attribute of interest
#[derive(Clone)]
pub struct AttributeSpec {
    name: String,
    exclude_if_unset: bool,
    transform: Option<ValueTransform>,
}

impl AttributeSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: canonical_name(name).to_string(),
            exclude_if_unset: false,
            transform: None,
        }
    }

    /// Skip the attribute on nodes where it was never set locally
    pub fn excluding_unset(mut self) -> Self {
        self.exclude_if_unset = true;
        self
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(AttributeValue) -> AttributeValue + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exclude_if_unset(&self) -> bool {
        self.exclude_if_unset
    }

    /// Run the transform, if any
    pub fn apply(&self, value: AttributeValue) -> AttributeValue {
        match &self.transform {
            Some(transform) => transform(value),
            None => value,
        }
    }
}

impl fmt::Debug for AttributeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSpec")
            .field("name", &self.name)
            .field("exclude_if_unset", &self.exclude_if_unset)
            .field("transform", &self.transform.as_ref().map(|_| ".."))
            .finish()
    }
}

/// What to report for every node
#[derive(Debug, Clone)]
pub struct FilterConfig {
    allow_list: Vec<String>,
    attached: Vec<AttributeSpec>,
    hidden_node_names: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_LIST.iter().copied(), Vec::new())
    }
}

impl FilterConfig {
    pub fn new<I, S>(allow_list: I, attached: Vec<AttributeSpec>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self {
            allow_list: allow_list.into_iter().map(Into::into).collect(),
            attached,
            hidden_node_names: DEFAULT_HIDDEN_NODE_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        };
        config.normalize();
        config
    }

    /// Add own attribute names on top of the current allow-list
    pub fn with_extra_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list.extend(names.into_iter().map(Into::into));
        self.normalize();
        self
    }

    pub fn with_attached(mut self, spec: AttributeSpec) -> Self {
        self.attached.push(spec);
        self.normalize();
        self
    }

    pub fn with_hidden_node_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_node_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    pub fn attached(&self) -> &[AttributeSpec] {
        &self.attached
    }

    pub fn hidden_node_names(&self) -> &[String] {
        &self.hidden_node_names
    }

    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.allow_list.retain(|name| seen.insert(name.clone()));

        let mut seen = HashSet::new();
        for spec in &mut self.attached {
            spec.name = canonical_name(&spec.name).to_string();
        }
        self.attached.retain(|spec| seen.insert(spec.name.clone()));
    }
}

/// Applies a [`FilterConfig`] during a walk
#[derive(Debug, Clone)]
pub struct PropertyFilter {
    config: FilterConfig,
    allowed: HashSet<String>,
    attached: HashSet<String>,
}

impl PropertyFilter {
    pub fn new(config: FilterConfig) -> Self {
        let allowed = config.allow_list.iter().cloned().collect();
        let attached = config.attached.iter().map(|spec| spec.name.clone()).collect();
        Self {
            config,
            allowed,
            attached,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn attached_specs(&self) -> &[AttributeSpec] {
        &self.config.attached
    }

    pub fn should_include_name(&self, name: &str) -> bool {
        self.allowed.contains(name) || self.attached.contains(name)
    }

    pub fn is_own_attribute(&self, name: &str) -> bool {
        self.allowed.contains(name)
    }

    /// Generic rule over the translated text of a value
    ///
    /// Empty text, `NaN` and extraction-failure sentinels (raw or quoted) are dropped.
    pub fn should_include_value(&self, text: &str) -> bool {
        let unquoted = text.strip_prefix('"').unwrap_or(text);
        !text.is_empty() && text != "NaN" && !unquoted.starts_with(EXCEPTION_PREFIX)
    }

    /// Full value rule for one attribute, including the `Name` override
    pub fn should_include(&self, name: &str, value: &AttributeValue, text: &str) -> bool {
        if name == NAME_ATTRIBUTE {
            if let AttributeValue::String(declared) = value {
                return !declared.is_empty() && !declared.starts_with(EXTERNAL_BINDING_PREFIX);
            }
        }
        self.should_include_value(text)
    }

    /// Whether a node (and its subtree) takes part in the walk
    pub fn should_visit_node<N: Node>(&self, node: &N) -> bool {
        match node.declared_name() {
            Some(name) => !self.config.hidden_node_names.iter().any(|hidden| *hidden == name),
            None => true,
        }
    }

    /// The node's own attributes that pass the allow-list, sorted by name
    pub fn own_attributes<N: Node>(&self, node: &N) -> Vec<String> {
        let mut names: Vec<String> = node
            .own_attribute_names()
            .into_iter()
            .filter(|name| self.is_own_attribute(name))
            .map(|name| name.into_owned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
