//! Tree walker
//!
//! Depth-first, pre-order walk over a [`Node`] tree. For every visited node the
//! walker emits, in this fixed order:
//!
//! 1. the node kind under the kind key (`XamlType` by default)
//! 2. allow-listed own attributes, sorted by name
//! 3. attached attributes, in configured order
//! 4. the identity tag under `AutomationId`
//! 5. a `children` array, when any child is visitable
//!
//! The order never depends on the provider, so dumping the same snapshot twice
//! produces byte-identical documents.

use crate::error::DumpError;
use crate::filter::{AttributeSpec, FilterConfig, PropertyFilter, DEFAULT_ALLOW_LIST};
use crate::format::{json_backend, legacy_backend, OutputFormat};
use crate::node::{ExtractionFailure, Node};
use crate::sink::TreeSink;
use crate::translator::ValueTranslator;
use crate::value::AttributeValue;
use std::fmt;
use tracing::{debug, trace};

pub const DEFAULT_KIND_KEY: &str = "XamlType";
pub const CHILDREN_KEY: &str = "children";
pub const IDENTITY_KEY: &str = "AutomationId";
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// The text of one dump
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializedDocument(String);

impl SerializedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the root was missing or hidden
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a JSON dump into a value tree
    pub fn parse(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl fmt::Display for SerializedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SerializedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SerializedDocument> for String {
    fn from(document: SerializedDocument) -> Self {
        document.0
    }
}

/// Dump a tree with the default allow-list plus `extra_attribute_names`
///
/// `excluded`, when given, is skipped together with its subtree.
pub fn dump_tree<N, I, S>(
    root: Option<&N>,
    excluded: Option<&N>,
    extra_attribute_names: I,
    attached: Vec<AttributeSpec>,
) -> Result<SerializedDocument, DumpError>
where
    N: Node,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allow_list = DEFAULT_ALLOW_LIST
        .iter()
        .map(|name| name.to_string())
        .chain(extra_attribute_names.into_iter().map(Into::into));
    TreeDumper::new(FilterConfig::new(allow_list, attached)).dump(root, excluded)
}

/// A configured dumper
#[derive(Debug, Clone)]
pub struct TreeDumper {
    filter: PropertyFilter,
    format: OutputFormat,
    kind_key: String,
    max_depth: usize,
}

impl Default for TreeDumper {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl TreeDumper {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            filter: PropertyFilter::new(config),
            format: OutputFormat::Json,
            kind_key: DEFAULT_KIND_KEY.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_kind_key(mut self, kind_key: impl Into<String>) -> Self {
        self.kind_key = kind_key.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn filter(&self) -> &PropertyFilter {
        &self.filter
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Walk `root` and serialize it
    ///
    /// A missing or hidden root produces an empty document.
    pub fn dump<N: Node>(
        &self,
        root: Option<&N>,
        excluded: Option<&N>,
    ) -> Result<SerializedDocument, DumpError> {
        let root = match root {
            Some(root) if self.filter.should_visit_node(root) => root,
            Some(root) => {
                debug!(kind = %root.kind(), "root node is hidden, nothing to dump");
                return Ok(SerializedDocument::default());
            }
            None => return Ok(SerializedDocument::default()),
        };

        let text = match self.format {
            OutputFormat::Json => {
                let (translator, sink) = json_backend(&self.kind_key);
                self.walk(&translator, excluded).visit(root, 0, sink)?.finish()
            }
            OutputFormat::Legacy => {
                let (translator, sink) = legacy_backend();
                self.walk(&translator, excluded).visit(root, 0, sink)?.finish()
            }
        };
        Ok(SerializedDocument(text))
    }

    fn walk<'a, N, T>(&'a self, translator: &'a T, excluded: Option<&'a N>) -> Walk<'a, N, T> {
        Walk {
            filter: &self.filter,
            translator,
            excluded,
            max_depth: self.max_depth,
        }
    }
}

/// State of one dump; the sink itself is threaded through `visit` by value
struct Walk<'a, N, T> {
    filter: &'a PropertyFilter,
    translator: &'a T,
    excluded: Option<&'a N>,
    max_depth: usize,
}

impl<'a, N: Node, T: ValueTranslator> Walk<'a, N, T> {
    fn visit<S: TreeSink>(&self, node: &N, depth: usize, mut sink: S) -> Result<S, DumpError> {
        if depth >= self.max_depth {
            return Err(DumpError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let children = self.visitable_children(node);

        sink.begin_node(&node.kind());
        self.write_attributes(node, &mut sink);
        if !children.is_empty() {
            sink.begin_array(CHILDREN_KEY);
            for child in &children {
                sink = self.visit(child, depth + 1, sink)?;
            }
            sink.end_array();
        }
        sink.end_node();
        Ok(sink)
    }

    fn visitable_children(&self, node: &N) -> Vec<N> {
        node.children()
            .into_iter()
            .filter(|child| {
                if let Some(excluded) = self.excluded {
                    if child.same_node(excluded) {
                        trace!(kind = %child.kind(), "skipping excluded subtree");
                        return false;
                    }
                }
                self.filter.should_visit_node(child)
            })
            .collect()
    }

    fn write_attributes<S: TreeSink>(&self, node: &N, sink: &mut S) {
        let mut emitted: Vec<String> = Vec::new();

        for name in self.filter.own_attributes(node) {
            let text = match node.attribute(&name) {
                Ok(value) => self.translate(&name, &value),
                Err(failure) => {
                    // Only the generic rule applies to the sentinel, never the `Name` override
                    let sentinel = extraction_sentinel(&name, &failure);
                    debug!(attribute = %name, error = %failure, "attribute read failed");
                    let text = self.translator.to_text(&name, &sentinel);
                    if self.filter.should_include_value(&text) {
                        Some(text)
                    } else {
                        None
                    }
                }
            };
            if let Some(text) = text {
                sink.property(&name, &text);
                emitted.push(name);
            }
        }

        for spec in self.filter.attached_specs() {
            if emitted.iter().any(|name| name == spec.name()) {
                trace!(attribute = spec.name(), "attached attribute shadowed by own attribute");
                continue;
            }
            let Some(attached) = node.attached_attribute(spec.name()) else {
                continue;
            };
            if spec.exclude_if_unset() && !attached.is_local {
                continue;
            }
            let value = spec.apply(attached.value);
            if let Some(text) = self.translate(spec.name(), &value) {
                sink.property(spec.name(), &text);
            }
        }

        if let Some(tag) = node.identity_tag().filter(|tag| !tag.is_null()) {
            let text = self.translator.to_text(IDENTITY_KEY, &tag);
            if self.filter.should_include_value(&text) {
                sink.property(IDENTITY_KEY, &text);
            } else {
                trace!(value = %text, "identity tag filtered out");
            }
        }
    }

    /// Translated text of a value, or `None` when the filter drops it
    fn translate(&self, name: &str, value: &AttributeValue) -> Option<String> {
        let text = self.translator.to_text(name, value);
        if self.filter.should_include(name, value, &text) {
            Some(text)
        } else {
            trace!(attribute = name, value = %text, "value filtered out");
            None
        }
    }
}

fn extraction_sentinel(name: &str, failure: &ExtractionFailure) -> AttributeValue {
    AttributeValue::String(format!("Exception when reading {}: {}", name, failure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryNode;
    use crate::node::AttachedValue;
    use crate::value::{Color, Size};

    fn visible(kind: &str) -> MemoryNode {
        MemoryNode::new(kind).with_attribute("Visibility", AttributeValue::symbol("Visible"))
    }

    fn dump(root: &MemoryNode) -> String {
        TreeDumper::default()
            .dump(Some(&root), None)
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_single_node_layout() {
        let node = visible("TextBlock")
            .with_attribute("Text", "test")
            .with_attribute("RenderSize", Size::new(10.7, 20.2))
            .with_attribute("Foreground", Color::rgb(0, 0, 0))
            .with_attribute("Clip", AttributeValue::Null);

        insta::assert_snapshot!(dump(&node).trim_end(), @r###"
        {
          "XamlType": "TextBlock",
          "Clip": null,
          "Foreground": "#FF000000",
          "RenderSize": [10, 20],
          "Text": "test",
          "Visibility": "Visible"
        }
        "###);
    }

    #[test]
    fn test_attribute_order() {
        let node = MemoryNode::new("Border")
            .with_attribute("Width", 4)
            .with_attribute("Background", Color::rgb(1, 2, 3))
            .with_attached("Grid.Row", AttachedValue::local(2))
            .with_attached("Canvas.Left", AttachedValue::local(5))
            .with_identity("border-1");
        let config = FilterConfig::default()
            .with_attached(AttributeSpec::new("Grid.Row"))
            .with_attached(AttributeSpec::new("Canvas.Left"));

        let text = TreeDumper::new(config)
            .dump(Some(&&node), None)
            .unwrap()
            .into_string();
        let keys: Vec<&str> = text
            .lines()
            .filter_map(|line| line.trim().strip_prefix('"'))
            .filter_map(|line| line.split('"').next())
            .collect();
        assert_eq!(
            keys,
            vec!["XamlType", "Background", "Width", "Grid.Row", "Canvas.Left", "AutomationId"]
        );
    }

    #[test]
    fn test_unlisted_attributes_are_not_emitted() {
        let node = MemoryNode::new("Border").with_attribute("Opacity", 0.5);
        let text = dump(&node);
        assert!(!text.contains("Opacity"));
    }

    #[test]
    fn test_extra_names_extend_allow_list() {
        let node = MemoryNode::new("Border").with_attribute("Opacity", 0.5);
        let text = dump_tree(Some(&&node), None, ["Opacity"], Vec::new()).unwrap();
        assert!(text.as_str().contains("\"Opacity\": 0.5"));
    }

    #[test]
    fn test_failed_reads_are_dropped() {
        let node = MemoryNode::new("TextBlock")
            .with_attribute("Text", "ok")
            .with_failing_attribute("Width", "layout not ready")
            .with_failing_attribute("Name", "detached");
        let text = dump(&node);
        assert!(text.contains("\"Text\": \"ok\""));
        assert!(!text.contains("Width"));
        assert!(!text.contains("Name"));
        assert!(!text.contains("Exception"));
    }

    #[test]
    fn test_nan_and_empty_names_are_dropped() {
        let node = MemoryNode::new("Border")
            .with_attribute("Width", f64::NAN)
            .with_attribute("Height", 12.0)
            .with_attribute("Name", "");
        let text = dump(&node);
        assert!(!text.contains("NaN"));
        assert!(!text.contains("Name"));
        assert!(text.contains("\"Height\": 12"));
    }

    #[test]
    fn test_external_binding_names_are_dropped() {
        let node = MemoryNode::new("Border").with_attribute("Name", "<reacttag>:17");
        assert!(!dump(&node).contains("Name"));
    }

    #[test]
    fn test_empty_text_is_kept() {
        let node = MemoryNode::new("TextBlock").with_attribute("Text", "");
        assert!(dump(&node).contains("\"Text\": \"\""));
    }

    #[test]
    fn test_attached_unset_rule_runs_before_transform() {
        let node = MemoryNode::new("Border")
            .with_attached("Grid.Row", AttachedValue::unset(0))
            .with_attached("Grid.Column", AttachedValue::unset(0));
        let config = FilterConfig::default()
            .with_attached(AttributeSpec::new("Grid.Row").excluding_unset().with_transform(|_| {
                AttributeValue::from("transformed")
            }))
            .with_attached(AttributeSpec::new("Grid.Column").with_transform(|_| {
                AttributeValue::Float(f64::NAN)
            }));

        let text = TreeDumper::new(config)
            .dump(Some(&&node), None)
            .unwrap()
            .into_string();
        assert!(!text.contains("Grid.Row"));
        assert!(!text.contains("transformed"));
        // transformed to NaN, then dropped by the value filter
        assert!(!text.contains("Grid.Column"));
    }

    #[test]
    fn test_attached_shadowed_by_emitted_own_attribute() {
        let node = MemoryNode::new("Border")
            .with_attribute("Width", 4)
            .with_attached("Width", AttachedValue::local(99));
        let config = FilterConfig::default().with_attached(AttributeSpec::new("WidthProperty"));

        let text = TreeDumper::new(config)
            .dump(Some(&&node), None)
            .unwrap()
            .into_string();
        assert_eq!(text.matches("\"Width\"").count(), 1);
        assert!(text.contains("\"Width\": 4"));
    }

    #[test]
    fn test_hidden_and_excluded_children() {
        let root = visible("Grid")
            .with_child(visible("Leaf").with_attribute("Name", "keep"))
            .with_child(
                MemoryNode::new("ScrollBar")
                    .with_attribute("Name", "VerticalScrollBar")
                    .with_child(visible("Thumb")),
            )
            .with_child(visible("Leaf").with_attribute("Name", "excluded"));
        let excluded = &root.children[2];

        let document = TreeDumper::default()
            .dump(Some(&&root), Some(&excluded))
            .unwrap();
        let parsed = document.parse().unwrap();
        let children = parsed["children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["Name"], "keep");
        assert!(!document.as_str().contains("Thumb"));
    }

    #[test]
    fn test_no_children_array_when_all_children_hidden() {
        let root = visible("Grid").with_child(
            MemoryNode::new("ScrollBar").with_attribute("Name", "HorizontalScrollBar"),
        );
        assert!(!dump(&root).contains("children"));
    }

    #[test]
    fn test_missing_or_hidden_root() {
        let dumper = TreeDumper::default();
        assert!(dumper.dump::<&MemoryNode>(None, None).unwrap().is_empty());

        let hidden = MemoryNode::new("ScrollBar").with_attribute("Name", "ScrollBarSeparator");
        assert!(dumper.dump(Some(&&hidden), None).unwrap().is_empty());
    }

    #[test]
    fn test_identity_tag_is_last() {
        let node = visible("Button").with_identity("ok-button");
        let text = dump(&node);
        let last_property = text.lines().rev().nth(1).unwrap().trim();
        assert_eq!(last_property, "\"AutomationId\": \"ok-button\"");
    }

    #[test]
    fn test_non_finite_identity_tag_is_dropped() {
        let node = visible("Button").with_identity(f64::NAN);
        let text = dump(&node);
        assert!(!text.contains("AutomationId"));
        assert!(!text.contains("NaN"));
        assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());

        let numbered = visible("Button").with_identity(7);
        assert!(dump(&numbered).contains("\"AutomationId\": 7"));
    }

    #[test]
    fn test_accessors_expose_configuration() {
        let dumper = TreeDumper::new(
            FilterConfig::default().with_hidden_node_names(["Chrome"]),
        )
        .with_format(OutputFormat::Legacy);

        assert_eq!(dumper.format(), OutputFormat::Legacy);
        assert_eq!(dumper.filter().config().hidden_node_names(), ["Chrome".to_string()]);
        assert!(dumper.filter().should_include_name("Text"));

        let chrome = MemoryNode::new("Border").with_attribute("Name", "Chrome");
        assert!(dumper.dump(Some(&&chrome), None).unwrap().is_empty());
    }

    #[test]
    fn test_depth_guard() {
        let chain = visible("A").with_child(visible("B").with_child(visible("C")));
        let result = TreeDumper::default()
            .with_max_depth(2)
            .dump(Some(&&chain), None);
        assert_eq!(result, Err(DumpError::DepthExceeded { limit: 2 }));

        assert!(TreeDumper::default()
            .with_max_depth(3)
            .dump(Some(&&chain), None)
            .is_ok());
    }

    #[test]
    fn test_custom_kind_key() {
        let node = visible("Leaf");
        let text = TreeDumper::default()
            .with_kind_key("kind")
            .dump(Some(&&node), None)
            .unwrap();
        assert_eq!(text.parse().unwrap()["kind"], "Leaf");
    }

    #[test]
    fn test_legacy_format() {
        let root = visible("StackPanel").with_child(
            MemoryNode::new("TextBlock")
                .with_attribute("Text", "hi")
                .with_attribute("Clip", AttributeValue::Null),
        );
        let text = TreeDumper::default()
            .with_format(OutputFormat::Legacy)
            .dump(Some(&&root), None)
            .unwrap();
        assert_eq!(
            text.as_str(),
            "[StackPanel]\n  Visibility=Visible\n  [TextBlock]\n    Clip=[NULL]\n    Text=hi\n"
        );
    }
}
