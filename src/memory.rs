//! In-memory node provider
//!
//! [`MemoryNode`] is a plain owned tree that implements [`Node`] through `&MemoryNode`
//! handles. It backs the test suites and the `treedump dump` command, which reads
//! tree descriptions like:
//!
//! ```text
//! {
//!   "kind": "StackPanel",
//!   "attributes": { "Visibility": { "Enum": "Visible" } },
//!   "children": [
//!     { "kind": "TextBlock", "attributes": { "Text": { "String": "hello" } } }
//!   ]
//! }
//! ```

use crate::node::{AttachedValue, ExtractionFailure, Node};
use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// An owned tree element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryNode {
    pub kind: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Own attributes whose read fails, with the failure message
    #[serde(default)]
    pub failing: BTreeMap<String, String>,
    #[serde(default)]
    pub attached: BTreeMap<String, MemoryAttached>,
    #[serde(default)]
    pub identity: Option<AttributeValue>,
    #[serde(default)]
    pub children: Vec<MemoryNode>,
}

/// Attached attribute entry of a [`MemoryNode`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryAttached {
    pub value: AttributeValue,
    #[serde(default = "default_local")]
    pub local: bool,
}

fn default_local() -> bool {
    true
}

impl MemoryNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON tree description
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Declare an own attribute whose read fails with `message`
    pub fn with_failing_attribute(mut self, name: &str, message: &str) -> Self {
        self.failing.insert(name.to_string(), message.to_string());
        self
    }

    pub fn with_attached(mut self, name: &str, value: AttachedValue) -> Self {
        self.attached.insert(
            name.to_string(),
            MemoryAttached {
                value: value.value,
                local: value.is_local,
            },
        );
        self
    }

    pub fn with_identity(mut self, tag: impl Into<AttributeValue>) -> Self {
        self.identity = Some(tag.into());
        self
    }

    pub fn with_child(mut self, child: MemoryNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<MemoryNode>) -> Self {
        self.children.extend(children);
        self
    }
}

impl<'a> Node for &'a MemoryNode {
    fn kind(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.kind)
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<Self> {
        let node: &'a MemoryNode = *self;
        node.children.get(index)
    }

    fn own_attribute_names(&self) -> Vec<Cow<'_, str>> {
        self.attributes
            .keys()
            .chain(self.failing.keys())
            .map(|name| Cow::Borrowed(name.as_str()))
            .collect()
    }

    fn attribute(&self, name: &str) -> Result<AttributeValue, ExtractionFailure> {
        if let Some(message) = self.failing.get(name) {
            return Err(ExtractionFailure::new(message.clone()));
        }
        self.attributes
            .get(name)
            .cloned()
            .ok_or_else(|| ExtractionFailure::new(format!("{} has no attribute {}", self.kind, name)))
    }

    fn attached_attribute(&self, name: &str) -> Option<AttachedValue> {
        self.attached.get(name).map(|entry| AttachedValue {
            value: entry.value.clone(),
            is_local: entry.local,
        })
    }

    fn identity_tag(&self) -> Option<AttributeValue> {
        self.identity.clone()
    }

    fn same_node(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_own_and_failing_attributes() {
        let node = MemoryNode::new("TextBlock")
            .with_attribute("Text", "hi")
            .with_failing_attribute("Width", "layout pending");
        let handle = &node;

        let names: Vec<String> = handle
            .own_attribute_names()
            .into_iter()
            .map(|n| n.into_owned())
            .collect();
        assert_eq!(names, vec!["Text".to_string(), "Width".to_string()]);
        assert_eq!(handle.attribute("Text"), Ok(AttributeValue::from("hi")));
        assert_eq!(
            handle.attribute("Width"),
            Err(ExtractionFailure::new("layout pending"))
        );
    }

    #[test]
    fn test_declared_name_requires_string() {
        let named = MemoryNode::new("Border").with_attribute("Name", "Chrome");
        let numbered = MemoryNode::new("Border").with_attribute("Name", 5);
        let anonymous = MemoryNode::new("Border");

        assert_eq!((&named).declared_name(), Some("Chrome".to_string()));
        assert_eq!((&numbered).declared_name(), None);
        assert_eq!((&anonymous).declared_name(), None);
    }

    #[test]
    fn test_same_node_is_identity_not_equality() {
        let root = MemoryNode::new("Panel")
            .with_child(MemoryNode::new("Leaf"))
            .with_child(MemoryNode::new("Leaf"));
        let handle = &root;
        let first = handle.child_at(0).unwrap();
        let second = handle.child_at(1).unwrap();

        assert_eq!(first, second);
        assert!(!first.same_node(&second));
        assert!(first.same_node(&handle.child_at(0).unwrap()));
    }

    #[test]
    fn test_parses_tree_description() {
        let node = MemoryNode::from_json(
            r#"{
                "kind": "Grid",
                "attached": { "Grid.Row": { "value": { "Int": 1 }, "local": false } },
                "identity": { "String": "main" },
                "children": [ { "kind": "Leaf" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(node.children.len(), 1);
        assert_eq!(
            (&node).attached_attribute("Grid.Row"),
            Some(AttachedValue::unset(1))
        );
        assert_eq!((&node).identity_tag(), Some(AttributeValue::from("main")));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(MemoryNode::from_json(r#"{"kind": "Grid", "colour": 1}"#).is_err());
    }
}
