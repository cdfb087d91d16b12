//! The node capability
//!
//! The walker never looks inside the object model it dumps. Instead, every
//! provider (a scene-graph binding, an accessibility tree, the in-memory
//! [`MemoryNode`](crate::memory::MemoryNode)) implements [`Node`] for a cheap
//! handle type and answers a handful of questions about each element.

use crate::value::AttributeValue;
use std::borrow::Cow;
use thiserror::Error;

/// Reading an attribute from a live object failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtractionFailure {
    pub message: String,
}

impl ExtractionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An attached attribute as seen on one node
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedValue {
    /// Effective value (the attribute's default when nothing was set locally)
    pub value: AttributeValue,
    /// Whether the value was set on this node rather than inherited from the default
    pub is_local: bool,
}

impl AttachedValue {
    pub fn local(value: impl Into<AttributeValue>) -> Self {
        Self {
            value: value.into(),
            is_local: true,
        }
    }

    pub fn unset(default: impl Into<AttributeValue>) -> Self {
        Self {
            value: default.into(),
            is_local: false,
        }
    }
}

/// Handle to one element of a tree
///
/// Implementors are handles (references, `Rc`s, ids into an arena) so that
/// [`Node::child_at`] can hand out owned values. The tree must be finite and
/// acyclic for the duration of a dump.
pub trait Node: Sized {
    /// Stable type name of the element
    fn kind(&self) -> Cow<'_, str>;

    fn child_count(&self) -> usize;

    fn child_at(&self, index: usize) -> Option<Self>;

    /// Names of the attributes intrinsic to this element's shape
    fn own_attribute_names(&self) -> Vec<Cow<'_, str>>;

    /// Reads one own attribute
    fn attribute(&self, name: &str) -> Result<AttributeValue, ExtractionFailure>;

    /// Reads an attached attribute, `None` when the element does not support it
    fn attached_attribute(&self, name: &str) -> Option<AttachedValue>;

    /// Automation/identity tag, if the element carries one
    fn identity_tag(&self) -> Option<AttributeValue>;

    /// Handle identity, used to skip the excluded subtree
    fn same_node(&self, other: &Self) -> bool;

    /// The element's declared `Name`, if it has a string one
    fn declared_name(&self) -> Option<String> {
        let declares_name = self
            .own_attribute_names()
            .iter()
            .any(|name| name.as_ref() == "Name");
        if !declares_name {
            return None;
        }
        match self.attribute("Name") {
            Ok(AttributeValue::String(name)) => Some(name),
            _ => None,
        }
    }

    /// Children in sibling order
    fn children(&self) -> Vec<Self> {
        (0..self.child_count())
            .filter_map(|i| self.child_at(i))
            .collect()
    }
}
