//! Finding elements by identity tag
//!
//! Test harnesses usually dump a whole window and then need one element of it.
//! Both helpers search depth-first in pre-order and return the first match.

use crate::node::Node;
use crate::walker::{CHILDREN_KEY, IDENTITY_KEY};
use serde_json::Value;

/// Find the object of a parsed JSON dump whose `AutomationId` is `id`
pub fn find_by_identity<'a>(document: &'a Value, id: &str) -> Option<&'a Value> {
    let mut pending = vec![document];
    while let Some(value) = pending.pop() {
        let Value::Object(object) = value else {
            continue;
        };
        if object.get(IDENTITY_KEY).and_then(Value::as_str) == Some(id) {
            return Some(value);
        }
        if let Some(Value::Array(children)) = object.get(CHILDREN_KEY) {
            pending.extend(children.iter().rev());
        }
    }
    None
}

/// Find the live node whose identity tag reads as `id`
///
/// `root` is a handle, so the match is returned as an owned handle too.
pub fn find_node_by_identity<N: Node>(root: N, id: &str) -> Option<N> {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        let matches = node
            .identity_tag()
            .map_or(false, |tag| tag.as_str() == Some(id));
        if matches {
            return Some(node);
        }
        let mut children = node.children();
        children.reverse();
        pending.extend(children);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryNode;
    use serde_json::json;

    #[test]
    fn test_find_in_document() {
        let document = json!({
            "XamlType": "Grid",
            "children": [
                {"XamlType": "Border", "children": [
                    {"XamlType": "TextBlock", "AutomationId": "label", "Text": "first"}
                ]},
                {"XamlType": "TextBlock", "AutomationId": "label", "Text": "second"}
            ]
        });

        let found = find_by_identity(&document, "label").unwrap();
        assert_eq!(found["Text"], "first");
        assert!(find_by_identity(&document, "missing").is_none());
    }

    #[test]
    fn test_root_can_match() {
        let document = json!({"XamlType": "Page", "AutomationId": "page"});
        assert_eq!(find_by_identity(&document, "page"), Some(&document));
    }

    #[test]
    fn test_find_live_node() {
        let tree = MemoryNode::new("StackPanel")
            .with_child(MemoryNode::new("Button").with_identity(7))
            .with_child(
                MemoryNode::new("Border").with_child(
                    MemoryNode::new("Button")
                        .with_identity("ok")
                        .with_attribute("Content", "OK"),
                ),
            );

        let found = find_node_by_identity(&tree, "ok").unwrap();
        assert_eq!(found.kind, "Button");
        assert!(found.attributes.contains_key("Content"));
        assert!(find_node_by_identity(&tree, "7").is_none());
    }
}
