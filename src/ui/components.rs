//! The family of components
//!
//! Only the root owns the count. Every layer below receives `count` and
//! `add_to_count` and hands them to the next layer unchanged, until the
//! great-grandchild finally displays the one and calls the other.

use super::view::{Border, BorderKind, Callback, Node};
use super::{ancestor_border, great_grand_child_border};

pub const INCREMENT_LABEL: &str = "Increment Count";

/// Root of the drilled tree
pub fn parent(count: i64, add_to_count: &Callback) -> Node {
    layer("I'm the parent", child(count, add_to_count))
}

pub fn child(count: i64, add_to_count: &Callback) -> Node {
    layer("I'm a child", grand_child(count, add_to_count))
}

pub fn grand_child(count: i64, add_to_count: &Callback) -> Node {
    layer("I'm a grandchild", great_grand_child(count, add_to_count))
}

/// Displays the count and a button that asks the owner to increment it.
///
/// Pure: the same `count` always yields the same tree, and the count is never
/// touched here. The button carries `add_to_count` itself, so activating it
/// calls the ancestor's action exactly once.
pub fn great_grand_child(count: i64, add_to_count: &Callback) -> Node {
    Node::Container {
        border: Some(Border {
            color: great_grand_child_border(),
            kind: BorderKind::Thick,
        }),
        margin: 1,
        children: vec![
            Node::Text("I'm a great-grandchild".to_string()),
            Node::Text(format!("Count is: {}", count)),
            Node::Button {
                label: INCREMENT_LABEL.to_string(),
                on_activate: add_to_count.clone(),
            },
        ],
    }
}

fn layer(label: &str, inner: Node) -> Node {
    Node::Container {
        border: Some(Border {
            color: ancestor_border(),
            kind: BorderKind::Plain,
        }),
        margin: 0,
        children: vec![Node::Text(label.to_string()), inner],
    }
}
