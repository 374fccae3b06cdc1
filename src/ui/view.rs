//! Declarative view tree produced by the components and consumed by the renderer.

use ratatui::style::Color;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Zero-argument action handed down from an ancestor.
///
/// Cloning shares the same closure, so every layer that forwards it
/// forwards the ancestor's action itself.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Run the action once
    pub fn invoke(&self) {
        (self.0)()
    }

    #[cfg(test)]
    /// True when both handles wrap the same closure
    pub fn same_as(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Plain,
    Thick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub color: Color,
    pub kind: BorderKind,
}

#[derive(Debug, Clone)]
pub enum Node {
    Container {
        border: Option<Border>,
        margin: u16,
        children: Vec<Node>,
    },
    Text(String),
    Button {
        label: String,
        on_activate: Callback,
    },
}

impl Node {
    /// Rows the node needs when laid out top to bottom
    pub fn height(&self) -> u16 {
        match self {
            Node::Text(_) | Node::Button { .. } => 1,
            Node::Container { border, margin, children } => {
                let frame = if border.is_some() { 2 } else { 0 };
                let inner: u16 = children.iter().map(Node::height).sum();
                inner.saturating_add(frame).saturating_add(margin.saturating_mul(2))
            }
        }
    }

    #[cfg(test)]
    /// Visible text of the tree, one entry per text or button line, in order
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.collect_text(&mut lines);
        lines
    }

    #[cfg(test)]
    fn collect_text(&self, out: &mut Vec<String>) {
        match self {
            Node::Text(text) => out.push(text.clone()),
            Node::Button { label, .. } => out.push(label.clone()),
            Node::Container { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    #[cfg(test)]
    /// Buttons in document order
    pub fn buttons(&self) -> Vec<(&str, &Callback)> {
        match self {
            Node::Text(_) => Vec::new(),
            Node::Button { label, on_activate } => vec![(label.as_str(), on_activate)],
            Node::Container { children, .. } => children.iter().flat_map(Node::buttons).collect(),
        }
    }

    /// JSON description of the tree; actions appear by name only
    pub fn describe(&self) -> Value {
        match self {
            Node::Text(text) => json!({ "type": "text", "text": text }),
            Node::Button { label, .. } => json!({
                "type": "button",
                "label": label,
                "onActivate": "addToCount",
            }),
            Node::Container { border, margin, children } => json!({
                "type": "container",
                "border": border.map(|b| json!({
                    "color": color_name(b.color),
                    "kind": match b.kind {
                        BorderKind::Plain => "plain",
                        BorderKind::Thick => "thick",
                    },
                })),
                "margin": margin,
                "children": children.iter().map(Node::describe).collect::<Vec<_>>(),
            }),
        }
    }
}

fn color_name(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        other => format!("{:?}", other).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_callback_clones_share_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cb = Callback::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let forwarded = cb.clone();

        forwarded.invoke();
        cb.invoke();

        assert!(cb.same_as(&forwarded));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_container_height() {
        let node = Node::Container {
            border: Some(Border { color: Color::Reset, kind: BorderKind::Plain }),
            margin: 1,
            children: vec![Node::Text("a".into()), Node::Text("b".into())],
        };
        // 2 lines + 2 border rows + 2 margin rows
        assert_eq!(node.height(), 6);
    }

    #[test]
    fn test_describe_names_action() {
        let node = Node::Button { label: "Go".into(), on_activate: Callback::new(|| {}) };
        let value = node.describe();
        assert_eq!(value["label"], "Go");
        assert_eq!(value["onActivate"], "addToCount");
    }

    #[test]
    fn test_describe_rgb_border() {
        let node = Node::Container {
            border: Some(Border { color: Color::Rgb(0x6F, 0xDB, 0xFF), kind: BorderKind::Thick }),
            margin: 1,
            children: Vec::new(),
        };
        let value = node.describe();
        assert_eq!(value["border"]["color"], "#6FDBFF");
        assert_eq!(value["border"]["kind"], "thick");
        assert_eq!(value["margin"], 1);
    }
}
