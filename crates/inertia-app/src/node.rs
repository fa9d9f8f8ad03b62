use serde_json::Value;

use crate::component::Component;
use crate::key::ViewKey;
use crate::page::Props;

/// One element of the composed tree handed to the UI runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub component: Component,
    pub props: Props,
    /// Remount identity; `None` lets the runtime match by position.
    pub key: Option<ViewKey>,
    pub inherit_attrs: bool,
    pub children: Vec<Node>,
}

/// Top-level output of the composer, in sibling order.
pub type RenderTree = Vec<Node>;

/// The render primitive handed to function-style layouts.
pub type Render = fn(&Component, Props, Vec<Node>) -> Node;

/// Builds a node for `component`. The inheritance flag is read in its
/// normalised form so every node states it explicitly.
pub fn h(component: &Component, props: Props, children: Vec<Node>) -> Node {
    Node {
        component: component.clone(),
        props,
        key: None,
        inherit_attrs: component.inherit_attrs(),
        children,
    }
}

impl Node {
    pub fn with_key(mut self, key: Option<ViewKey>) -> Self {
        self.key = key;
        self
    }

    pub fn name(&self) -> &str {
        self.component.name()
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Compact nesting summary such as `App(Settings(Profile))`.
    pub fn describe(&self) -> String {
        if self.children.is_empty() {
            return self.name().to_string();
        }
        let children: Vec<String> = self.children.iter().map(Node::describe).collect();
        format!("{}({})", self.name(), children.join(", "))
    }
}

/// Summarises a whole tree, siblings separated by commas.
pub fn describe_tree(tree: &[Node]) -> String {
    tree.iter().map(Node::describe).collect::<Vec<_>>().join(", ")
}
