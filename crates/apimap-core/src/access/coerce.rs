use super::node::Node;

/// A primitive type that a resolved node can be coerced into.
pub trait FromNode: Sized {
    /// Name used in coercion errors.
    const EXPECTED: &'static str;

    fn from_node(node: &Node) -> Option<Self>;
}

impl FromNode for Node {
    const EXPECTED: &'static str = "node";

    fn from_node(node: &Node) -> Option<Self> {
        Some(node.clone())
    }
}

impl FromNode for String {
    const EXPECTED: &'static str = "string";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::String(s) => Some(s.clone()),
            Node::Bool(b) => Some(b.to_string()),
            Node::Int(i) => Some(i.to_string()),
            Node::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

impl FromNode for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Int(i) => Some(*i),
            Node::Float(f) => Some(*f as i64),
            Node::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromNode for f64 {
    const EXPECTED: &'static str = "float";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Float(f) => Some(*f),
            Node::Int(i) => Some(*i as f64),
            Node::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromNode for bool {
    const EXPECTED: &'static str = "bool";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Bool(b) => Some(*b),
            Node::Int(0) => Some(false),
            Node::Int(1) => Some(true),
            Node::String(s) => parse_bool(s),
            _ => None,
        }
    }
}

impl FromNode for Vec<String> {
    const EXPECTED: &'static str = "string list";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_array()?.iter().map(String::from_node).collect()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
