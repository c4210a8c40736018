use crate::access::Node;
use crate::error::ParseError;

/// Parse a descriptor document from YAML.
pub fn from_yaml(input: &str) -> Result<Node, ParseError> {
    let raw: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    validate_root(Node::from(raw))
}

/// Parse a descriptor document from JSON.
pub fn from_json(input: &str) -> Result<Node, ParseError> {
    let raw: serde_json::Value = serde_json::from_str(input)?;
    validate_root(Node::from(raw))
}

fn validate_root(node: Node) -> Result<Node, ParseError> {
    match node {
        Node::Object(_) => Ok(node),
        other => Err(ParseError::InvalidRoot(other.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let node = from_json(r#"{"openapi": "3.0.0", "paths": {}}"#).unwrap();
        assert!(node.get_key("paths").is_some());
    }

    #[test]
    fn test_from_yaml() {
        let node = from_yaml("openapi: 3.0.0\npaths:\n  /users: {}\n").unwrap();
        assert!(node.get_key("paths").and_then(|p| p.get_key("/users")).is_some());
    }

    #[test]
    fn test_root_must_be_a_map() {
        assert!(matches!(from_json("[1, 2]"), Err(ParseError::InvalidRoot("array"))));
        assert!(matches!(from_yaml("just text"), Err(ParseError::InvalidRoot("string"))));
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(from_json("{"), Err(ParseError::Json(_))));
        assert!(matches!(from_yaml("a: [1"), Err(ParseError::Yaml(_))));
    }
}
