use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use super::coerce::FromNode;
use super::node::{ALL_OF_KEY, Map, Node};
use super::resolver::Resolver;
use crate::error::{AccessError, ResolveError};

/// Upper bound on reference hops followed while resolving a single node.
pub const MAX_RESOLVE_DEPTH: usize = 32;

/// One step of a navigation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for Step<'a> {
    fn from(key: &'a str) -> Self {
        Step::Key(key)
    }
}

impl<'a> From<&'a String> for Step<'a> {
    fn from(key: &'a String) -> Self {
        Step::Key(key)
    }
}

impl From<usize> for Step<'_> {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

/// A navigable handle on a document node.
///
/// Every value derived by navigation carries the same resolver and
/// `allOf` setting as the value it came from. Reference objects are
/// resolved transparently before each step, so callers never see `$ref`
/// unless resolution fails.
#[derive(Clone, Default)]
pub struct Value {
    node: Node,
    resolver: Option<Rc<dyn Resolver>>,
    merge_all_of: bool,
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("node", &self.node)
            .field("resolver", &self.resolver.is_some())
            .field("merge_all_of", &self.merge_all_of)
            .finish()
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::new(node)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::new(json)
    }
}

impl Value {
    pub fn new(node: impl Into<Node>) -> Self {
        Self {
            node: node.into(),
            resolver: None,
            merge_all_of: false,
        }
    }

    pub fn with_resolver(self, resolver: impl Resolver + 'static) -> Self {
        self.with_shared_resolver(Rc::new(resolver))
    }

    pub fn with_shared_resolver(mut self, resolver: Rc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Merge `allOf` members into their parent during resolution.
    pub fn with_all_of_merge(mut self) -> Self {
        self.merge_all_of = true;
        self
    }

    /// The raw, unresolved node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Wrap `node` with this value's resolver and settings.
    pub fn derive(&self, node: Node) -> Value {
        Value {
            node,
            resolver: self.resolver.clone(),
            merge_all_of: self.merge_all_of,
        }
    }

    /// Follow references (and merge `allOf` when enabled) until a concrete
    /// node is reached.
    pub fn resolve(&self) -> Result<Value, ResolveError> {
        let node = self.resolve_node(&self.node, &mut Vec::new())?;
        Ok(self.derive(node))
    }

    /// Like [`Value::resolve`], falling back to the raw node on failure.
    pub fn resolved(&self) -> Value {
        self.derive(self.resolved_node(&self.node))
    }

    /// Navigate a path of keys and indices.
    ///
    /// Missing keys, out-of-range indices and steps into scalars all yield
    /// an absent value rather than an error.
    pub fn get<'a, I, S>(&self, path: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<Step<'a>>,
    {
        let mut current = self.resolved_node(&self.node);
        for step in path {
            let next = match (step.into(), &current) {
                (Step::Key(key), Node::Object(map)) => map.get(key).cloned(),
                (Step::Index(index), Node::Array(items)) => items.get(index).cloned(),
                _ => None,
            };
            current = match next {
                Some(node) => self.resolved_node(&node),
                None => return self.derive(Node::Null),
            };
        }
        self.derive(current)
    }

    pub fn key(&self, key: &str) -> Value {
        self.get([key])
    }

    pub fn at(&self, index: usize) -> Value {
        self.get([index])
    }

    /// Sorted keys of the resolved node, or `None` when it is not a map.
    pub fn keys(&self) -> Option<Vec<String>> {
        match self.resolved_node(&self.node) {
            Node::Object(map) => Some(map.keys().cloned().collect()),
            _ => None,
        }
    }

    /// Key/value pairs of the resolved node in key order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        match self.resolved_node(&self.node) {
            Node::Object(map) => map
                .iter()
                .map(|(key, node)| (key.clone(), self.derive(self.resolved_node(node))))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Elements of the resolved node, or an empty list when it is not an array.
    pub fn items(&self) -> Vec<Value> {
        match self.resolved_node(&self.node) {
            Node::Array(items) => items
                .iter()
                .map(|node| self.derive(self.resolved_node(node)))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(
            self.resolve_node(&self.node, &mut Vec::new()),
            Ok(Node::Null) | Err(_)
        )
    }

    pub fn is_object(&self) -> bool {
        matches!(self.resolved_node(&self.node), Node::Object(_))
    }

    /// Strict extraction: absent, unresolvable and mistyped values are errors.
    pub fn extract<T: FromNode>(&self) -> Result<T, AccessError> {
        let node = self.resolve_node(&self.node, &mut Vec::new())?;
        if node.is_null() {
            return Err(AccessError::Absent);
        }
        T::from_node(&node).ok_or(AccessError::Coerce {
            found: node.kind(),
            expected: T::EXPECTED,
        })
    }

    /// Lenient extraction: any failure yields `T::default()`.
    pub fn extract_or_default<T: FromNode + Default>(&self) -> T {
        self.extract().unwrap_or_default()
    }

    /// Shorthand for a lenient string read that keeps absence visible.
    pub fn string(&self) -> Option<String> {
        self.extract().ok()
    }

    fn resolved_node(&self, node: &Node) -> Node {
        match self.resolve_node(node, &mut Vec::new()) {
            Ok(resolved) => resolved,
            Err(err) => {
                log::debug!("keeping unresolved node: {err}");
                node.clone()
            }
        }
    }

    fn resolve_node(&self, node: &Node, seen: &mut Vec<String>) -> Result<Node, ResolveError> {
        let mut current = node.clone();
        while let Some(reference) = current.reference().map(str::to_string) {
            if seen.contains(&reference) || seen.len() >= MAX_RESOLVE_DEPTH {
                return Err(ResolveError::CircularRef(reference));
            }
            let resolver = self
                .resolver
                .as_ref()
                .ok_or_else(|| ResolveError::MissingResolver(reference.clone()))?;
            let target = resolver.resolve(&reference, self)?;
            current = overlay_siblings(&current, target);
            seen.push(reference);
        }
        if self.merge_all_of {
            current = self.merge_all_of(current, seen);
        }
        Ok(current)
    }

    /// Members merge left to right, then the node's own keys win.
    fn merge_all_of(&self, node: Node, seen: &[String]) -> Node {
        let parts = match node.get_key(ALL_OF_KEY).and_then(Node::as_array) {
            Some(parts) => parts.to_vec(),
            None => return node,
        };

        let mut merged = Map::new();
        for part in &parts {
            match self.resolve_node(part, &mut seen.to_vec()) {
                Ok(resolved) => deep_merge(&mut merged, &resolved),
                Err(err) => log::debug!("skipping allOf member: {err}"),
            }
        }
        if let Some(own) = node.as_object() {
            for (key, value) in own.iter().filter(|(key, _)| *key != ALL_OF_KEY) {
                merge_entry(&mut merged, key, value);
            }
        }
        Node::object(merged)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.resolved_node(&self.node).serialize(serializer)
    }
}

/// Keys written next to `$ref` override the same keys of the target.
fn overlay_siblings(reference: &Node, target: Node) -> Node {
    let siblings: Vec<_> = match reference.as_object() {
        Some(map) => map
            .iter()
            .filter(|(key, _)| key.as_str() != super::node::REF_KEY)
            .collect(),
        None => return target,
    };
    if siblings.is_empty() {
        return target;
    }
    let mut combined = match target.as_object() {
        Some(map) => map.clone(),
        None => return target,
    };
    for (key, value) in siblings {
        combined.insert(key.clone(), value.clone());
    }
    Node::object(combined)
}

fn deep_merge(into: &mut Map, from: &Node) {
    if let Some(map) = from.as_object() {
        for (key, value) in map.iter() {
            merge_entry(into, key, value);
        }
    }
}

fn merge_entry(into: &mut Map, key: &str, value: &Node) {
    match (into.get(key).and_then(Node::as_object), value.as_object()) {
        (Some(existing), Some(_)) => {
            let mut nested = existing.clone();
            deep_merge(&mut nested, value);
            into.insert(key.to_string(), Node::object(nested));
        }
        _ => {
            into.insert(key.to_string(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::PointerResolver;
    use serde_json::json;

    fn with_pointer(doc: serde_json::Value) -> Value {
        let root = Node::from(doc);
        Value::new(root.clone()).with_resolver(PointerResolver::new(root))
    }

    #[test]
    fn test_get_follows_references() {
        let value = with_pointer(json!({
            "definitions": {"user": {"name": "John", "age": 30}},
            "data": {"$ref": "#/definitions/user"}
        }));
        let name: String = value.get(["data", "name"]).extract().unwrap();
        assert_eq!(name, "John");
        let age: i64 = value.get(["data", "age"]).extract().unwrap();
        assert_eq!(age, 30);
    }

    #[test]
    fn test_get_missing_paths_are_absent() {
        let value = Value::new(json!({"a": {"b": 1}, "list": [1, 2]}));
        assert!(value.get(["a", "x"]).is_absent());
        assert!(value.get(["a", "b", "c"]).is_absent());
        assert!(value.key("list").at(5).is_absent());
        assert!(!value.key("list").at(1).is_absent());
    }

    #[test]
    fn test_circular_references_are_bounded() {
        let value = with_pointer(json!({
            "defs": {"a": {"$ref": "#/defs/b"}, "b": {"$ref": "#/defs/a"}},
            "start": {"$ref": "#/defs/a"}
        }));
        let err = value.key("start").extract::<Node>();
        assert!(matches!(
            err,
            Err(AccessError::Resolve(ResolveError::CircularRef(_)))
        ));
        assert!(value.key("start").is_absent());
    }

    #[test]
    fn test_reference_without_resolver() {
        let value = Value::new(json!({"$ref": "#/x"}));
        assert_eq!(
            value.resolve().unwrap_err(),
            ResolveError::MissingResolver("#/x".into())
        );
    }

    #[test]
    fn test_dangling_reference_is_absent_but_keeps_its_keys() {
        let value = with_pointer(json!({"x": {"$ref": "#/nowhere"}}));
        let dangling = value.key("x");
        assert!(dangling.is_absent());
        assert!(dangling.extract::<Node>().is_err());
        assert_eq!(dangling.keys(), Some(vec!["$ref".to_string()]));
        assert_eq!(dangling.key("$ref").string().as_deref(), Some("#/nowhere"));
    }

    #[test]
    fn test_sibling_keys_override_target() {
        let value = with_pointer(json!({
            "defs": {"user": {"type": "object", "description": "base"}},
            "field": {"$ref": "#/defs/user", "description": "override"}
        }));
        let field = value.key("field");
        assert_eq!(field.key("description").string().as_deref(), Some("override"));
        assert_eq!(field.key("type").string().as_deref(), Some("object"));
    }

    #[test]
    fn test_all_of_precedence() {
        let value = Value::new(json!({
            "allOf": [{"a": 1, "b": 1}, {"b": 2, "c": 2}],
            "c": 3
        }))
        .with_all_of_merge();
        let merged = value.resolve().unwrap();
        assert_eq!(
            serde_json::to_value(&merged).unwrap(),
            json!({"a": 1, "b": 2, "c": 3})
        );
    }

    #[test]
    fn test_all_of_left_alone_without_flag() {
        let value = Value::new(json!({"allOf": [{"a": 1}]}));
        assert!(value.key("a").is_absent());
        assert_eq!(value.keys().unwrap(), vec!["allOf".to_string()]);
    }

    #[test]
    fn test_all_of_with_references_merges_deeply() {
        let value = with_pointer(json!({
            "defs": {
                "base": {"type": "object", "properties": {"id": {"type": "string"}}},
                "named": {"properties": {"name": {"type": "string"}}, "required": ["name"]}
            },
            "user": {
                "allOf": [{"$ref": "#/defs/base"}, {"$ref": "#/defs/named"}, {"$ref": "#/defs/missing"}],
                "description": "A user"
            }
        }))
        .with_all_of_merge();
        let user = value.key("user");
        assert_eq!(
            user.key("properties").keys().unwrap(),
            vec!["id".to_string(), "name".to_string()]
        );
        assert_eq!(user.key("type").string().as_deref(), Some("object"));
        assert_eq!(
            user.key("required").extract::<Vec<String>>().unwrap(),
            vec!["name".to_string()]
        );
        assert_eq!(user.key("description").string().as_deref(), Some("A user"));
    }

    #[test]
    fn test_self_referencing_all_of_terminates() {
        let value = with_pointer(json!({
            "defs": {"node": {"allOf": [{"$ref": "#/defs/node"}, {"$ref": "#/defs/node"}], "x": 1}},
            "start": {"$ref": "#/defs/node"}
        }))
        .with_all_of_merge();
        assert_eq!(value.get(["start", "x"]).extract::<i64>().unwrap(), 1);
    }

    #[test]
    fn test_keys_are_sorted() {
        let value = Value::new(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        assert_eq!(value.keys().unwrap(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(Value::new(json!([1])).keys(), None);
    }

    #[test]
    fn test_items_resolve_elements() {
        let value = with_pointer(json!({
            "defs": {"one": {"n": 1}},
            "list": [{"$ref": "#/defs/one"}, {"n": 2}]
        }));
        let numbers: Vec<i64> = value
            .key("list")
            .items()
            .iter()
            .map(|item| item.key("n").extract_or_default())
            .collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(value.key("defs").items().is_empty());
    }

    #[test]
    fn test_strict_and_lenient_extraction() {
        let value = Value::new(json!({"name": {"first": "a"}, "count": "7"}));
        assert_eq!(value.key("missing").extract::<String>(), Err(AccessError::Absent));
        assert_eq!(
            value.key("name").extract::<String>(),
            Err(AccessError::Coerce {
                found: "object",
                expected: "string"
            })
        );
        assert_eq!(value.key("name").extract_or_default::<String>(), "");
        assert_eq!(value.key("count").extract::<i64>(), Ok(7));
    }

    #[test]
    fn test_custom_resolver() {
        struct Upper;
        impl Resolver for Upper {
            fn resolve(&self, reference: &str, _from: &Value) -> Result<Node, ResolveError> {
                Ok(Node::String(reference.to_uppercase()))
            }
        }
        let value = Value::new(json!({"x": {"$ref": "shout"}})).with_resolver(Upper);
        assert_eq!(value.key("x").string().as_deref(), Some("SHOUT"));
    }
}
