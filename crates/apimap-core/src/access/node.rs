use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Serialize, Serializer};

/// Key that marks an object as a reference to another node.
pub const REF_KEY: &str = "$ref";

/// Key listing subschemas that merge into their parent.
pub const ALL_OF_KEY: &str = "allOf";

/// Object entries, iterated in byte-wise key order.
pub type Map = BTreeMap<String, Node>;

/// One decoded document node.
///
/// Mirrors `serde_json::Value`, except that arrays and objects sit behind
/// `Rc`: navigation clones a node at every step, and with `serde_json::Value`
/// each clone would copy the whole subtree. Objects are a `BTreeMap` so key
/// order is byte-wise whatever the source format.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Rc<Vec<Node>>),
    Object(Rc<Map>),
}

impl Node {
    pub fn object(map: Map) -> Self {
        Node::Object(Rc::new(map))
    }

    pub fn array(items: Vec<Node>) -> Self {
        Node::Array(Rc::new(items))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_key(&self, key: &str) -> Option<&Node> {
        self.as_object()?.get(key)
    }

    /// The reference string, if this node is a reference object.
    pub fn reference(&self) -> Option<&str> {
        self.get_key(REF_KEY)?.as_str()
    }

    /// Human-readable name of the node's kind, used in coercion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "integer",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Node::Null,
            Json::Bool(b) => Node::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Node::String(s),
            Json::Array(items) => Node::array(items.into_iter().map(Node::from).collect()),
            Json::Object(map) => Node::object(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<serde_yaml_ng::Value> for Node {
    fn from(value: serde_yaml_ng::Value) -> Self {
        use serde_yaml_ng::Value as Yaml;
        match value {
            Yaml::Null => Node::Null,
            Yaml::Bool(b) => Node::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Node::String(s),
            Yaml::Sequence(items) => Node::array(items.into_iter().map(Node::from).collect()),
            Yaml::Mapping(mapping) => Node::object(
                mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key(&k), v.into()))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys (`200:` is an integer); everything is
/// addressed by string here.
fn yaml_key(key: &serde_yaml_ng::Value) -> String {
    use serde_yaml_ng::Value as Yaml;
    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::String(s) => serializer.serialize_str(s),
            Node::Array(items) => serializer.collect_seq(items.iter()),
            Node::Object(map) => serializer.collect_map(map.iter()),
        }
    }
}
