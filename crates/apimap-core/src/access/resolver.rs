use super::node::Node;
use super::value::Value;
use crate::error::ResolveError;

/// Maps a reference string to the raw node it points at.
///
/// Resolution happens lazily, one hop per navigation step, which is what keeps
/// circular references safe to navigate.
pub trait Resolver {
    fn resolve(&self, reference: &str, from: &Value) -> Result<Node, ResolveError>;
}

/// Resolves `#/a/b/0` style pointers against a root document.
#[derive(Debug, Clone)]
pub struct PointerResolver {
    root: Node,
}

impl PointerResolver {
    pub fn new(root: impl Into<Node>) -> Self {
        Self { root: root.into() }
    }
}

impl Resolver for PointerResolver {
    fn resolve(&self, reference: &str, _from: &Value) -> Result<Node, ResolveError> {
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| ResolveError::InvalidRefFormat(reference.to_string()))?;
        if pointer.is_empty() {
            return Ok(self.root.clone());
        }
        let pointer = pointer.strip_prefix('/').unwrap_or(pointer);

        let mut current = &self.root;
        for raw in pointer.split('/') {
            let segment = unescape_segment(raw);
            let next = match current {
                Node::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                Node::Object(map) => map.get(&segment),
                _ => None,
            };
            current = match next {
                Some(node) if !node.is_null() => node,
                _ => {
                    return Err(ResolveError::RefTargetNotFound {
                        reference: reference.to_string(),
                        segment,
                    });
                }
            };
        }
        Ok(current.clone())
    }
}

fn unescape_segment(segment: &str) -> String {
    segment
        .replace("~1", "/")
        .replace("~0", "~")
        .replace("%7B", "{")
        .replace("%7D", "}")
}

/// Resolves references by direct key lookup in a flat definitions map.
#[derive(Debug, Clone)]
pub struct DefinitionsResolver {
    definitions: Node,
}

impl DefinitionsResolver {
    pub fn new(definitions: impl Into<Node>) -> Self {
        Self {
            definitions: definitions.into(),
        }
    }
}

impl Resolver for DefinitionsResolver {
    fn resolve(&self, reference: &str, _from: &Value) -> Result<Node, ResolveError> {
        match self.definitions.get_key(reference) {
            Some(node) if !node.is_null() => Ok(node.clone()),
            _ => Err(ResolveError::RefTargetNotFound {
                reference: reference.to_string(),
                segment: reference.to_string(),
            }),
        }
    }
}
