//! Adapter for resource/method-tree documents (Google discovery format).
//!
//! Resources and their nesting are declared, so nothing is guessed about
//! grouping or hierarchy: names come from the ancestor chain, operations
//! from the declared method keys.

mod operation;
mod resource;
mod schema;

use std::cell::OnceCell;

use regex::Regex;

use crate::access::{DefinitionsResolver, Node, Value};
use crate::config::{Lexicon, ServiceMeta};
use crate::error::LoadError;
use crate::model::{Orientation, Resource, Service, join_url};
use crate::naming::to_resource_name;

pub use schema::DiscoverySchema;

use resource::{DiscoveryResource, ResourceEntry};

pub struct DiscoveryService {
    name: String,
    document: Value,
    meta: ServiceMeta,
    lexicon: Lexicon,
    relative_patterns: Vec<Regex>,
    resources: OnceCell<Vec<ResourceEntry>>,
}

impl DiscoveryService {
    /// Build a service over a document that already carries its resolver.
    pub fn new(
        name: impl Into<String>,
        document: Value,
        meta: ServiceMeta,
    ) -> Result<Self, LoadError> {
        Ok(Self {
            name: name.into(),
            relative_patterns: meta.relative_patterns()?,
            lexicon: meta.lexicon(),
            document,
            meta,
            resources: OnceCell::new(),
        })
    }

    /// Build a service over a parsed root; `$ref`s name entries of its
    /// `schemas` map.
    pub fn from_node(
        name: impl Into<String>,
        root: Node,
        meta: ServiceMeta,
    ) -> Result<Self, LoadError> {
        let schemas = root.get_key("schemas").cloned().unwrap_or_default();
        let document = Value::new(root)
            .with_resolver(DefinitionsResolver::new(schemas))
            .with_all_of_merge();
        Self::new(name, document, meta)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn entries(&self) -> &[ResourceEntry] {
        self.resources.get_or_init(|| {
            let mut entries = Vec::new();
            self.collect_resources(&self.document, None, &mut entries);
            log::debug!("{}: {} resources", self.name, entries.len());
            entries
        })
    }

    /// Depth-first, children in key order right after their parent.
    fn collect_resources(&self, node: &Value, parent: Option<usize>, out: &mut Vec<ResourceEntry>) {
        for (key, child) in node.key("resources").entries() {
            let chain = match parent {
                Some(p) => format!("{}_{key}", out[p].name),
                None => key.clone(),
            };
            let name = to_resource_name(&chain, &self.lexicon);
            out.push(ResourceEntry {
                key,
                name,
                node: child.clone(),
                parent,
            });
            let index = out.len() - 1;
            self.collect_resources(&child, Some(index), out);
        }
    }

    fn path_orientation(&self, path: &str) -> Orientation {
        if self.relative_patterns.iter().any(|re| re.is_match(path)) {
            return Orientation::Relative;
        }
        match self.meta.orientation {
            Orientation::Mixed => Orientation::Absolute,
            other => other,
        }
    }

    /// Full URL template of a method: `flatPath` (else `path`) on the base URL.
    fn method_url(&self, method: &Value) -> Option<String> {
        let path = method
            .key("flatPath")
            .string()
            .filter(|p| !p.is_empty())
            .or_else(|| method.key("path").string())
            .filter(|p| !p.is_empty())?;
        Some(join_url(&self.base_url(), &path))
    }
}

impl Service for DiscoveryService {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> String {
        self.document.key("title").extract_or_default()
    }

    fn provider(&self) -> String {
        self.document.key("ownerDomain").extract_or_default()
    }

    fn version(&self) -> String {
        self.document.key("version").extract_or_default()
    }

    fn categories(&self) -> Vec<String> {
        self.meta.categories.clone()
    }

    fn base_url(&self) -> String {
        if let Some(base) = self.document.key("baseUrl").string() {
            return base;
        }
        let root: String = self.document.key("rootUrl").extract_or_default();
        let service_path: String = self.document.key("servicePath").extract_or_default();
        format!("{root}{service_path}")
    }

    fn docs_url(&self) -> String {
        self.document.key("documentationLink").extract_or_default()
    }

    fn orientation(&self) -> Orientation {
        self.meta.orientation
    }

    fn security(&self) -> Vec<String> {
        self.document.key("auth").keys().unwrap_or_default()
    }

    fn resources(&self) -> Vec<Box<dyn Resource + '_>> {
        (0..self.entries().len())
            .map(|index| Box::new(DiscoveryResource::new(self, index)) as Box<dyn Resource + '_>)
            .collect()
    }

    fn document(&self) -> &Value {
        &self.document
    }

    fn meta(&self) -> &ServiceMeta {
        &self.meta
    }
}
