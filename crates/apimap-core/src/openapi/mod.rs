//! Adapter for path/operation documents (OpenAPI 3).
//!
//! Resources are not declared by the format. Every path is mapped through
//! [`to_resource_name`](crate::naming::to_resource_name) and paths sharing a
//! name form one resource; hierarchy, item/collection classification and
//! operation names are inferred from the path strings, with `meta.yaml`
//! overrides taking precedence.

mod operation;
mod resource;
mod schema;

use std::cell::OnceCell;

use regex::Regex;

use crate::access::{Node, PointerResolver, Value};
use crate::config::{Lexicon, ServiceMeta};
use crate::error::LoadError;
use crate::model::{Orientation, Resource, Service, join_url};

pub use schema::{OpenApiParameter, OpenApiSchema};

use resource::{OpenApiResource, ResourceEntry};

pub struct OpenApiService {
    name: String,
    document: Value,
    meta: ServiceMeta,
    lexicon: Lexicon,
    relative_patterns: Vec<Regex>,
    resources: OnceCell<Vec<ResourceEntry>>,
}

impl OpenApiService {
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

    /// Build a service over a parsed root, resolving `#/...` pointers
    /// against it and merging `allOf`.
    pub fn from_node(
        name: impl Into<String>,
        root: Node,
        meta: ServiceMeta,
    ) -> Result<Self, LoadError> {
        let document = Value::new(root.clone())
            .with_resolver(PointerResolver::new(root))
            .with_all_of_merge();
        Self::new(name, document, meta)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn entries(&self) -> &[ResourceEntry] {
        self.resources.get_or_init(|| resource::build(self))
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.entries().iter().position(|entry| entry.name == name)
    }

    /// Relative when any configured pattern matches; otherwise the service
    /// default, with `mixed` counting as absolute.
    fn path_orientation(&self, path: &str) -> Orientation {
        if self.relative_patterns.iter().any(|re| re.is_match(path)) {
            return Orientation::Relative;
        }
        match self.meta.orientation {
            Orientation::Mixed => Orientation::Absolute,
            other => other,
        }
    }

    /// Map a declared scheme to its kind; `http` schemes report their
    /// `scheme` (`bearer`, `basic`).
    fn security_scheme(&self, id: &str) -> Option<String> {
        let scheme = self.document.get(["components", "securitySchemes", id]);
        let kind = scheme.key("type").string()?;
        let name = if kind == "http" {
            scheme.key("scheme").extract_or_default()
        } else {
            kind
        };
        (!name.is_empty()).then_some(name)
    }

    fn expand_to_url(&self, path: &str) -> String {
        join_url(&self.base_url(), path)
    }
}

impl Service for OpenApiService {
    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> String {
        self.document.get(["info", "title"]).extract_or_default()
    }

    fn provider(&self) -> String {
        if let Some(provider) = self.document.get(["info", "x-providerName"]).string() {
            return provider;
        }
        url::Url::parse(&self.base_url())
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    fn version(&self) -> String {
        self.document.get(["info", "version"]).extract_or_default()
    }

    fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .document
            .get(["info", "x-apisguru-categories"])
            .extract_or_default();
        categories.extend(self.meta.categories.iter().cloned());
        categories
    }

    fn base_url(&self) -> String {
        let base: String = self.document.get(["servers"]).at(0).key("url").extract_or_default();
        match &self.meta.extend_base_to {
            Some(extension) => join_url(&base, extension),
            None => base,
        }
    }

    fn docs_url(&self) -> String {
        self.document.get(["externalDocs", "url"]).extract_or_default()
    }

    fn orientation(&self) -> Orientation {
        self.meta.orientation
    }

    fn security(&self) -> Vec<String> {
        self.document
            .get(["components", "securitySchemes"])
            .keys()
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.security_scheme(id))
            .collect()
    }

    fn resources(&self) -> Vec<Box<dyn Resource + '_>> {
        (0..self.entries().len())
            .map(|index| Box::new(OpenApiResource::new(self, index)) as Box<dyn Resource + '_>)
            .collect()
    }

    fn document(&self) -> &Value {
        &self.document
    }

    fn meta(&self) -> &ServiceMeta {
        &self.meta
    }
}
