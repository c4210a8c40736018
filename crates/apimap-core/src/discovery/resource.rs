use super::DiscoveryService;
use super::operation::DiscoveryOperation;
use crate::access::Value;
use crate::model::{Operation, Orientation, Resource, Service};
use crate::naming::capitalize;

pub(crate) struct ResourceEntry {
    /// Key the resource is declared under.
    pub(crate) key: String,
    pub(crate) name: String,
    pub(crate) node: Value,
    pub(crate) parent: Option<usize>,
}

pub(crate) struct DiscoveryResource<'s> {
    service: &'s DiscoveryService,
    index: usize,
}

impl<'s> DiscoveryResource<'s> {
    pub(crate) fn new(service: &'s DiscoveryService, index: usize) -> Self {
        Self { service, index }
    }

    fn entry(&self) -> &'s ResourceEntry {
        &self.service.entries()[self.index]
    }

    fn method(&self, name: &str) -> Value {
        self.entry().node.get(["methods", name])
    }

    fn method_urls(&self, candidates: &[&str]) -> Vec<String> {
        candidates
            .iter()
            .map(|name| self.method(name))
            .find(|method| !method.is_absent())
            .and_then(|method| self.service.method_url(&method))
            .into_iter()
            .collect()
    }
}

impl Resource for DiscoveryResource<'_> {
    fn service(&self) -> &dyn Service {
        self.service
    }

    fn parent(&self) -> Option<Box<dyn Resource + '_>> {
        let parent = self.entry().parent?;
        Some(Box::new(DiscoveryResource::new(self.service, parent)))
    }

    fn name(&self) -> &str {
        &self.entry().name
    }

    fn title(&self) -> String {
        capitalize(&self.entry().key)
    }

    fn description(&self) -> String {
        self.method("get")
            .get(["response", "description"])
            .extract_or_default::<String>()
            .trim()
            .to_string()
    }

    fn orientation(&self) -> Orientation {
        let paths: Vec<Orientation> = self
            .entry()
            .node
            .key("methods")
            .entries()
            .iter()
            .filter_map(|(_, method)| method.key("path").string())
            .map(|path| self.service.path_orientation(&path))
            .collect();
        if paths.is_empty() {
            return self.service.meta.orientation;
        }
        let relative = paths.iter().filter(|o| **o == Orientation::Relative).count();
        match relative {
            0 => Orientation::Absolute,
            n if n == paths.len() => Orientation::Relative,
            _ => Orientation::Mixed,
        }
    }

    fn collection_urls(&self) -> Vec<String> {
        self.method_urls(&["create", "list"])
    }

    fn item_urls(&self) -> Vec<String> {
        self.method_urls(&["get"])
    }

    fn operations(&self) -> Vec<Box<dyn Operation + '_>> {
        self.entry()
            .node
            .key("methods")
            .entries()
            .into_iter()
            .map(|(name, node)| {
                Box::new(DiscoveryOperation::new(self.service, self.index, name, node))
                    as Box<dyn Operation + '_>
            })
            .collect()
    }
}
