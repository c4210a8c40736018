use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::OpenApiService;
use super::operation::{OpenApiOperation, OperationEntry, success_response};
use crate::access::Value;
use crate::config::ServiceMeta;
use crate::model::{Operation, Orientation, Resource, Service};
use crate::naming::{capitalize, is_plural, to_resource_name};

static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("Invalid regex"));

pub(crate) struct ResourceEntry {
    pub(crate) name: String,
    pub(crate) paths: Vec<PathEntry>,
    parent: OnceCell<Option<usize>>,
    pub(crate) operations: OnceCell<Vec<OperationEntry>>,
}

impl ResourceEntry {
    fn new(name: String) -> Self {
        Self {
            name,
            paths: Vec::new(),
            parent: OnceCell::new(),
            operations: OnceCell::new(),
        }
    }

    pub(crate) fn orientation(&self) -> Orientation {
        let relative = self
            .paths
            .iter()
            .filter(|p| p.orientation == Orientation::Relative)
            .count();
        match relative {
            0 => Orientation::Absolute,
            n if n == self.paths.len() => Orientation::Relative,
            _ => Orientation::Mixed,
        }
    }

    fn item_paths<'a>(&'a self, meta: &'a ServiceMeta) -> impl Iterator<Item = &'a PathEntry> {
        self.paths.iter().filter(move |p| p.is_item(&self.paths, meta))
    }

    fn collection_paths<'a>(
        &'a self,
        meta: &'a ServiceMeta,
    ) -> impl Iterator<Item = &'a PathEntry> {
        self.paths.iter().filter(move |p| !p.is_item(&self.paths, meta))
    }

    /// Whether `target` (a de-named path) addresses this resource, or the
    /// collection it would have above its item path.
    fn claims_ancestor(&self, target: &str, meta: &ServiceMeta) -> bool {
        if self.item_paths(meta).any(|p| dename(&p.name) == target) {
            return true;
        }
        if self.collection_paths(meta).any(|p| dename(&p.name) == target) {
            return true;
        }
        self.collection_paths(meta).next().is_none()
            && self.item_paths(meta).any(|p| dename(dir(&p.name)) == target)
    }
}

/// One declared path, with any `extendBaseTo` prefix removed.
pub(crate) struct PathEntry {
    pub(crate) name: String,
    parts: Vec<String>,
    pub(crate) node: Value,
    pub(crate) orientation: Orientation,
    item: OnceCell<bool>,
}

impl PathEntry {
    fn last_segment(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }

    fn parent_pathname(&self) -> String {
        self.parts[..self.parts.len().saturating_sub(1)].join("/")
    }

    fn has_param_base(&self) -> bool {
        self.last_segment().starts_with('{')
    }

    pub(crate) fn has_double_param_base(&self) -> bool {
        self.has_param_base()
            && self.parts.len() >= 2
            && self.parts[self.parts.len() - 2].starts_with('{')
    }

    pub(crate) fn base_param_name(&self) -> &str {
        self.last_segment().trim_matches(|c| c == '{' || c == '}')
    }

    /// Name of the right-most `{param}` segment.
    pub(crate) fn last_param_name(&self) -> Option<&str> {
        self.parts
            .iter()
            .rev()
            .find(|part| part.starts_with('{'))
            .map(|part| part.trim_matches(|c| c == '{' || c == '}'))
    }

    /// Whether this path addresses a single item. Computed once.
    pub(crate) fn is_item(&self, siblings: &[PathEntry], meta: &ServiceMeta) -> bool {
        *self.item.get_or_init(|| self.classify(siblings, meta))
    }

    fn classify(&self, siblings: &[PathEntry], meta: &ServiceMeta) -> bool {
        if let Some(&forced) = meta.force_item_paths.get(&self.name) {
            return forced;
        }
        if self.has_param_base() {
            return true;
        }
        let dir_of_sibling = siblings
            .iter()
            .any(|p| !std::ptr::eq(p, self) && p.parent_pathname() == self.name);
        if dir_of_sibling {
            return false;
        }
        !is_plural(self.last_segment())
    }
}

/// Group the document's paths into resources by derived name.
pub(crate) fn build(service: &OpenApiService) -> Vec<ResourceEntry> {
    let prefix = service.meta.extend_base_to.as_deref().unwrap_or_default();
    let mut entries: Vec<ResourceEntry> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (key, node) in service.document.key("paths").entries() {
        let fixed = key.strip_prefix(prefix).unwrap_or(&key).to_string();
        let name = to_resource_name(&fixed, &service.lexicon);
        if name.is_empty() {
            log::debug!("path '{key}' yields no resource name, skipping");
            continue;
        }
        let index = *by_name.entry(name.clone()).or_insert_with(|| {
            entries.push(ResourceEntry::new(name));
            entries.len() - 1
        });
        entries[index].paths.push(PathEntry {
            orientation: service.path_orientation(&fixed),
            parts: fixed.split('/').map(str::to_string).collect(),
            name: fixed,
            node,
            item: OnceCell::new(),
        });
    }

    log::debug!("{}: {} resources", service.name, entries.len());
    entries
}

impl OpenApiService {
    pub(crate) fn parent_of(&self, index: usize) -> Option<usize> {
        *self.entries()[index]
            .parent
            .get_or_init(|| self.infer_parent(index))
    }

    fn infer_parent(&self, index: usize) -> Option<usize> {
        let entry = &self.entries()[index];

        if let Some(forced) = self.meta.force_parent.get(&entry.name) {
            match forced.as_deref() {
                None | Some("") => return None,
                Some(parent) => match self.index_of(parent) {
                    Some(found) => return Some(found),
                    None => log::warn!(
                        "unable to reparent '{}': resource '{parent}' not found",
                        entry.name
                    ),
                },
            }
        }

        let wanted = match entry.orientation() {
            Orientation::Relative => Orientation::Relative,
            _ => Orientation::Absolute,
        };
        let start = entry
            .paths
            .iter()
            .filter(|p| p.orientation == wanted)
            .min_by_key(|p| p.parts.len())
            .or_else(|| entry.paths.iter().min_by_key(|p| p.parts.len()))?;

        let mut candidate = start.parent_pathname();
        while !matches!(candidate.as_str(), "" | "/" | ".") {
            let target = dename(&candidate);
            let found = self
                .entries()
                .iter()
                .enumerate()
                .find(|(other, res)| *other != index && res.claims_ancestor(&target, &self.meta));
            if let Some((other, _)) = found {
                return Some(other);
            }
            candidate = dir(&candidate).to_string();
        }
        None
    }
}

/// Replace every `{name}` with `{}` so templates compare by shape.
fn dename(path: &str) -> String {
    PATH_PARAM.replace_all(path, "{}").into_owned()
}

fn dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => ".",
    }
}

pub(crate) struct OpenApiResource<'s> {
    service: &'s OpenApiService,
    index: usize,
}

impl<'s> OpenApiResource<'s> {
    pub(crate) fn new(service: &'s OpenApiService, index: usize) -> Self {
        Self { service, index }
    }

    fn entry(&self) -> &'s ResourceEntry {
        &self.service.entries()[self.index]
    }

    fn urls(&self, item: bool) -> Vec<String> {
        let entry = self.entry();
        entry
            .paths
            .iter()
            .filter(|p| p.is_item(&entry.paths, &self.service.meta) == item)
            .map(|p| self.service.expand_to_url(&p.name))
            .collect()
    }
}

impl Resource for OpenApiResource<'_> {
    fn service(&self) -> &dyn Service {
        self.service
    }

    fn parent(&self) -> Option<Box<dyn Resource + '_>> {
        let parent = self.service.parent_of(self.index)?;
        Some(Box::new(OpenApiResource::new(self.service, parent)))
    }

    fn name(&self) -> &str {
        &self.entry().name
    }

    fn title(&self) -> String {
        capitalize(self.entry().name.trim_matches('~'))
    }

    /// Description of the success response of `get` on the last path.
    fn description(&self) -> String {
        self.entry()
            .paths
            .last()
            .and_then(|p| success_response(&p.node.key("get")))
            .map(|schema| {
                schema
                    .key("description")
                    .extract_or_default::<String>()
                    .trim()
                    .to_string()
            })
            .unwrap_or_default()
    }

    fn orientation(&self) -> Orientation {
        self.entry().orientation()
    }

    fn collection_urls(&self) -> Vec<String> {
        self.urls(false)
    }

    fn item_urls(&self) -> Vec<String> {
        self.urls(true)
    }

    fn operations(&self) -> Vec<Box<dyn Operation + '_>> {
        self.service
            .operation_entries(self.index)
            .iter()
            .map(|op| {
                Box::new(OpenApiOperation::new(self.service, self.index, op)) as Box<dyn Operation + '_>
            })
            .collect()
    }
}
