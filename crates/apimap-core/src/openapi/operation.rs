use std::collections::HashSet;

use heck::ToLowerCamelCase;

use super::OpenApiService;
use super::resource::{OpenApiResource, PathEntry, ResourceEntry};
use super::schema::{OpenApiParameter, OpenApiSchema};
use crate::access::Value;
use crate::model::{HttpMethod, Listing, Operation, Orientation, Resource, Schema, find_listing};

/// Response codes checked for the success payload, in order.
const SUCCESS_CODES: [&str; 3] = ["200", "201", "2XX"];

/// Suffix marking the account-scoped variant of an operation on a mixed
/// resource.
const RELATIVE_SUFFIX: &str = "~";

pub(crate) struct OperationEntry {
    path: usize,
    method: HttpMethod,
    name: String,
    abs_name: String,
}

/// The JSON schema of the first success response an operation declares.
pub(crate) fn success_response(operation: &Value) -> Option<Value> {
    SUCCESS_CODES.into_iter().find_map(|code| {
        let schema = operation.get(["responses", code, "content", "application/json", "schema"]);
        (!schema.is_absent()).then_some(schema)
    })
}

impl OpenApiService {
    pub(crate) fn operation_entries(&self, index: usize) -> &[OperationEntry] {
        self.entries()[index]
            .operations
            .get_or_init(|| self.name_operations(index))
    }

    fn name_operations(&self, index: usize) -> Vec<OperationEntry> {
        let entry = &self.entries()[index];
        let mixed = entry.orientation() == Orientation::Mixed;

        let mut seen = HashSet::new();
        let mut operations = Vec::new();
        for (path_index, path) in entry.paths.iter().enumerate() {
            for key in path.node.keys().unwrap_or_default() {
                let Ok(method) = key.parse::<HttpMethod>() else {
                    continue;
                };
                let mut abs_name = self.operation_name(entry, path, method);
                let suffix = if mixed && path.orientation == Orientation::Relative {
                    RELATIVE_SUFFIX
                } else {
                    ""
                };
                if seen.contains(&format!("{abs_name}{suffix}")) {
                    // `/user/repos` and `/users/{u}/repos` both list userRepo.
                    if let Some(param) = path.last_param_name() {
                        abs_name = format!("{abs_name}_with_{param}").to_lower_camel_case();
                    }
                }
                let name = format!("{abs_name}{suffix}");
                if !seen.insert(name.clone()) {
                    log::warn!(
                        "multiple operations named '{name}' on {}, dropping {} {}",
                        entry.name,
                        method,
                        path.name
                    );
                    continue;
                }
                operations.push(OperationEntry {
                    path: path_index,
                    method,
                    name,
                    abs_name,
                });
            }
        }
        operations
    }

    fn operation_name(&self, entry: &ResourceEntry, path: &PathEntry, method: HttpMethod) -> String {
        let forced = self
            .meta
            .force_method_op_name
            .get(&path.name)
            .and_then(|methods| methods.get(method.key()));
        if let Some(name) = forced {
            return name.clone();
        }

        let item = path.is_item(&entry.paths, &self.meta);
        let name = match (item, method) {
            (false, HttpMethod::Get) => "list",
            (false, HttpMethod::Put) => "replace",
            (false, HttpMethod::Patch) => "patch",
            (false, HttpMethod::Delete) => "purge",
            (false, HttpMethod::Post) => "create",
            (false, HttpMethod::Head) => "scan",
            // `/things/{a}/{b}` sits next to `/things/{a}`, whose get is "get".
            (true, HttpMethod::Get) if path.has_double_param_base() => {
                return format!("get_with_{}", path.base_param_name()).to_lower_camel_case();
            }
            (true, HttpMethod::Get) => "get",
            (true, HttpMethod::Put) => "set",
            (true, HttpMethod::Patch) => "update",
            (true, HttpMethod::Delete) => "delete",
            (true, HttpMethod::Post) => "apply",
            (true, HttpMethod::Head) => "check",
            (_, HttpMethod::Options | HttpMethod::Trace) => method.key(),
        };
        name.to_string()
    }
}

pub(crate) struct OpenApiOperation<'s> {
    service: &'s OpenApiService,
    resource: usize,
    entry: &'s OperationEntry,
}

impl<'s> OpenApiOperation<'s> {
    pub(crate) fn new(service: &'s OpenApiService, resource: usize, entry: &'s OperationEntry) -> Self {
        Self {
            service,
            resource,
            entry,
        }
    }

    fn path(&self) -> &'s PathEntry {
        &self.service.entries()[self.resource].paths[self.entry.path]
    }

    fn node(&self) -> Value {
        self.path().node.key(self.entry.method.key())
    }

    /// First key of each security requirement, with its scope list.
    fn requirements(&self) -> Vec<(String, Value)> {
        self.node()
            .key("security")
            .items()
            .into_iter()
            .filter_map(|requirement| requirement.entries().into_iter().next())
            .collect()
    }
}

impl Operation for OpenApiOperation<'_> {
    fn resource(&self) -> Box<dyn Resource + '_> {
        Box::new(OpenApiResource::new(self.service, self.resource))
    }

    fn name(&self) -> &str {
        &self.entry.name
    }

    fn abs_name(&self) -> &str {
        &self.entry.abs_name
    }

    fn id(&self) -> String {
        self.node().key("operationId").extract_or_default()
    }

    fn description(&self) -> String {
        let node = self.node();
        let summary: String = node.key("summary").extract_or_default();
        let text = if summary.trim().is_empty() {
            node.key("description").extract_or_default()
        } else {
            summary
        };
        text.trim().to_string()
    }

    fn url(&self) -> String {
        self.service.expand_to_url(&self.path().name)
    }

    fn method(&self) -> HttpMethod {
        self.entry.method
    }

    fn orientation(&self) -> Orientation {
        self.path().orientation
    }

    fn tags(&self) -> Vec<String> {
        self.node().key("tags").extract_or_default()
    }

    fn docs_url(&self) -> String {
        self.node().get(["externalDocs", "url"]).extract_or_default()
    }

    fn security(&self) -> Vec<String> {
        self.requirements()
            .iter()
            .filter_map(|(id, _)| self.service.security_scheme(id))
            .collect()
    }

    fn scopes(&self) -> Vec<String> {
        self.requirements()
            .into_iter()
            .flat_map(|(_, scopes)| scopes.extract_or_default::<Vec<String>>())
            .collect()
    }

    /// Operation parameters, then those shared by the whole path.
    fn parameters(&self) -> Vec<Box<dyn Schema + '_>> {
        let own = self.node().key("parameters").items();
        let shared = self.path().node.key("parameters").items();
        own.into_iter()
            .chain(shared)
            .map(OpenApiParameter::new)
            .filter(|param| !param.read_only())
            .map(|param| Box::new(param) as Box<dyn Schema + '_>)
            .collect()
    }

    fn input(&self) -> Option<Box<dyn Schema + '_>> {
        let body = self
            .node()
            .get(["requestBody", "content", "application/json", "schema"]);
        if body.is_absent() {
            return None;
        }
        Some(Box::new(OpenApiSchema::new("(input)", body).write_only()))
    }

    fn output(&self) -> Option<Box<dyn Schema + '_>> {
        let response = success_response(&self.node())?;
        let resource = &self.service.entries()[self.resource].name;
        let payload = match find_listing(&response, resource, false) {
            Some(listing) => listing.payload(),
            None => response,
        };
        Some(Box::new(OpenApiSchema::new("(output)", payload)))
    }

    fn response(&self) -> Option<Box<dyn Schema + '_>> {
        let response = success_response(&self.node())?;
        let resource = &self.service.entries()[self.resource].name;
        find_listing(&response, resource, false).filter(Listing::unwraps)?;
        Some(Box::new(OpenApiSchema::new("(response)", response)))
    }
}
