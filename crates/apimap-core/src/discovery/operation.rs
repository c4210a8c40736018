use super::DiscoveryService;
use super::resource::DiscoveryResource;
use super::schema::DiscoverySchema;
use crate::access::Value;
use crate::model::{HttpMethod, Listing, Operation, Orientation, Resource, Schema, Service, find_listing};

/// The only method whose response may wrap a listing.
const LIST_METHOD: &str = "list";

pub(crate) struct DiscoveryOperation<'s> {
    service: &'s DiscoveryService,
    resource: usize,
    name: String,
    node: Value,
}

impl<'s> DiscoveryOperation<'s> {
    pub(crate) fn new(service: &'s DiscoveryService, resource: usize, name: String, node: Value) -> Self {
        Self {
            service,
            resource,
            name,
            node,
        }
    }

    fn id_string(&self) -> String {
        self.node.key("id").extract_or_default()
    }

    fn response_node(&self) -> Option<Value> {
        let response = self.node.key("response");
        (!response.is_absent()).then_some(response)
    }

    fn listing(&self, response: &Value) -> Option<Listing> {
        if self.name != LIST_METHOD {
            return None;
        }
        let key = &self.service.entries()[self.resource].key;
        find_listing(response, key, true)
    }
}

impl Operation for DiscoveryOperation<'_> {
    fn resource(&self) -> Box<dyn Resource + '_> {
        Box::new(DiscoveryResource::new(self.service, self.resource))
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Declared names never carry an orientation suffix.
    fn abs_name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> String {
        self.id_string()
    }

    fn description(&self) -> String {
        self.node
            .key("description")
            .extract_or_default::<String>()
            .trim()
            .to_string()
    }

    fn url(&self) -> String {
        self.service.method_url(&self.node).unwrap_or_default()
    }

    fn method(&self) -> HttpMethod {
        let declared: String = self.node.key("httpMethod").extract_or_default();
        match declared.parse() {
            Ok(method) => method,
            Err(_) => {
                log::warn!(
                    "{}: unknown httpMethod '{declared}' on {}, assuming GET",
                    self.service.name(),
                    self.id_string()
                );
                HttpMethod::Get
            }
        }
    }

    fn orientation(&self) -> Orientation {
        let path: String = self.node.key("path").extract_or_default();
        self.service.path_orientation(&path)
    }

    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn docs_url(&self) -> String {
        String::new()
    }

    fn security(&self) -> Vec<String> {
        self.service.security()
    }

    fn scopes(&self) -> Vec<String> {
        self.node.key("scopes").extract_or_default()
    }

    /// Method parameters, then the service-wide ones.
    fn parameters(&self) -> Vec<Box<dyn Schema + '_>> {
        let id = self.id_string();
        let own = self.node.key("parameters").entries();
        let global = self.service.document.key("parameters").entries();
        own.into_iter()
            .chain(global)
            .map(|(name, node)| DiscoverySchema::new(name, node, id.clone()))
            .filter(|param| !param.read_only())
            .map(|param| Box::new(param) as Box<dyn Schema + '_>)
            .collect()
    }

    fn input(&self) -> Option<Box<dyn Schema + '_>> {
        let request = self.node.key("request");
        if request.is_absent() {
            return None;
        }
        Some(Box::new(
            DiscoverySchema::new("(input)", request, self.id_string()).write_only(),
        ))
    }

    fn output(&self) -> Option<Box<dyn Schema + '_>> {
        let response = self.response_node()?;
        let payload = match self.listing(&response) {
            Some(listing) => listing.payload(),
            None => response,
        };
        Some(Box::new(DiscoverySchema::new("(output)", payload, self.id_string())))
    }

    fn response(&self) -> Option<Box<dyn Schema + '_>> {
        let response = self.response_node()?;
        self.listing(&response).filter(Listing::unwraps)?;
        Some(Box::new(DiscoverySchema::new("(response)", response, self.id_string())))
    }
}
