use crate::access::Value;
use crate::model::Schema;

/// A schema or parameter node from a discovery document.
///
/// Both share one shape: `type`, `format`, `enum`, `items` and
/// `properties` sit directly on the node, and a parameter's `location`
/// does too.
#[derive(Debug, Clone)]
pub struct DiscoverySchema {
    name: String,
    node: Value,
    /// Id of the method this schema belongs to, matched against
    /// `annotations.required`.
    operation_id: String,
    write_only: bool,
}

impl DiscoverySchema {
    pub fn new(name: impl Into<String>, node: Value, operation_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node,
            operation_id: operation_id.into(),
            write_only: false,
        }
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    fn child(&self, name: impl Into<String>, node: Value) -> Self {
        Self {
            name: name.into(),
            node,
            operation_id: self.operation_id.clone(),
            write_only: self.write_only,
        }
    }

    fn boxed(schemas: Vec<DiscoverySchema>) -> Vec<Box<dyn Schema>> {
        schemas
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Schema>)
            .collect()
    }

    fn variants(&self, keyword: &str) -> Vec<DiscoverySchema> {
        self.node
            .key(keyword)
            .items()
            .into_iter()
            .enumerate()
            .map(|(idx, node)| self.child(format!("{}/{idx}", self.name), node))
            .collect()
    }
}

impl Schema for DiscoverySchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn node(&self) -> &Value {
        &self.node
    }

    fn location(&self) -> String {
        self.node.key("location").extract_or_default()
    }

    /// A local `required` flag wins; otherwise the schema is required when
    /// its annotations name the owning method.
    fn required(&self) -> bool {
        if let Ok(required) = self.node.key("required").extract::<bool>() {
            return required;
        }
        self.node
            .get(["annotations", "required"])
            .extract_or_default::<Vec<String>>()
            .contains(&self.operation_id)
    }

    fn items(&self) -> Option<Box<dyn Schema + '_>> {
        let items = self.node.key("items");
        if items.is_absent() {
            return None;
        }
        Some(Box::new(self.child("(item)", items)))
    }

    fn properties(&self) -> Vec<Box<dyn Schema + '_>> {
        let properties = self
            .node
            .key("properties")
            .entries()
            .into_iter()
            .map(|(name, node)| self.child(name, node))
            .filter(|prop| !(self.write_only && prop.read_only()))
            .collect();
        Self::boxed(properties)
    }

    fn any_of(&self) -> Vec<Box<dyn Schema + '_>> {
        Self::boxed(self.variants("anyOf"))
    }

    fn one_of(&self) -> Vec<Box<dyn Schema + '_>> {
        Self::boxed(self.variants("oneOf"))
    }
}
