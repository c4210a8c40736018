use crate::access::Value;
use crate::model::Schema;

/// A JSON Schema node from an OpenAPI document.
#[derive(Debug, Clone)]
pub struct OpenApiSchema {
    name: String,
    node: Value,
    /// Request-body context: read-only properties are hidden.
    write_only: bool,
    /// Listed in the parent object's `required` array.
    required_property: bool,
}

impl OpenApiSchema {
    pub fn new(name: impl Into<String>, node: Value) -> Self {
        Self {
            name: name.into(),
            node,
            write_only: false,
            required_property: false,
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
            write_only: self.write_only,
            required_property: false,
        }
    }

    fn item_schema(&self) -> Option<OpenApiSchema> {
        let items = self.node.key("items");
        (!items.is_absent()).then(|| self.child("(item)", items))
    }

    fn property_schemas(&self) -> Vec<OpenApiSchema> {
        let required: Vec<String> = self.node.key("required").extract_or_default();
        self.node
            .key("properties")
            .entries()
            .into_iter()
            .map(|(name, node)| OpenApiSchema {
                required_property: required.contains(&name),
                ..self.child(name, node)
            })
            .filter(|prop| !(self.write_only && prop.read_only()))
            .collect()
    }

    fn variants(&self, keyword: &str) -> Vec<OpenApiSchema> {
        self.node
            .key(keyword)
            .items()
            .into_iter()
            .enumerate()
            .map(|(idx, node)| self.child(format!("{}/{idx}", self.name), node))
            .collect()
    }
}

fn boxed<'a>(schemas: Vec<OpenApiSchema>) -> Vec<Box<dyn Schema + 'a>> {
    schemas
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn Schema + 'a>)
        .collect()
}

impl Schema for OpenApiSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn node(&self) -> &Value {
        &self.node
    }

    fn required(&self) -> bool {
        self.required_property || self.node.key("required").extract_or_default::<bool>()
    }

    fn items(&self) -> Option<Box<dyn Schema + '_>> {
        self.item_schema().map(|s| Box::new(s) as Box<dyn Schema + '_>)
    }

    fn properties(&self) -> Vec<Box<dyn Schema + '_>> {
        boxed(self.property_schemas())
    }

    fn any_of(&self) -> Vec<Box<dyn Schema + '_>> {
        boxed(self.variants("anyOf"))
    }

    fn one_of(&self) -> Vec<Box<dyn Schema + '_>> {
        boxed(self.variants("oneOf"))
    }
}

/// An operation or path-level parameter.
///
/// Name, location, description, `required` and `example` sit on the
/// parameter itself; the value's shape sits under `schema`.
#[derive(Debug, Clone)]
pub struct OpenApiParameter {
    name: String,
    node: Value,
}

impl OpenApiParameter {
    pub fn new(node: Value) -> Self {
        Self {
            name: node.key("name").extract_or_default(),
            node,
        }
    }

    fn shape(&self) -> OpenApiSchema {
        OpenApiSchema::new(self.name.clone(), self.node.key("schema"))
    }
}

impl Schema for OpenApiParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn node(&self) -> &Value {
        &self.node
    }

    fn location(&self) -> String {
        self.node.key("in").extract_or_default()
    }

    fn schema_type(&self) -> String {
        self.shape().schema_type()
    }

    fn nullable(&self) -> bool {
        self.shape().nullable()
    }

    fn enum_values(&self) -> Vec<String> {
        self.shape().enum_values()
    }

    fn enum_descriptions(&self) -> Vec<String> {
        self.shape().enum_descriptions()
    }

    fn format(&self) -> String {
        self.shape().format()
    }

    fn default_value(&self) -> String {
        self.shape().default_value()
    }

    fn minimum(&self) -> Option<f64> {
        self.shape().minimum()
    }

    fn maximum(&self) -> Option<f64> {
        self.shape().maximum()
    }

    fn min_length(&self) -> Option<i64> {
        self.shape().min_length()
    }

    fn max_length(&self) -> Option<i64> {
        self.shape().max_length()
    }

    fn items(&self) -> Option<Box<dyn Schema + '_>> {
        self.shape().item_schema().map(|s| Box::new(s) as Box<dyn Schema + '_>)
    }

    fn properties(&self) -> Vec<Box<dyn Schema + '_>> {
        boxed(self.shape().property_schemas())
    }

    fn any_of(&self) -> Vec<Box<dyn Schema + '_>> {
        boxed(self.shape().variants("anyOf"))
    }

    fn one_of(&self) -> Vec<Box<dyn Schema + '_>> {
        boxed(self.shape().variants("oneOf"))
    }
}
