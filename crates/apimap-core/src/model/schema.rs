use crate::access::Value;
use crate::error::LookupError;

/// A parameter or JSON value shape.
///
/// Keyword readers default to reading the JSON Schema keyword of the same
/// name from [`Schema::node`]; adapters override the ones their format
/// spells differently.
pub trait Schema {
    fn name(&self) -> &str;

    /// The schema node keyword readers consult.
    fn node(&self) -> &Value;

    /// Where a parameter travels (`path`, `query`, `header`); empty for
    /// body schemas.
    fn location(&self) -> String {
        String::new()
    }

    fn title(&self) -> String {
        self.node().key("title").extract_or_default()
    }

    fn description(&self) -> String {
        self.node()
            .key("description")
            .extract_or_default::<String>()
            .trim()
            .to_string()
    }

    fn schema_type(&self) -> String {
        self.node().key("type").extract_or_default()
    }

    fn read_only(&self) -> bool {
        self.node().key("readOnly").extract_or_default()
    }

    fn required(&self) -> bool {
        self.node().key("required").extract_or_default()
    }

    fn nullable(&self) -> bool {
        self.node().key("nullable").extract_or_default()
    }

    fn enum_values(&self) -> Vec<String> {
        self.node().key("enum").extract_or_default()
    }

    fn enum_descriptions(&self) -> Vec<String> {
        self.node().key("enumDescriptions").extract_or_default()
    }

    fn format(&self) -> String {
        self.node().key("format").extract_or_default()
    }

    fn default_value(&self) -> String {
        self.node().key("default").extract_or_default()
    }

    fn example(&self) -> String {
        self.node().key("example").extract_or_default()
    }

    fn minimum(&self) -> Option<f64> {
        self.node().key("minimum").extract().ok()
    }

    fn maximum(&self) -> Option<f64> {
        self.node().key("maximum").extract().ok()
    }

    fn min_length(&self) -> Option<i64> {
        self.node().key("minLength").extract().ok()
    }

    fn max_length(&self) -> Option<i64> {
        self.node().key("maxLength").extract().ok()
    }

    fn items(&self) -> Option<Box<dyn Schema + '_>>;

    fn properties(&self) -> Vec<Box<dyn Schema + '_>>;

    fn property(&self, name: &str) -> Result<Box<dyn Schema + '_>, LookupError> {
        self.properties()
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| LookupError::Property(name.to_string()))
    }

    fn any_of(&self) -> Vec<Box<dyn Schema + '_>>;

    fn one_of(&self) -> Vec<Box<dyn Schema + '_>>;
}
