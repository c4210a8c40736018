use crate::access::Value;
use crate::naming::name_variants;

/// An array payload found inside a response schema.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Property holding the array; `None` when the response is the array.
    pub key: Option<String>,
    /// The array schema.
    pub array: Value,
}

impl Listing {
    /// Schema of one listed element.
    pub fn item(&self) -> Value {
        self.array.key("items")
    }

    /// What an operation outputs: the element schema, or the array itself
    /// when it declares no `items`.
    pub fn payload(&self) -> Value {
        let item = self.item();
        if item.is_absent() {
            self.array.clone()
        } else {
            item
        }
    }

    /// Whether [`Listing::payload`] differs from the response it came from.
    /// A bare array without `items` unwraps to itself.
    pub fn unwraps(&self) -> bool {
        self.key.is_some() || !self.item().is_absent()
    }
}

/// Look for the listing envelope in a response schema.
///
/// Rules, first match wins: the response is itself an array; a property
/// named like the resource (any of its [`name_variants`]) is an array; a
/// property named `items` is an array; with `fallback_first_array`, the
/// first array property in key order.
pub fn find_listing(
    response: &Value,
    resource_name: &str,
    fallback_first_array: bool,
) -> Option<Listing> {
    if is_array(response) {
        return Some(Listing {
            key: None,
            array: response.clone(),
        });
    }

    let properties = response.key("properties");
    let candidates = name_variants(resource_name)
        .into_iter()
        .chain(std::iter::once("items".to_string()));
    for name in candidates {
        let property = properties.key(&name);
        if is_array(&property) {
            return Some(Listing {
                key: Some(name),
                array: property,
            });
        }
    }

    if fallback_first_array {
        return properties
            .entries()
            .into_iter()
            .find(|(_, property)| is_array(property))
            .map(|(name, array)| Listing {
                key: Some(name),
                array,
            });
    }
    None
}

fn is_array(schema: &Value) -> bool {
    schema.key("type").string().as_deref() == Some("array")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let response = Value::new(json!({"type": "array", "items": {"type": "string"}}));
        let listing = find_listing(&response, "user", false).unwrap();
        assert_eq!(listing.key, None);
        assert_eq!(listing.item().key("type").string().as_deref(), Some("string"));
    }

    #[test]
    fn test_bare_array_without_items_unwraps_nothing() {
        let response = Value::new(json!({"type": "array"}));
        let listing = find_listing(&response, "user", false).unwrap();
        assert!(!listing.unwraps());
        assert_eq!(listing.payload().node(), response.node());

        let typed = Value::new(json!({"type": "array", "items": {"type": "integer"}}));
        assert!(find_listing(&typed, "user", false).unwrap().unwraps());
    }

    #[test]
    fn test_named_property() {
        let response = Value::new(json!({
            "type": "object",
            "properties": {
                "total": {"type": "integer"},
                "users": {"type": "array", "items": {"type": "object", "title": "User"}}
            }
        }));
        let listing = find_listing(&response, "user", false).unwrap();
        assert_eq!(listing.key.as_deref(), Some("users"));
        assert_eq!(listing.item().key("title").string().as_deref(), Some("User"));
    }

    #[test]
    fn test_items_property() {
        let response = Value::new(json!({
            "properties": {"items": {"type": "array"}, "next": {"type": "string"}}
        }));
        let listing = find_listing(&response, "order", false).unwrap();
        assert_eq!(listing.key.as_deref(), Some("items"));
        assert!(listing.unwraps());
        assert_eq!(listing.payload().node(), listing.array.node());
    }

    #[test]
    fn test_first_array_fallback() {
        let response = Value::new(json!({
            "properties": {"entries": {"type": "array"}, "zeta": {"type": "array"}}
        }));
        assert!(find_listing(&response, "log", false).is_none());
        let listing = find_listing(&response, "log", true).unwrap();
        assert_eq!(listing.key.as_deref(), Some("entries"));
    }

    #[test]
    fn test_no_listing() {
        let response = Value::new(json!({
            "properties": {"users": {"type": "object"}}
        }));
        assert!(find_listing(&response, "user", true).is_none());
    }
}
