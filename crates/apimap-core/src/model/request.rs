use serde_json::{Map, Value as Json};
use url::Url;

use super::{HttpMethod, Operation};
use crate::error::ExpandError;

/// Everything needed to issue a request for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Arguments not consumed as parameters, sent as the JSON body.
    pub body: Option<Json>,
}

/// Substitute `{name}` placeholders in a URL template.
pub fn expand_url(template: &str, params: &Map<String, Json>) -> Result<String, ExpandError> {
    let mut url = template.to_string();
    for (name, value) in params {
        url = url.replace(&format!("{{{name}}}"), &render(value));
    }
    if url.contains('{') {
        return Err(ExpandError::Unexpanded(url));
    }
    Ok(url)
}

/// Derive method, URL, headers and body for `op` from the given arguments.
pub fn plan_request(op: &dyn Operation, args: &Map<String, Json>) -> Result<RequestPlan, ExpandError> {
    let parameters = op.parameters();

    let required: Vec<String> = parameters
        .iter()
        .filter(|p| p.required())
        .map(|p| p.name().to_string())
        .collect();
    if let Some(missing) = required.iter().find(|name| !args.contains_key(name.as_str())) {
        return Err(ExpandError::MissingRequired {
            name: missing.clone(),
            required: required.clone(),
        });
    }

    let mut remaining = args.clone();
    let mut path_args = Map::new();
    let mut query = Vec::new();
    let mut headers = Vec::new();
    for param in &parameters {
        let Some(value) = remaining.remove(param.name()) else {
            continue;
        };
        match param.location().as_str() {
            "query" => query.push((param.name().to_string(), render(&value))),
            "header" => headers.push((param.name().to_string(), render(&value))),
            "path" | "" => {
                path_args.insert(param.name().to_string(), value);
            }
            _ => {
                remaining.insert(param.name().to_string(), value);
            }
        }
    }

    let mut url = expand_url(&op.url(), &path_args)?;
    if !query.is_empty() {
        let mut parsed = Url::parse(&url).map_err(|e| ExpandError::InvalidUrl {
            url: url.clone(),
            message: e.to_string(),
        })?;
        parsed.query_pairs_mut().extend_pairs(&query);
        url = parsed.to_string();
    }

    let body = if remaining.is_empty() {
        None
    } else {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        Some(Json::Object(remaining))
    };

    log::debug!("planned {} {url}", op.method());
    Ok(RequestPlan {
        method: op.method(),
        url,
        headers,
        body,
    })
}

fn render(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}
