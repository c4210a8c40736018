//! The uniform model both descriptor adapters project onto.
//!
//! Everything here is read-only. Adapters hand out lightweight views that
//! borrow from the service, so trait objects carry the borrow's lifetime
//! (`Box<dyn Resource + '_>`). Memoized state lives in `OnceCell`s and the
//! navigator shares resolvers through `Rc`: a service and every view derived
//! from it belong to one thread.

mod listing;
mod request;
mod schema;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::access::Value;
use crate::config::ServiceMeta;
use crate::error::LookupError;

pub use listing::{Listing, find_listing};
pub use request::{RequestPlan, expand_url, plan_request};
pub use schema::Schema;

/// Whose data a path, resource or service exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Scoped to the authenticated account.
    #[serde(alias = "account")]
    Relative,
    /// Addresses arbitrary entities.
    Absolute,
    #[default]
    Mixed,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Relative => "relative",
            Orientation::Absolute => "absolute",
            Orientation::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case spelling, as used for path item keys.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "trace" => Ok(HttpMethod::Trace),
            _ => Err(format!("unknown HTTP method '{s}'")),
        }
    }
}

/// A loaded API descriptor.
pub trait Service {
    fn name(&self) -> &str;
    fn title(&self) -> String;
    fn provider(&self) -> String;
    fn version(&self) -> String;
    fn categories(&self) -> Vec<String>;
    fn base_url(&self) -> String;
    fn docs_url(&self) -> String;
    fn orientation(&self) -> Orientation;
    /// Security scheme names (`bearer`, `oauth2`, ...).
    fn security(&self) -> Vec<String>;

    /// All resources, in a stable order.
    fn resources(&self) -> Vec<Box<dyn Resource + '_>>;

    fn resource(&self, name: &str) -> Result<Box<dyn Resource + '_>, LookupError> {
        self.resources()
            .into_iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| LookupError::Resource(name.to_string()))
    }

    /// The parsed descriptor, with its resolver attached.
    fn document(&self) -> &Value;

    fn meta(&self) -> &ServiceMeta;
}

pub trait Resource {
    fn service(&self) -> &dyn Service;

    /// The owning resource, if any. Computed once per resource.
    fn parent(&self) -> Option<Box<dyn Resource + '_>>;

    fn subresources(&self) -> Vec<Box<dyn Resource + '_>> {
        self.service()
            .resources()
            .into_iter()
            .filter(|r| r.parent().is_some_and(|p| p.name() == self.name()))
            .collect()
    }

    fn name(&self) -> &str;
    fn title(&self) -> String;
    fn description(&self) -> String;
    fn orientation(&self) -> Orientation;
    fn collection_urls(&self) -> Vec<String>;
    fn item_urls(&self) -> Vec<String>;

    /// Sorted union of the operations' tags.
    fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.operations().iter().flat_map(|op| op.tags()).collect();
        tags.sort();
        tags.dedup();
        tags
    }

    fn operations(&self) -> Vec<Box<dyn Operation + '_>>;

    fn operation(&self, name: &str) -> Result<Box<dyn Operation + '_>, LookupError> {
        self.operations()
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| LookupError::Operation {
                resource: self.name().to_string(),
                operation: name.to_string(),
            })
    }
}

pub trait Operation {
    fn resource(&self) -> Box<dyn Resource + '_>;

    /// Unique name within the resource, including any orientation suffix.
    fn name(&self) -> &str;

    /// Name without the orientation suffix.
    fn abs_name(&self) -> &str;

    fn id(&self) -> String;
    fn description(&self) -> String;

    /// URL template; may hold `{param}` placeholders.
    fn url(&self) -> String;
    fn method(&self) -> HttpMethod;
    fn orientation(&self) -> Orientation;
    fn tags(&self) -> Vec<String>;
    fn docs_url(&self) -> String;
    fn security(&self) -> Vec<String>;
    fn scopes(&self) -> Vec<String>;
    fn parameters(&self) -> Vec<Box<dyn Schema + '_>>;
    fn input(&self) -> Option<Box<dyn Schema + '_>>;

    /// The semantic payload, unwrapped from its listing envelope if any.
    fn output(&self) -> Option<Box<dyn Schema + '_>>;

    /// The raw response, present only when it differs from the output.
    fn response(&self) -> Option<Box<dyn Schema + '_>>;
}

/// Join a base URL and a path template without escaping placeholders.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
