pub mod access;
pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod naming;
pub mod openapi;
pub mod parse;
pub mod registry;

pub use access::Value;
pub use config::{Lexicon, ServiceMeta};
pub use discovery::DiscoveryService;
pub use model::{HttpMethod, Operation, Orientation, Resource, Schema, Service};
pub use openapi::OpenApiService;
pub use registry::{Registry, split_selector_version};
