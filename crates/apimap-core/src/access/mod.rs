//! Uniform, reference-aware navigation over decoded JSON/YAML documents.

mod coerce;
mod node;
mod resolver;
mod value;

pub use coerce::FromNode;
pub use node::{ALL_OF_KEY, Map, Node, REF_KEY};
pub use resolver::{DefinitionsResolver, PointerResolver, Resolver};
pub use value::{MAX_RESOLVE_DEPTH, Step, Value};
