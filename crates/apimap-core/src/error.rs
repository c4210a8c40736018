use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must be a map, found {0}")]
    InvalidRoot(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("reference {0:?} found but no resolver configured")]
    MissingResolver(String),

    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {reference} (at segment {segment:?})")]
    RefTargetNotFound { reference: String, segment: String },
}

/// Failure to read a typed value out of a document node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("value is absent")]
    Absent,

    #[error("cannot convert {found} to {expected}")]
    Coerce {
        found: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A by-name lookup in the model found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("resource '{0}' not found")]
    Resource(String),

    #[error("operation '{operation}' not found on resource '{resource}'")]
    Operation { resource: String, operation: String },

    #[error("property '{0}' not found")]
    Property(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid metadata for service '{service}': {source}")]
    Meta {
        service: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("service '{0}' has no version requested and no 'latest' in its metadata")]
    NoVersion(String),

    #[error("no descriptor found for {name}@{version}")]
    NoDescriptor { name: String, version: String },

    #[error("invalid relative content pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("missing '{name}' of required parameters: {}", required.join(", "))]
    MissingRequired { name: String, required: Vec<String> },

    #[error("parameters not sufficient to expand URL: {0}")]
    Unexpanded(String),

    #[error("invalid request URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}
