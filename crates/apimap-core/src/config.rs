use std::collections::BTreeSet;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::error::LoadError;
use crate::model::Orientation;

/// Per-service metadata, loaded from the `meta.yaml` next to a service's
/// version directories.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceMeta {
    /// Version picked when a load request names none.
    pub latest: Option<String>,
    pub categories: Vec<String>,
    #[serde(alias = "contentOrientation", alias = "dataScope")]
    pub orientation: Orientation,
    /// Regexes flagging a path as scoped to the authenticated account.
    pub relative_content_paths: Vec<String>,
    /// Path prefix moved from every path onto the base URL.
    pub extend_base_to: Option<String>,
    /// Resource name → parent resource name; null or empty forces top level.
    pub force_parent: IndexMap<String, Option<String>>,
    /// Path → whether it addresses a single item.
    pub force_item_paths: IndexMap<String, bool>,
    /// Path → HTTP method → operation name.
    pub force_method_op_name: IndexMap<String, IndexMap<String, String>>,
    pub acronyms: Vec<String>,
    pub invariants: Vec<String>,
}

impl ServiceMeta {
    pub fn from_yaml(service: &str, content: &str) -> Result<Self, LoadError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str::<Option<ServiceMeta>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|source| LoadError::Meta {
                service: service.to_string(),
                source,
            })
    }

    pub fn relative_patterns(&self) -> Result<Vec<Regex>, LoadError> {
        self.relative_content_paths
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| LoadError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    /// The default lexicon extended with this service's own words.
    pub fn lexicon(&self) -> Lexicon {
        let mut lexicon = Lexicon::default();
        lexicon.extend(&self.acronyms, &self.invariants);
        lexicon
    }
}

const DEFAULT_ACRONYMS: &[&str] = &[
    "lfs", "ips", "ip", "ssh", "gpg", "sql", "ca", "db", "pdf", "csv", "cpu", "id", "2fa",
];

const DEFAULT_INVARIANTS: &[&str] = &["media", "previous", "dangerous", "kubernetes"];

/// Word lists consulted by the naming functions.
///
/// Acronyms are always rendered upper-case; invariants are never
/// singularized. Lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    acronyms: BTreeSet<String>,
    invariants: BTreeSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(DEFAULT_ACRONYMS, DEFAULT_INVARIANTS)
    }
}

impl Lexicon {
    pub fn new<A, I>(acronyms: A, invariants: I) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            acronyms: acronyms.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
            invariants: invariants.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn extend<A, I>(&mut self, acronyms: A, invariants: I)
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.acronyms
            .extend(acronyms.into_iter().map(|s| s.as_ref().to_lowercase()));
        self.invariants
            .extend(invariants.into_iter().map(|s| s.as_ref().to_lowercase()));
    }

    pub fn is_acronym(&self, word: &str) -> bool {
        self.acronyms.contains(&word.to_lowercase())
    }

    pub fn is_invariant(&self, word: &str) -> bool {
        self.invariants.contains(&word.to_lowercase())
    }
}
