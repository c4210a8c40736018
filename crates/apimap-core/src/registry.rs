//! Locating services on disk.
//!
//! A service named `a-b` lives in `<root>/a/b/`: a `meta.yaml` next to one
//! directory per version, each holding a single descriptor document.

use std::fs;
use std::path::{Path, PathBuf};

use crate::access::Node;
use crate::config::ServiceMeta;
use crate::discovery::DiscoveryService;
use crate::error::LoadError;
use crate::model::Service;
use crate::openapi::OpenApiService;
use crate::parse;

pub const META_FILE_NAME: &str = "meta.yaml";

/// Descriptor file names, in lookup order.
const DESCRIPTOR_FILES: [&str; 4] = ["openapi.json", "openapi.yaml", "openapi.yml", "googleapi.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    OpenApi,
    Discovery,
}

#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
}

impl Registry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn service_dir(&self, name: &str) -> PathBuf {
        name.split('-').fold(self.root.clone(), |dir, part| dir.join(part))
    }

    /// Read a service's `meta.yaml`; a missing file counts as empty metadata.
    pub fn load_meta(&self, name: &str) -> Result<ServiceMeta, LoadError> {
        let path = self.service_dir(name).join(META_FILE_NAME);
        if !path.exists() {
            log::debug!("{name}: no {META_FILE_NAME}, using defaults");
            return Ok(ServiceMeta::default());
        }
        ServiceMeta::from_yaml(name, &read(&path)?)
    }

    /// Load a service, at `version` or else the metadata's `latest`.
    pub fn load_service(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<Box<dyn Service>, LoadError> {
        let meta = self.load_meta(name)?;
        let version = match version.or(meta.latest.as_deref()) {
            Some(version) => version.to_string(),
            None => return Err(LoadError::NoVersion(name.to_string())),
        };

        let dir = self.service_dir(name).join(&version);
        let (path, format) = find_descriptor(&dir).ok_or_else(|| LoadError::NoDescriptor {
            name: name.to_string(),
            version: version.clone(),
        })?;
        log::info!("loading {name}@{version} from {}", path.display());

        let root = parse_descriptor(&path)?;
        let service: Box<dyn Service> = match format {
            Format::OpenApi => Box::new(OpenApiService::from_node(name, root, meta)?),
            Format::Discovery => Box::new(DiscoveryService::from_node(name, root, meta)?),
        };
        Ok(service)
    }

    /// Names of every service under the root, sorted.
    pub fn available_services(&self) -> Result<Vec<String>, LoadError> {
        let mut names = Vec::new();
        self.collect_services(&self.root, &mut Vec::new(), &mut names)?;
        names.sort();
        Ok(names)
    }

    fn collect_services(
        &self,
        dir: &Path,
        prefix: &mut Vec<String>,
        out: &mut Vec<String>,
    ) -> Result<(), LoadError> {
        if !prefix.is_empty() && dir.join(META_FILE_NAME).is_file() {
            out.push(prefix.join("-"));
        }
        let listing = fs::read_dir(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in listing {
            let entry = entry.map_err(|source| LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            prefix.push(entry.file_name().to_string_lossy().into_owned());
            self.collect_services(&path, prefix, out)?;
            prefix.pop();
        }
        Ok(())
    }
}

/// Split `svc@v2` into the service name and requested version.
pub fn split_selector_version(selector: &str) -> (&str, Option<&str>) {
    match selector.split_once('@') {
        Some((name, version)) if !version.is_empty() => (name, Some(version)),
        Some((name, _)) => (name, None),
        None => (selector, None),
    }
}

fn find_descriptor(dir: &Path) -> Option<(PathBuf, Format)> {
    DESCRIPTOR_FILES.into_iter().find_map(|file| {
        let path = dir.join(file);
        if !path.is_file() {
            return None;
        }
        let format = if file.starts_with("openapi") {
            Format::OpenApi
        } else {
            Format::Discovery
        };
        Some((path, format))
    })
}

fn parse_descriptor(path: &Path) -> Result<Node, LoadError> {
    let content = read(path)?;
    let node = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(node)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
