//! Cross-reference links for type names.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Maps fully-qualified type names to documentation URLs.
#[cfg_attr(test, mockall::automock)]
pub trait TypeUrlResolver: Send + Sync {
    fn find_type_url(&self, full_name: &str) -> Option<String>;
}

/// Resolver that never produces a link.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLinks;

impl TypeUrlResolver for NoLinks {
    fn find_type_url(&self, _full_name: &str) -> Option<String> {
        None
    }
}

fn default_external_base() -> String {
    "https://docs.microsoft.com/en-us/dotnet/api/".to_string()
}

fn default_external_prefixes() -> Vec<String> {
    vec!["System.".to_string(), "Microsoft.".to_string()]
}

/// Links for one target framework of a package: its own types point into the
/// package browser, platform types point at the external API reference.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameworkLinks {
    pub package_id: String,
    pub version: String,
    pub target_framework: String,
    /// Full type name → assembly file that defines it.
    #[serde(default)]
    pub types: HashMap<String, String>,
    #[serde(default = "default_external_base")]
    pub external_base: String,
    #[serde(default = "default_external_prefixes")]
    pub external_prefixes: Vec<String>,
}

impl FrameworkLinks {
    pub fn new(package_id: &str, version: &str, target_framework: &str) -> Self {
        Self {
            package_id: package_id.to_string(),
            version: version.to_string(),
            target_framework: target_framework.to_string(),
            types: HashMap::new(),
            external_base: default_external_base(),
            external_prefixes: default_external_prefixes(),
        }
    }

    pub fn with_type(mut self, full_name: &str, assembly: &str) -> Self {
        self.types.insert(full_name.to_string(), assembly.to_string());
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read link table {}", path.display()))?;
        let links = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse link table {}", path.display()))?;
        Ok(links)
    }
}

impl TypeUrlResolver for FrameworkLinks {
    fn find_type_url(&self, full_name: &str) -> Option<String> {
        if let Some(assembly) = self.types.get(full_name) {
            return Some(format!(
                "/packages/{}/{}/lib/{}/{}/{}",
                self.package_id, self.version, self.target_framework, assembly, full_name
            ));
        }

        if self
            .external_prefixes
            .iter()
            .any(|prefix| full_name.starts_with(prefix.as_str()))
        {
            // Generic arity markers (`List`1`) become dashes in the API reference
            let slug = full_name.to_lowercase().replace('`', "-");
            return Some(format!("{}{}", self.external_base, slug));
        }

        None
    }
}
