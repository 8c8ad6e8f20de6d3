//! XML documentation summaries keyed by documentation id (`T:Namespace.Type`).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

/// Placeholder text the documentation tooling writes for undocumented members.
pub const UNDOCUMENTED_PLACEHOLDER: &str = "To be added.";

pub trait DocumentationSource: Send + Sync {
    /// Raw summary for a documentation id, if any.
    fn summary(&self, xml_name: &str) -> Option<String>;
}

/// Documentation source that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocs;

impl DocumentationSource for NoDocs {
    fn summary(&self, _xml_name: &str) -> Option<String> {
        None
    }
}

/// Summaries loaded from a JSON object of `{ "T:Name": "summary", ... }`.
#[derive(Debug, Clone, Default)]
pub struct MemberDocs {
    summaries: HashMap<String, String>,
}

impl MemberDocs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, xml_name: &str, summary: &str) -> Self {
        self.summaries.insert(xml_name.to_string(), summary.to_string());
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read documentation {}", path.display()))?;
        let summaries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse documentation {}", path.display()))?;
        Ok(Self { summaries })
    }
}

impl DocumentationSource for MemberDocs {
    fn summary(&self, xml_name: &str) -> Option<String> {
        self.summaries.get(xml_name).cloned()
    }
}

/// Trim a summary and blank out the undocumented placeholder.
pub fn normalize_summary(summary: Option<&str>) -> String {
    match summary.map(str::trim) {
        Some(UNDOCUMENTED_PLACEHOLDER) | None => String::new(),
        Some(text) => text.to_string(),
    }
}
