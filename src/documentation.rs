//! Per-type documentation: summary text plus the rendered code views.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::decompiler::LazyDecompiler;
use crate::docs::{normalize_summary, DocumentationSource};
use crate::interface::InterfacePruner;
use crate::links::TypeUrlResolver;
use crate::renderer::{encode_html, HtmlRenderer};

/// Returned in place of code when no decompiler could be created.
pub const NO_DECOMPILER: &str = "// No decompiler available";

/// A type as named by its assembly metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub full_name: String,
}

impl TypeDefinition {
    pub fn new(full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
        }
    }

    /// Simple name: the last segment after `.`, `+` or `/`, without the
    /// generic arity suffix.
    pub fn name(&self) -> &str {
        let last = self
            .full_name
            .rsplit(['.', '+', '/'])
            .next()
            .unwrap_or(&self.full_name);
        match last.find('`') {
            Some(tick) => &last[..tick],
            None => last,
        }
    }

    /// Documentation id used by XML doc files.
    pub fn xml_name(&self) -> String {
        format!("T:{}", self.full_name)
    }
}

/// Collaborators shared by every type of one package framework.
#[derive(Clone)]
pub struct RenderServices {
    pub links: Arc<dyn TypeUrlResolver>,
    pub full_decompiler: Arc<LazyDecompiler>,
    pub interface_decompiler: Arc<LazyDecompiler>,
    pub config: Arc<RenderConfig>,
}

impl RenderServices {
    pub fn new(
        links: Arc<dyn TypeUrlResolver>,
        full_decompiler: Arc<LazyDecompiler>,
        interface_decompiler: Arc<LazyDecompiler>,
        config: RenderConfig,
    ) -> Self {
        Self {
            links,
            full_decompiler,
            interface_decompiler,
            config: Arc::new(config),
        }
    }
}

struct Inner {
    definition: TypeDefinition,
    summary_text: String,
    services: RenderServices,
}

/// Documentation for one type. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct TypeDocumentation {
    inner: Arc<Inner>,
}

impl TypeDocumentation {
    pub fn new(definition: TypeDefinition, docs: &dyn DocumentationSource, services: RenderServices) -> Self {
        let summary_text = normalize_summary(docs.summary(&definition.xml_name()).as_deref());
        Self {
            inner: Arc::new(Inner {
                definition,
                summary_text,
                services,
            }),
        }
    }

    pub fn summary_text(&self) -> &str {
        &self.inner.summary_text
    }

    /// The whole decompiled type, method bodies included.
    pub async fn render_full_body(&self) -> String {
        let inner = self.inner.clone();
        match tokio::task::spawn_blocking(move || inner.full_body()).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Full body render task failed: {}", e);
                error_comment(&e.to_string())
            }
        }
    }

    /// Only the declarations visible from outside the type.
    pub async fn render_interface_view(&self) -> String {
        let inner = self.inner.clone();
        match tokio::task::spawn_blocking(move || inner.interface_view()).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Interface render task failed: {}", e);
                error_comment(&format!("{:?}", anyhow::Error::new(e)))
            }
        }
    }
}

impl Inner {
    fn full_body(&self) -> String {
        let Some(decompiler) = self.services.full_decompiler.get() else {
            return NO_DECOMPILER.to_string();
        };

        let full_name = &self.definition.full_name;
        info!("Rendering full body of {}", full_name);
        match decompiler.decompile_type(full_name) {
            Ok(tree) => self.renderer().render(&tree),
            Err(e) => {
                warn!("Failed to decompile {}: {}", full_name, e);
                error_comment(&e.to_string())
            }
        }
    }

    fn interface_view(&self) -> String {
        let Some(decompiler) = self.services.interface_decompiler.get() else {
            return NO_DECOMPILER.to_string();
        };

        let full_name = &self.definition.full_name;
        info!("Rendering interface view of {}", full_name);
        match decompiler.decompile_type(full_name) {
            Ok(mut tree) => {
                let policy = self.services.config.prune_policy(self.definition.name());
                let summary = InterfacePruner::new(&policy).prune(&mut tree);
                debug!(?summary, "interface view of {}", full_name);
                self.renderer().render(&tree)
            }
            Err(e) => {
                let report = anyhow::Error::new(e);
                warn!("Failed to decompile {}: {:#}", full_name, report);
                error_comment(&format!("{:?}", report))
            }
        }
    }

    fn renderer(&self) -> HtmlRenderer<'_> {
        HtmlRenderer::new(self.services.links.as_ref(), &self.services.config.formatting)
    }
}

/// Wrap a message in an HTML comment that cannot close early.
pub fn error_comment(message: &str) -> String {
    let mut text = encode_html(message);
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    format!("<!-- {} -->", text)
}
