//! # typeview
//!
//! Renders decompiled C# types as classified, cross-linked HTML, either in
//! full or reduced to the declarations visible from outside the type.

pub mod config;
pub mod decompiler;
pub mod docs;
pub mod documentation;
pub mod interface;
pub mod links;
pub mod renderer;
pub mod syntax;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, RenderConfig};
pub use decompiler::{DecompileError, Decompiler, JsonDecompiler, LazyDecompiler};
pub use docs::{DocumentationSource, MemberDocs, NoDocs};
pub use documentation::{RenderServices, TypeDefinition, TypeDocumentation, NO_DECOMPILER};
pub use interface::{InterfacePruner, PrunePolicy, PruneSummary};
pub use links::{FrameworkLinks, NoLinks, TypeUrlResolver};
pub use renderer::{FormattingOptions, HtmlRenderer};
pub use syntax::{parse_tree_str, SyntaxTree};
