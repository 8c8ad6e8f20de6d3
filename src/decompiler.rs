//! Sources of syntax trees for compiled types.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{debug, info};

use crate::syntax::{parse_tree_reader, SyntaxTree, TreeParseError};

#[derive(Debug, Error)]
pub enum DecompileError {
    #[error("type `{0}` not found")]
    TypeNotFound(String),
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed syntax dump for `{full_name}`")]
    Malformed {
        full_name: String,
        #[source]
        source: TreeParseError,
    },
    #[error("unsupported type name `{0}`")]
    Unsupported(String),
}

/// Produces a fresh syntax tree for a type on every call.
#[cfg_attr(test, mockall::automock)]
pub trait Decompiler: Send + Sync {
    fn decompile_type(&self, full_name: &str) -> Result<SyntaxTree, DecompileError>;
}

type DecompilerInit = Box<dyn Fn() -> Option<Arc<dyn Decompiler>> + Send + Sync>;

/// A decompiler slot created on first use and shared afterwards.
pub struct LazyDecompiler {
    cell: OnceCell<Option<Arc<dyn Decompiler>>>,
    init: DecompilerInit,
}

impl LazyDecompiler {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn Decompiler>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(init),
        }
    }

    /// A slot that already holds `decompiler`.
    pub fn ready(decompiler: Arc<dyn Decompiler>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(Some(decompiler));
        Self {
            cell,
            init: Box::new(|| None),
        }
    }

    /// A slot that never yields a decompiler.
    pub fn unavailable() -> Self {
        Self::new(|| None)
    }

    pub fn get(&self) -> Option<Arc<dyn Decompiler>> {
        self.cell.get_or_init(|| (self.init)()).clone()
    }
}

impl std::fmt::Debug for LazyDecompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyDecompiler")
            .field("initialized", &self.cell.get().is_some())
            .finish()
    }
}

/// Reads pre-decompiled syntax dumps: `{dir}/{full_name}.json`, or the same
/// file compressed with zstd as `{dir}/{full_name}.json.zst`.
#[derive(Debug, Clone)]
pub struct JsonDecompiler {
    dir: PathBuf,
}

impl JsonDecompiler {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!("Reading syntax dumps from {}", dir.display());
        Self { dir }
    }

    fn open(path: &Path) -> Result<File, DecompileError> {
        File::open(path).map_err(|source| DecompileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Decompiler for JsonDecompiler {
    fn decompile_type(&self, full_name: &str) -> Result<SyntaxTree, DecompileError> {
        if full_name.is_empty() || full_name.contains(['/', '\\']) || full_name.contains("..") {
            return Err(DecompileError::Unsupported(full_name.to_string()));
        }

        let malformed = |source: TreeParseError| DecompileError::Malformed {
            full_name: full_name.to_string(),
            source,
        };

        let plain = self.dir.join(format!("{full_name}.json"));
        if plain.is_file() {
            debug!("Parsing {}", plain.display());
            let reader = BufReader::new(Self::open(&plain)?);
            return parse_tree_reader(reader).map_err(malformed);
        }

        let compressed = self.dir.join(format!("{full_name}.json.zst"));
        if compressed.is_file() {
            debug!("Decompressing {}", compressed.display());
            let decoder = zstd::stream::read::Decoder::new(Self::open(&compressed)?).map_err(|source| {
                DecompileError::Io {
                    path: compressed.clone(),
                    source,
                }
            })?;
            return parse_tree_reader(decoder).map_err(malformed);
        }

        Err(DecompileError::TypeNotFound(full_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DUMP: &str = r#"{
        "kind": "type_declaration",
        "modifiers": ["public"],
        "children": [{ "kind": "identifier", "role": "name", "name": "Gadget" }]
    }"#;

    #[test]
    fn test_reads_plain_dump() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Widgets.Gadget.json"), DUMP).unwrap();

        let tree = JsonDecompiler::new(dir.path())
            .decompile_type("Widgets.Gadget")
            .unwrap();
        let ty = tree.children(tree.root())[0];
        assert_eq!(tree.name_of(ty), Some("Gadget"));
    }

    #[test]
    fn test_reads_compressed_dump() {
        let dir = tempfile::tempdir().unwrap();
        let compressed = zstd::stream::encode_all(DUMP.as_bytes(), 0).unwrap();
        std::fs::write(dir.path().join("Widgets.Gadget.json.zst"), compressed).unwrap();

        let tree = JsonDecompiler::new(dir.path())
            .decompile_type("Widgets.Gadget")
            .unwrap();
        assert_eq!(tree.children(tree.root()).len(), 1);
    }

    #[test]
    fn test_missing_dump_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonDecompiler::new(dir.path())
            .decompile_type("Widgets.Missing")
            .unwrap_err();
        assert!(matches!(err, DecompileError::TypeNotFound(ref name) if name == "Widgets.Missing"));
    }

    #[test]
    fn test_malformed_dump_reports_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Widgets.Gadget.json"),
            r#"{ "kind": "method_declaration", "modifiers": ["sometimes"] }"#,
        )
        .unwrap();

        let err = JsonDecompiler::new(dir.path())
            .decompile_type("Widgets.Gadget")
            .unwrap_err();
        assert!(matches!(err, DecompileError::Malformed { .. }));
        assert_eq!(err.to_string(), "malformed syntax dump for `Widgets.Gadget`");
    }

    #[test]
    fn test_path_like_names_rejected() {
        let decompiler = JsonDecompiler::new("/nonexistent");
        for name in ["../secret", "a/b", ""] {
            assert!(matches!(
                decompiler.decompile_type(name),
                Err(DecompileError::Unsupported(_))
            ));
        }
    }

    #[test]
    fn test_lazy_slot_initializes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let slot = LazyDecompiler::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(Arc::new(MockDecompiler::new()) as Arc<dyn Decompiler>)
        });

        assert!(slot.get().is_some());
        assert!(slot.get().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unavailable_slot() {
        assert!(LazyDecompiler::unavailable().get().is_none());
        assert!(LazyDecompiler::ready(Arc::new(MockDecompiler::new())).get().is_some());
    }
}
