//! Model Loading
//!
//! Reads `.ecore` documents from strings, files or a directory tree into one
//! [`Model`], then resolves every root package with the others as peers.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::error::Result;
use crate::model::{ElementId, Model, ECORE_NS_URI};
use crate::parser::{self, ParserConfig};
use crate::resolver::{self, ResolveStats};

/// Configuration for directory loading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// File extensions treated as schema documents
    pub extensions: Vec<String>,
    /// Skip documents matching these path prefixes
    pub skip_prefixes: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["ecore".to_string()],
            skip_prefixes: vec![
                "target/".to_string(), // Rust build artifacts
                ".git/".to_string(),   // Git repository
            ],
        }
    }
}

/// Parse one document held in memory
pub fn load_str(model: &mut Model, input: &str, config: &ParserConfig) -> Result<ElementId> {
    parser::parse_str(model, input, config)
}

/// Parse one document from disk
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_file(model: &mut Model, path: &Path, config: &ParserConfig) -> Result<ElementId> {
    let content = fs::read(path)?;
    let root = parser::parse_bytes(model, &content, config)?;
    debug!(package = %model.name(root), "loaded document");
    Ok(root)
}

/// Parse every schema document under `dir`, in file name order
pub fn load_directory(
    model: &mut Model,
    dir: &Path,
    config: &LoadConfig,
    parser: &ParserConfig,
) -> Result<Vec<ElementId>> {
    let mut roots = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| config.extensions.iter().any(|e| e == ext))
            .unwrap_or(false);
        if !matches_extension {
            continue;
        }

        let relative = path.strip_prefix(dir).unwrap_or(path);
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if config.skip_prefixes.iter().any(|p| relative_str.starts_with(p)) {
            continue;
        }

        roots.push(load_file(model, path, parser)?);
    }
    info!(dir = %dir.display(), packages = roots.len(), "loaded schema directory");
    Ok(roots)
}

/// Resolve each root with every other root package of the model as a peer.
///
/// The built-in Ecore package is added first when no root carries its
/// namespace URI.
pub fn resolve_all(model: &mut Model, roots: &[ElementId]) -> Result<ResolveStats> {
    if model.package_by_uri(ECORE_NS_URI).is_none() {
        model.add_ecore_package()?;
    }
    let all_roots: Vec<ElementId> = model.roots().collect();

    let mut total = ResolveStats::default();
    for &root in roots {
        let peers: Vec<ElementId> = all_roots.iter().copied().filter(|&p| p != root).collect();
        let stats = resolver::resolve(model, root, &peers)?;
        total.resolved += stats.resolved;
        total.already_resolved += stats.already_resolved;
    }
    info!(
        packages = roots.len(),
        resolved = total.resolved,
        "resolved model"
    );
    Ok(total)
}

/// Load and resolve a directory in one step
pub fn load_and_resolve(
    dir: &Path,
    config: &LoadConfig,
    parser: &ParserConfig,
) -> Result<(Model, Vec<ElementId>)> {
    let mut model = Model::new();
    let roots = load_directory(&mut model, dir, config, parser)?;
    resolve_all(&mut model, &roots)?;
    Ok((model, roots))
}
