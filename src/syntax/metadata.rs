//! Grammar metadata tracking for ABI version compatibility
//!
//! Records which tree-sitter ABI version each installed grammar library was
//! compiled against, so outdated libraries are rebuilt instead of loaded.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// ABI version of the linked tree-sitter crate
pub const TREE_SITTER_ABI_VERSION: u32 = tree_sitter::LANGUAGE_VERSION as u32;

const METADATA_FILE: &str = "metadata.json";

/// Metadata for a single installed grammar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarInfo {
    /// ABI version the grammar was compiled with
    pub abi_version: u32,
    /// Unix timestamp of the install
    pub installed_at: u64,
}

/// Metadata store for all installed grammars
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GrammarMetadata {
    /// Map of grammar name to info
    pub grammars: HashMap<String, GrammarInfo>,
}

impl GrammarMetadata {
    /// Load metadata from a grammars directory; missing or corrupt files yield empty metadata
    pub fn load(grammars_dir: &Path) -> Self {
        let path = Self::metadata_path(grammars_dir);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };

        match serde_json::from_str(&content) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Ignoring unreadable grammar metadata {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save metadata into a grammars directory
    pub fn save(&self, grammars_dir: &Path) -> Result<()> {
        fs::create_dir_all(grammars_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::metadata_path(grammars_dir), content)?;
        Ok(())
    }

    fn metadata_path(grammars_dir: &Path) -> PathBuf {
        grammars_dir.join(METADATA_FILE)
    }

    /// Record that a grammar was installed with the current ABI
    pub fn record_install(&mut self, name: &str) {
        let installed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        self.grammars.insert(
            name.to_string(),
            GrammarInfo {
                abi_version: TREE_SITTER_ABI_VERSION,
                installed_at,
            },
        );
    }

    /// Check if a grammar needs reinstalling due to ABI mismatch
    pub fn needs_reinstall(&self, name: &str) -> bool {
        self.grammars
            .get(name)
            .is_some_and(|info| info.abi_version != TREE_SITTER_ABI_VERSION)
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.grammars.contains_key(name)
    }
}
