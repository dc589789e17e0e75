//! Grammar installer for Tree-sitter
//!
//! Downloads and compiles Tree-sitter grammars from GitHub into shared
//! libraries. Tracks ABI versions and rebuilds outdated libraries.
//!
//! Everything here blocks; async callers run it on a blocking worker.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use super::languages::BuiltinLanguage;
use super::metadata::GrammarMetadata;
use crate::error::{HighlightError, Result};

/// Outcome of making sure a grammar library is usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallResult {
    Installed,
    AlreadyInstalled,
    Reinstalled, // Grammar was outdated and rebuilt
}

/// Grammar installer
pub struct GrammarInstaller {
    grammars_dir: PathBuf,
    cache_dir: PathBuf,
    metadata: Mutex<GrammarMetadata>,
    // Serializes installs so two renders never build the same library at once
    install_lock: Mutex<()>,
}

impl GrammarInstaller {
    /// Create an installer writing libraries into `grammars_dir`
    pub fn new(grammars_dir: impl Into<PathBuf>) -> Self {
        let grammars_dir = grammars_dir.into();
        Self {
            cache_dir: grammars_dir.join("sources"),
            metadata: Mutex::new(GrammarMetadata::load(&grammars_dir)),
            grammars_dir,
            install_lock: Mutex::new(()),
        }
    }

    /// `~/.config/lark/grammars`, shared with the lark editor
    pub fn default_grammars_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".config").join("lark").join("grammars"))
            .unwrap_or_else(|| PathBuf::from("grammars"))
    }

    pub fn grammars_dir(&self) -> &Path {
        &self.grammars_dir
    }

    /// Get the library path for a grammar
    pub fn library_path(&self, name: &str) -> PathBuf {
        #[cfg(target_os = "macos")]
        let ext = "dylib";
        #[cfg(target_os = "windows")]
        let ext = "dll";
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let ext = "so";

        self.grammars_dir.join(format!("lib{}.{}", name, ext))
    }

    pub fn is_installed(&self, lang: BuiltinLanguage) -> bool {
        self.library_path(lang.grammar_name()).exists()
    }

    /// Check if a grammar needs reinstalling due to ABI mismatch
    pub fn needs_reinstall(&self, lang: BuiltinLanguage) -> bool {
        self.metadata
            .lock()
            .map(|m| m.needs_reinstall(lang.grammar_name()))
            .unwrap_or(false)
    }

    /// Install a grammar if missing, rebuild it if its ABI is outdated
    pub fn ensure_installed(&self, lang: BuiltinLanguage) -> Result<InstallResult> {
        let _guard = self.install_lock.lock().unwrap_or_else(|e| e.into_inner());

        // Another caller may have finished the install while we waited
        if self.needs_reinstall(lang) {
            tracing::info!("Grammar {} has outdated ABI, reinstalling", lang.grammar_name());
            let _ = std::fs::remove_file(self.library_path(lang.grammar_name()));
            self.install_internal(lang)?;
            return Ok(InstallResult::Reinstalled);
        }

        if self.is_installed(lang) {
            return Ok(InstallResult::AlreadyInstalled);
        }

        tracing::info!("Installing grammar {} from {}", lang.grammar_name(), lang.grammar_repo());
        self.install_internal(lang)?;
        Ok(InstallResult::Installed)
    }

    fn install_internal(&self, lang: BuiltinLanguage) -> Result<()> {
        let name = lang.grammar_name();

        std::fs::create_dir_all(&self.grammars_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;

        // Tsx shares its repository with TypeScript
        let repo_dir = self.cache_dir.join(lang.grammar_repo().replace('/', "__"));
        self.sync_repository(lang, &repo_dir)?;

        let grammar_dir = match lang.grammar_subdir() {
            Some(subdir) => repo_dir.join(subdir),
            None => repo_dir.clone(),
        };

        // Regenerate the grammar to ensure ABI compatibility
        if let Err(e) = regenerate_grammar(&grammar_dir) {
            // Not fatal - try to compile with the checked-in parser.c
            tracing::warn!("Could not regenerate grammar {}: {}", name, e);
        }

        let src_dir = find_src_dir(&grammar_dir);
        if !src_dir.join("parser.c").exists() {
            return Err(HighlightError::install(
                name,
                format!("could not find parser.c under {}", grammar_dir.display()),
            ));
        }

        compile_grammar(&src_dir, &self.library_path(name))
            .map_err(|e| HighlightError::install(name, e))?;

        if let Ok(mut metadata) = self.metadata.lock() {
            metadata.record_install(name);
            if let Err(e) = metadata.save(&self.grammars_dir) {
                tracing::warn!("Failed to save grammar metadata: {}", e);
            }
        }

        tracing::info!("Installed grammar {} at {}", name, self.library_path(name).display());
        Ok(())
    }

    /// Clone the grammar repository, or pull if it is already cached
    fn sync_repository(&self, lang: BuiltinLanguage, repo_dir: &Path) -> Result<()> {
        let name = lang.grammar_name();
        let status = if repo_dir.exists() {
            Command::new("git")
                .args(["pull", "--depth=1"])
                .current_dir(repo_dir)
                .status()
        } else {
            let url = format!("https://github.com/{}.git", lang.grammar_repo());
            Command::new("git")
                .args(["clone", "--depth=1", &url])
                .arg(repo_dir)
                .status()
        };

        match status {
            Ok(s) if s.success() => Ok(()),
            Ok(s) => Err(HighlightError::install(
                name,
                format!("git exited with code {:?}", s.code()),
            )),
            Err(e) => Err(HighlightError::install(name, format!("failed to run git: {}", e))),
        }
    }
}

impl Default for GrammarInstaller {
    fn default() -> Self {
        Self::new(Self::default_grammars_dir())
    }
}

/// Regenerate parser.c with the tree-sitter CLI
fn regenerate_grammar(grammar_dir: &Path) -> std::result::Result<(), String> {
    let output = Command::new("tree-sitter")
        .arg("generate")
        .current_dir(grammar_dir)
        .output()
        .map_err(|e| format!("tree-sitter CLI not available: {}", e))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(format!(
            "tree-sitter generate failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ))
    }
}

/// Find the source directory containing parser.c
fn find_src_dir(grammar_dir: &Path) -> PathBuf {
    let standard = grammar_dir.join("src");
    if standard.join("parser.c").exists() {
        return standard;
    }

    // Some repos have it in a grammar subdirectory
    let grammar_subdir = grammar_dir.join("grammar").join("src");
    if grammar_subdir.join("parser.c").exists() {
        return grammar_subdir;
    }

    standard
}

/// Compile parser.c (plus scanner, if any) into a shared library
#[cfg(unix)]
fn compile_grammar(src_dir: &Path, lib_path: &Path) -> std::result::Result<(), String> {
    let parser_c = src_dir.join("parser.c");
    let scanner_c = src_dir.join("scanner.c");
    let scanner_cc = src_dir.join("scanner.cc");

    let mut cmd = Command::new("cc");
    cmd.args(["-shared", "-fPIC", "-O2", "-I"])
        .arg(src_dir)
        .arg(&parser_c);

    if scanner_c.exists() {
        cmd.arg(&scanner_c);
    } else if scanner_cc.exists() {
        cmd.arg(&scanner_cc).arg("-lstdc++");
    }

    let output = cmd
        .arg("-o")
        .arg(lib_path)
        .output()
        .map_err(|e| format!("Failed to run compiler: {}", e))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(format!(
            "Compilation failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ))
    }
}

#[cfg(not(unix))]
fn compile_grammar(_src_dir: &Path, _lib_path: &Path) -> std::result::Result<(), String> {
    Err("Grammar compilation is only supported on Unix. Please use WSL.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_lives_in_grammars_dir() {
        let dir = tempfile::tempdir().unwrap();
        let installer = GrammarInstaller::new(dir.path());
        let path = installer.library_path("rust");
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("librust."));
    }

    #[test]
    fn existing_library_counts_as_installed() {
        let dir = tempfile::tempdir().unwrap();
        let installer = GrammarInstaller::new(dir.path());
        assert!(!installer.is_installed(BuiltinLanguage::Go));

        std::fs::write(installer.library_path("go"), b"").unwrap();
        assert!(installer.is_installed(BuiltinLanguage::Go));
        assert_eq!(
            installer.ensure_installed(BuiltinLanguage::Go).unwrap(),
            InstallResult::AlreadyInstalled
        );
    }

    #[test]
    fn outdated_metadata_flags_reinstall() {
        let dir = tempfile::tempdir().unwrap();
        let mut metadata = GrammarMetadata::default();
        metadata.record_install("lua");
        if let Some(info) = metadata.grammars.get_mut("lua") {
            info.abi_version = 0;
        }
        metadata.save(dir.path()).unwrap();

        let installer = GrammarInstaller::new(dir.path());
        assert!(installer.needs_reinstall(BuiltinLanguage::Lua));
        assert!(!installer.needs_reinstall(BuiltinLanguage::Rust));
    }

    #[test]
    fn src_dir_prefers_standard_layout() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("grammar").join("src");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("parser.c"), b"").unwrap();
        assert_eq!(find_src_dir(dir.path()), nested);

        let standard = dir.path().join("src");
        std::fs::create_dir_all(&standard).unwrap();
        std::fs::write(standard.join("parser.c"), b"").unwrap();
        assert_eq!(find_src_dir(dir.path()), standard);
    }
}
