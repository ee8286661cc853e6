//! Isolated test environment with temp directory.

#![allow(dead_code)]

use super::{NotemakerCommand, TestNote};
use notemaker::vault::{Vault, VaultError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary notes directory.
///
/// The temp directory holds `notes/` (the vault) and `config/` (used as the
/// config home, so a developer's own config file never leaks into a test).
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    notes_dir: PathBuf,
    config_home: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let notes_dir = temp_dir.path().join("notes");
        let config_home = temp_dir.path().join("config");
        std::fs::create_dir(&notes_dir).expect("Failed to create notes directory");
        std::fs::create_dir(&config_home).expect("Failed to create config directory");
        Self {
            _temp_dir: temp_dir,
            notes_dir,
            config_home,
        }
    }

    /// Returns the path to the notes directory.
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Returns the directory used as the config home.
    pub fn config_home(&self) -> &Path {
        &self.config_home
    }

    /// Writes `notemaker/config.toml` under the isolated config home.
    pub fn write_config(&self, toml: &str) {
        let dir = self.config_home.join("notemaker");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        std::fs::write(dir.join("config.toml"), toml).expect("Failed to write config");
    }

    /// Adds a test note to the environment and returns its path.
    pub fn add_note(&self, test_note: &TestNote) -> PathBuf {
        self.write_file(&test_note.relative_path(), &test_note.content())
    }

    /// Opens the notes directory as a vault, indexing every note.
    pub fn open_vault(&self) -> Result<Vault, VaultError> {
        Vault::open(&self.notes_dir)
    }

    /// Creates a NotemakerCommand configured for this test environment.
    pub fn cmd(&self) -> NotemakerCommand {
        NotemakerCommand::new()
            .config_home(&self.config_home)
            .dir(&self.notes_dir)
    }

    /// Writes a file to the notes directory, creating parent directories.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.notes_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Reads a file from the notes directory.
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.notes_dir.join(name))
            .unwrap_or_else(|e| panic!("Failed to read {name}: {e}"))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemaker::infra::read_note;

    // ===========================================
    // Phase 1: TestEnv Foundation
    // ===========================================

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.notes_dir().is_dir(), "notes directory should exist");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.notes_dir().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], env.notes_dir().to_string_lossy());
    }

    // ===========================================
    // Phase 3: TestEnv Note Addition
    // ===========================================

    #[test]
    fn test_env_add_note_creates_parseable_file() {
        let env = TestEnv::new();
        let note = TestNote::new("Parseable Note")
            .label("integration")
            .body("# Test Content\n\nThis is a #test.");

        let path = env.add_note(&note);
        assert!(path.ends_with("parseable-note.md"));

        let parsed = read_note(&path).expect("Should read the note");
        let metadata = parsed.metadata.expect("Should have a header");
        assert_eq!(metadata.title(), Some("Parseable Note"));
        assert_eq!(metadata.labels(), vec!["integration"]);
        assert!(parsed.body.contains("# Test Content"));
    }

    // ===========================================
    // Phase 4: Vault
    // ===========================================

    #[test]
    fn test_env_open_vault_indexes_notes() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("First").body("#alpha"));
        env.add_note(&TestNote::new("Second").file("deep/second.md").body("#alpha #beta"));

        let vault = env.open_vault().expect("Should open vault");
        assert_eq!(
            vault.index().notes_with_tag("alpha"),
            vec!["deep/second.md", "first.md"]
        );
    }

    #[test]
    fn test_env_config_dir_is_hidden_from_vault() {
        let env = TestEnv::new();
        env.write_config("[autosave]\ndelay_ms = 1\n");
        let vault = env.open_vault().expect("Should open vault");
        assert!(vault.index().is_empty());
    }
}
