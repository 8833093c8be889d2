//! API key lookup.
//!
//! The key is read again for every advice request so that it can be
//! added or rotated without a restart. It is never cached or logged.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

pub const API_KEY_SECRET_NAME: &str = "OPENAI_API_KEY";

#[derive(Deserialize)]
struct SecretsFile {
    #[serde(rename = "OPENAI_API_KEY")]
    openai_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiKeySource {
    secrets_file: PathBuf,
    env_var: String,
}

impl ApiKeySource {
    pub fn new(secrets_file: PathBuf, env_var: String) -> Self {
        Self {
            secrets_file,
            env_var,
        }
    }

    pub fn secrets_file(&self) -> &Path {
        &self.secrets_file
    }

    /// Secrets file value if it exists, environment variable otherwise.
    /// Blank values count as missing.
    pub fn read_api_key(&self) -> Option<String> {
        self.read_from_secrets_file()
            .or_else(|| non_blank(std::env::var(&self.env_var).ok()))
    }

    fn read_from_secrets_file(&self) -> Option<String> {
        let text = match std::fs::read_to_string(&self.secrets_file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(
                    "Reading secrets file {} failed: {}",
                    self.secrets_file.display(),
                    e.kind()
                );
                return None;
            }
        };

        // The parse error message could include file content.
        match toml::from_str::<SecretsFile>(&text) {
            Ok(file) => non_blank(file.openai_api_key),
            Err(_) => {
                warn!(
                    "Secrets file {} is not valid TOML",
                    self.secrets_file.display()
                );
                None
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;

    use super::*;

    /// Name of an environment variable which no test sets.
    fn unset_env_var() -> String {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        format!(
            "ASTRA_HERITAGE_TEST_UNSET_{}_{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        )
    }

    #[test]
    fn key_is_read_from_secrets_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("secrets.toml");
        std::fs::write(&file, "OPENAI_API_KEY = \" sk-test \"\n").unwrap();

        let source = ApiKeySource::new(file, unset_env_var());
        assert_eq!(source.read_api_key().as_deref(), Some("sk-test"));
    }

    #[test]
    fn missing_file_and_env_var_is_none() {
        let dir = TempDir::new().unwrap();
        let source = ApiKeySource::new(dir.path().join("secrets.toml"), unset_env_var());
        assert_eq!(source.read_api_key(), None);
    }

    #[test]
    fn blank_key_is_none() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("secrets.toml");
        std::fs::write(&file, "OPENAI_API_KEY = \"   \"\n").unwrap();

        let source = ApiKeySource::new(file, unset_env_var());
        assert_eq!(source.read_api_key(), None);
    }

    #[test]
    fn invalid_secrets_file_is_none() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("secrets.toml");
        std::fs::write(&file, "OPENAI_API_KEY = ").unwrap();

        let source = ApiKeySource::new(file, unset_env_var());
        assert_eq!(source.read_api_key(), None);
    }

    #[test]
    fn key_changes_are_seen_without_restart() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("secrets.toml");
        let source = ApiKeySource::new(file.clone(), unset_env_var());
        assert_eq!(source.read_api_key(), None);

        std::fs::write(&file, "OPENAI_API_KEY = \"sk-new\"\n").unwrap();
        assert_eq!(source.read_api_key().as_deref(), Some("sk-new"));
    }
}
