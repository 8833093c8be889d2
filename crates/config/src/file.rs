use std::{
    io::Write,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::{Path, PathBuf},
};

use error_stack::{Report, Result, ResultExt};
use serde::{Deserialize, Serialize};
use url::Url;

pub const CONFIG_FILE_NAME: &str = "astra_heritage.toml";

pub const DEFAULT_CONFIG_FILE_TEXT: &str = r#"

# [general]
# debug = false
# log_timestamp = true

[socket]
public_api = "127.0.0.1:8501"

[advice]
model = "gpt-4o-mini"
# openai_api_url = "https://api.openai.com/v1"
# system_text = "You are a helpful financial advisor providing educational guidance. Be clear, concise, and actionable."
# temperature = 0.7
# max_tokens = 1000
# timeout_seconds = 60

# The secrets file has a single line:
# OPENAI_API_KEY = "sk-..."
# If the file or the key is missing, the environment variable is used.
# [secrets]
# file = "secrets.toml"
# env_var = "OPENAI_API_KEY"

# [assets]
# dir = "public"
# logo = "astraheritage-logo.jpg"
# founder_portraits = ["harsan.jpg", "andy.jpg"]

# [session]
# idle_timeout_minutes = 60
# cleanup_interval_seconds = 60

"#;

pub const DEFAULT_PUBLIC_API_PORT: u16 = 8501;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_TEXT: &str = "You are a helpful financial advisor providing educational guidance. Be clear, concise, and actionable.";
pub const DEFAULT_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

#[derive(thiserror::Error, Debug)]
pub enum ConfigFileError {
    #[error("Save config file failed")]
    Save,
    #[error("Save default")]
    SaveDefault,
    #[error("Not a directory")]
    NotDirectory,
    #[error("Load config file")]
    LoadConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub socket: SocketConfig,
    #[serde(default)]
    pub advice: AdviceConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl ConfigFile {
    pub fn load(dir: impl AsRef<Path>) -> Result<ConfigFile, ConfigFileError> {
        let config_string =
            ConfigFileUtils::load_string(dir, CONFIG_FILE_NAME, DEFAULT_CONFIG_FILE_TEXT)?;
        Self::parse(&config_string)
    }

    pub fn parse(config_string: &str) -> Result<ConfigFile, ConfigFileError> {
        toml::from_str(config_string).change_context(ConfigFileError::LoadConfig)
    }
}

pub struct ConfigFileUtils;

impl ConfigFileUtils {
    pub fn save_string(file_path: impl AsRef<Path>, text: &str) -> Result<(), ConfigFileError> {
        let mut file = std::fs::File::create(file_path).change_context(ConfigFileError::Save)?;
        file.write_all(text.as_bytes())
            .change_context(ConfigFileError::Save)?;
        Ok(())
    }

    pub fn join_dir_path_and_file_name(
        dir: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<PathBuf, ConfigFileError> {
        if !dir.as_ref().is_dir() {
            return Err(Report::new(ConfigFileError::NotDirectory));
        }
        let mut file_path = dir.as_ref().to_path_buf();
        file_path.push(file_name);
        Ok(file_path)
    }

    /// Read file from the directory. The default text is saved first
    /// if the file does not exist.
    pub fn load_string(
        dir: impl AsRef<Path>,
        file_name: &str,
        default: &str,
    ) -> Result<String, ConfigFileError> {
        let file_path = Self::join_dir_path_and_file_name(&dir, file_name)
            .change_context(ConfigFileError::LoadConfig)?;
        if !file_path.exists() {
            Self::save_string(&file_path, default).change_context(ConfigFileError::SaveDefault)?;
        }
        std::fs::read_to_string(&file_path).change_context(ConfigFileError::LoadConfig)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Log every HTTP request. Disabled by default.
    pub debug: Option<bool>,
    /// Write timestamp to log messages. Enabled by default.
    pub log_timestamp: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocketConfig {
    pub public_api: SocketAddr,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            public_api: SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::LOCALHOST,
                DEFAULT_PUBLIC_API_PORT,
            )),
        }
    }
}

/// Chat completion request settings for the financial advice.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub model: String,
    /// OpenAI compatible API base URL. Default is the OpenAI API.
    pub openai_api_url: Option<Url>,
    pub system_text: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// The advice request fails if the response does not arrive in time.
    pub timeout_seconds: u32,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            openai_api_url: None,
            system_text: DEFAULT_SYSTEM_TEXT.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// TOML file with `OPENAI_API_KEY` key.
    pub file: PathBuf,
    /// Environment variable which is read if the secrets file does
    /// not have the key.
    pub env_var: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("secrets.toml"),
            env_var: DEFAULT_API_KEY_ENV_VAR.to_string(),
        }
    }
}

/// Images shown on the pages. Missing files are replaced with
/// a placeholder glyph.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub dir: PathBuf,
    pub logo: String,
    /// Portraits in the same order as the leadership bios on the
    /// about page.
    pub founder_portraits: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public"),
            logo: "astraheritage-logo.jpg".to_string(),
            founder_portraits: vec!["harsan.jpg".to_string(), "andy.jpg".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions without requests for this long are removed.
    pub idle_timeout_minutes: u32,
    pub cleanup_interval_seconds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: 60,
            cleanup_interval_seconds: 60,
        }
    }
}
