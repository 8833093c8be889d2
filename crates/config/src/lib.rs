#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

pub mod args;
pub mod file;
pub mod secrets;

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use args::ArgsConfig;
use error_stack::{Result, ResultExt};
use file::{AdviceConfig, AssetsConfig, ConfigFile};
use secrets::ApiKeySource;
use utils::ContextExt;

pub use self::file::ConfigFileError;

#[derive(thiserror::Error, Debug)]
pub enum GetConfigError {
    #[error("Get working directory error")]
    GetWorkingDir,
    #[error("File loading failed")]
    LoadFileError,
    #[error("Invalid configuration")]
    InvalidConfiguration,
}

#[derive(Debug, Clone)]
pub struct Config {
    file: ConfigFile,

    /// Semver version of the server.
    semver_version: String,

    /// Directory for resolving relative paths of the config file.
    config_dir: PathBuf,
    public_api: SocketAddr,
}

impl Config {
    /// Validate parsed config file.
    pub fn new(
        file: ConfigFile,
        config_dir: PathBuf,
        semver_version: String,
    ) -> Result<Self, GetConfigError> {
        validate_advice_config(&file.advice)?;

        if file.session.idle_timeout_minutes == 0 {
            return Err(GetConfigError::InvalidConfiguration.report())
                .attach_printable("Session idle timeout must be larger than zero");
        }

        if file.session.cleanup_interval_seconds == 0 {
            return Err(GetConfigError::InvalidConfiguration.report())
                .attach_printable("Session cleanup interval must be larger than zero");
        }

        for name in std::iter::once(&file.assets.logo).chain(&file.assets.founder_portraits) {
            if !is_plain_file_name(name) {
                return Err(GetConfigError::InvalidConfiguration.report())
                    .attach_printable(format!("Asset '{name}' is not a plain file name"));
            }
        }

        Ok(Self {
            public_api: file.socket.public_api,
            file,
            semver_version,
            config_dir,
        })
    }

    pub fn public_api(&self) -> SocketAddr {
        self.public_api
    }

    /// Debug mode enables HTTP request logging.
    pub fn debug_mode(&self) -> bool {
        self.file.general.debug.unwrap_or(false)
    }

    pub fn log_timestamp(&self) -> bool {
        self.file.general.log_timestamp.unwrap_or(true)
    }

    pub fn semver_version(&self) -> &str {
        &self.semver_version
    }

    pub fn advice(&self) -> &AdviceConfig {
        &self.file.advice
    }

    pub fn advice_timeout(&self) -> Duration {
        Duration::from_secs(self.file.advice.timeout_seconds.into())
    }

    pub fn api_key_source(&self) -> ApiKeySource {
        ApiKeySource::new(
            self.resolve_path(&self.file.secrets.file),
            self.file.secrets.env_var.clone(),
        )
    }

    pub fn assets(&self) -> &AssetsConfig {
        &self.file.assets
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.resolve_path(&self.file.assets.dir)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.file.session.idle_timeout_minutes) * 60)
    }

    pub fn session_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.file.session.cleanup_interval_seconds.into())
    }

    pub fn parsed_file(&self) -> &ConfigFile {
        &self.file
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }
}

/// Read config file from config directory given as argument or from
/// the current directory.
pub fn get_config(
    args_config: ArgsConfig,
    semver_version: String,
) -> Result<Config, GetConfigError> {
    let config_dir = match args_config.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().change_context(GetConfigError::GetWorkingDir)?,
    };

    let mut file_config =
        ConfigFile::load(&config_dir).change_context(GetConfigError::LoadFileError)?;

    if let Some(public_api) = args_config.public_api {
        file_config.socket.public_api = public_api;
    }

    Config::new(file_config, config_dir, semver_version)
}

fn validate_advice_config(config: &AdviceConfig) -> Result<(), GetConfigError> {
    if config.model.trim().is_empty() {
        return Err(GetConfigError::InvalidConfiguration.report())
            .attach_printable("Advice model name is empty");
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(GetConfigError::InvalidConfiguration.report()).attach_printable(format!(
            "Advice temperature {} is not in range [0, 2]",
            config.temperature
        ));
    }

    if config.max_tokens == 0 {
        return Err(GetConfigError::InvalidConfiguration.report())
            .attach_printable("Advice max_tokens must be larger than zero");
    }

    if config.timeout_seconds == 0 {
        return Err(GetConfigError::InvalidConfiguration.report())
            .attach_printable("Advice timeout must be larger than zero");
    }

    Ok(())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
