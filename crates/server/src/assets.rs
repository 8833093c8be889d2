//! Images shown on the pages.

use std::{io::ErrorKind, path::PathBuf};

use config::Config;
use error_stack::{Result, ResultExt};
use utils::ContextExt;

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("Asset not found")]
    NotFound,
    #[error("Asset reading failed")]
    Read,
}

pub struct Asset {
    pub content_type: mime::Mime,
    pub data: Vec<u8>,
}

/// Only file names listed in the config are served.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    logo: String,
    founder_portraits: Vec<String>,
}

impl AssetStore {
    pub fn new(dir: PathBuf, logo: String, founder_portraits: Vec<String>) -> Self {
        Self {
            dir,
            logo,
            founder_portraits,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.assets_dir(),
            config.assets().logo.clone(),
            config.assets().founder_portraits.clone(),
        )
    }

    /// Probe which configured images exist right now.
    pub async fn available(&self) -> AvailableAssets {
        let mut founder_portraits = Vec::with_capacity(self.founder_portraits.len());
        for name in &self.founder_portraits {
            founder_portraits.push(self.existing(name).await);
        }

        AvailableAssets {
            logo: self.existing(&self.logo).await,
            founder_portraits,
        }
    }

    pub async fn read(&self, name: &str) -> Result<Asset, AssetError> {
        if !self.is_known(name) {
            return Err(AssetError::NotFound.report());
        }

        let data = match tokio::fs::read(self.dir.join(name)).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AssetError::NotFound.report());
            }
            Err(e) => {
                return Err(e).change_context(AssetError::Read).attach_printable(name.to_string());
            }
        };

        Ok(Asset {
            content_type: content_type(name),
            data,
        })
    }

    fn is_known(&self, name: &str) -> bool {
        self.logo == name || self.founder_portraits.iter().any(|p| p == name)
    }

    async fn existing(&self, name: &str) -> Option<String> {
        match tokio::fs::metadata(self.dir.join(name)).await {
            Ok(metadata) if metadata.is_file() => Some(name.to_string()),
            _ => None,
        }
    }
}

/// Image file names which existed when [AssetStore::available] ran.
#[derive(Debug, Clone, Default)]
pub struct AvailableAssets {
    logo: Option<String>,
    founder_portraits: Vec<Option<String>>,
}

impl AvailableAssets {
    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    /// Portrait file name for the bio at `index`.
    pub fn founder_portrait(&self, index: usize) -> Option<&str> {
        self.founder_portraits
            .get(index)
            .and_then(|name| name.as_deref())
    }
}

fn content_type(name: &str) -> mime::Mime {
    let extension = name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
