use std::{
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the base directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "firestore-export.yaml";

const RAW_DIR: &str = "JSON files before firestrore format";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Every file location and setting a pipeline run uses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub inputs: Inputs,
    pub outputs: Outputs,
    pub geocoding: GeocodingConfig,
    pub text: TextConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Inputs {
    pub products: PathBuf,
    pub stores: PathBuf,
    pub store_prices: PathBuf,
    /// Optional product id -> keywords overrides.
    pub product_keywords: PathBuf,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            products: Path::new(RAW_DIR).join("cHAZe_global_products.json"),
            stores: Path::new(RAW_DIR).join("cHAZe_stores.json"),
            store_prices: Path::new(RAW_DIR).join("cHAZe_store_prices.json"),
            product_keywords: "firestore_product_keywords.json".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Outputs {
    pub retailers: PathBuf,
    pub products: PathBuf,
    pub stores: PathBuf,
    pub retailer_prices: PathBuf,
    /// Cleaned in place.
    pub discounts: PathBuf,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            retailers: "firestore_retailers.json".into(),
            products: "firestore_products.json".into(),
            stores: "firestore_stores.json".into(),
            retailer_prices: "firestore_retailer_prices.json".into(),
            discounts: "firestore_discounts.json".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocodingConfig {
    /// No key, no network calls.
    pub api_key: Option<String>,
    pub endpoint: String,
    /// Country bias passed to the geocoder.
    pub region: String,
    pub timeout_secs: u64,
    pub cache: PathBuf,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            region: "ch".to_string(),
            timeout_secs: 10,
            cache: "geocode_cache.json".into(),
        }
    }
}

impl GeocodingConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|x| !x.trim().is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Also strip accents, not just ligatures.
    pub strip_diacritics: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, else the default file in `base` if there
    /// is one, else the defaults; then anchors relative paths at `base`.
    pub fn discover(base: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let path = base.join(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(&path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.resolve(base))
    }

    pub fn resolve(mut self, base: &Path) -> Self {
        for path in [
            &mut self.inputs.products,
            &mut self.inputs.stores,
            &mut self.inputs.store_prices,
            &mut self.inputs.product_keywords,
            &mut self.outputs.retailers,
            &mut self.outputs.products,
            &mut self.outputs.stores,
            &mut self.outputs.retailer_prices,
            &mut self.outputs.discounts,
            &mut self.geocoding.cache,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
