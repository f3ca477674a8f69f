//! Layered configuration for settings, model-wide defaults and annotations.
//!
//! Layers, lowest priority first:
//! 1. built-in defaults (everything unbounded, no annotations)
//! 2. YAML file, if given
//! 3. environment variables `QLIMITS__*`, `__` separating nested keys
//!    (`QLIMITS__SETTINGS__MAX_TOP=100`). Section and field names are
//!    case-insensitive; type and property names keep their case
//!    (`QLIMITS__MODEL__PROPERTIES__Customer__orders__MAX_TOP=10`).
//!
//! ```yaml
//! settings:
//!   max_top: 1000
//! defaults:
//!   max_top: 200
//! model:
//!   types:
//!     Order: { max_top: 50 }
//!   properties:
//!     Customer:
//!       orders: { max_top: 10 }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::value::Uncased;
use serde::{Deserialize, Serialize};

use crate::limits::{DefaultQuerySettings, ModelBoundLimits, ValidationSettings};
use crate::model::Model;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "QLIMITS__";

/// Configuration error for loading and model building
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to load limits configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid limits configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),
    #[error("annotated type name must not be empty")]
    EmptyTypeName,
    #[error("annotated property of type '{ty}' has an empty name")]
    EmptyPropertyName { ty: String },
}

/// Annotations as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Type name -> limits
    pub types: BTreeMap<String, ModelBoundLimits>,
    /// Declaring type name -> property name -> limits
    pub properties: BTreeMap<String, BTreeMap<String, ModelBoundLimits>>,
}

/// Everything the validators need, in one deserializable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub settings: ValidationSettings,
    pub defaults: DefaultQuerySettings,
    pub model: ModelConfig,
}

impl LimitsConfig {
    /// Load defaults, then the optional YAML file, then `QLIMITS__*` env vars.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingFile` if `path` is given but is not a file,
    /// `ConfigError::Load` if a layer cannot be read or has the wrong shape.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| Uncased::from(env_key_path(key.as_str()))),
        );
        Self::from_figment(&figment)
    }

    /// Extract from an already assembled figment.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        tracing::debug!(
            annotated_types = config.model.types.len(),
            annotated_properties = config.model.properties.values().map(BTreeMap::len).sum::<usize>(),
            "limits configuration loaded"
        );
        Ok(config)
    }

    /// Read the configuration from a JSON section embedded in a host's config.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidConfig` if the section has the wrong shape.
    pub fn from_json(section: &serde_json::Value) -> Result<Self, ConfigError> {
        Self::deserialize(section).map_err(ConfigError::InvalidConfig)
    }

    /// Turn the configured annotations into a [`Model`].
    ///
    /// # Errors
    /// Returns `ConfigError::EmptyTypeName` / `ConfigError::EmptyPropertyName`
    /// for blank identities.
    pub fn build_model(&self) -> Result<Model, ConfigError> {
        let mut builder = Model::builder();
        for (ty, limits) in &self.model.types {
            if ty.trim().is_empty() {
                return Err(ConfigError::EmptyTypeName);
            }
            builder = builder.annotate_type(ty.as_str(), *limits);
        }
        for (ty, props) in &self.model.properties {
            if ty.trim().is_empty() {
                return Err(ConfigError::EmptyTypeName);
            }
            for (prop, limits) in props {
                if prop.trim().is_empty() {
                    return Err(ConfigError::EmptyPropertyName { ty: ty.clone() });
                }
                builder = builder.annotate_property(ty.as_str(), prop.as_str(), *limits);
            }
        }
        Ok(builder.build())
    }
}

/// Translate an unprefixed env key (`MODEL__TYPES__Customer__MAX_TOP`) into a
/// figment path (`model.types.Customer.max_top`).
///
/// Every segment is lowercased except the type and property names under
/// `model`, which are matched against [`TypeRef`](crate::TypeRef) and
/// [`PropertyRef`](crate::PropertyRef) exactly.
fn env_key_path(key: &str) -> String {
    let segments: Vec<&str> = key.split("__").collect();
    let names = match segments.as_slice() {
        [section, map, ..] if section.eq_ignore_ascii_case("model") => {
            if map.eq_ignore_ascii_case("types") {
                1
            } else if map.eq_ignore_ascii_case("properties") {
                2
            } else {
                0
            }
        }
        _ => 0,
    };
    let field = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| {
            if (2..2 + names).contains(&idx) && idx < field {
                (*segment).to_owned()
            } else {
                segment.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
