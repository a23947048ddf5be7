//! Core runtime configuration.
//!
//! This module defines configuration that is resolved once at process startup and then
//! passed into the registry and its store. Nothing in the core reads environment
//! variables itself; the binaries read them and hand the raw values to the helpers here.

use crate::constants::DEFAULT_DATA_DIR;
use crate::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which duplicate rules the registry enforces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationPolicy {
    /// One observation per patient and type, and type codes unique across both kinds.
    #[default]
    Strict,
    /// Repeated observations allowed, and type codes scoped to their own kind.
    Permissive,
}

impl ObservationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ObservationPolicy::Strict => "strict",
            ObservationPolicy::Permissive => "permissive",
        }
    }
}

impl std::fmt::Display for ObservationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObservationPolicy {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ObservationPolicy::Strict),
            "permissive" => Ok(ObservationPolicy::Permissive),
            other => Err(RegistryError::InvalidInput(format!(
                "unknown observation policy '{other}' (expected 'strict' or 'permissive')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    policy: ObservationPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(data_dir: PathBuf, policy: ObservationPolicy) -> RegistryResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(RegistryError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }

        Ok(Self { data_dir, policy })
    }

    /// Build a configuration from raw environment values.
    ///
    /// Missing or blank values fall back to the defaults.
    pub fn from_env_values(
        data_dir: Option<String>,
        policy: Option<String>,
    ) -> RegistryResult<Self> {
        Self::new(
            data_dir_from_env_value(data_dir),
            policy_from_env_value(policy)?,
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn policy(&self) -> ObservationPolicy {
        self.policy
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the data directory from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Parse the observation policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`ObservationPolicy::Strict`].
pub fn policy_from_env_value(value: Option<String>) -> RegistryResult<ObservationPolicy> {
    let parsed = non_blank(value)
        .map(|v| v.parse::<ObservationPolicy>())
        .transpose()?;

    Ok(parsed.unwrap_or_default())
}
