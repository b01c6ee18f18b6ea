//! The `FilterConfiguration` document that selects packages, channels and
//! per-channel version ranges.

use std::path::Path;

use fbc_util::errors::FbcError;
use serde::{Deserialize, Serialize};

pub const FILTER_CONFIGURATION_KIND: &str = "FilterConfiguration";
pub const FILTER_CONFIGURATION_API_VERSION: &str = "olm.operatorframework.io/v1";

/// Parsed filter configuration. Package and channel order is preserved and
/// determines the order in which filtering runs and warnings are emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfiguration {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub packages: Vec<PackageFilterSpec>,
}

/// Per-package filter settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFilterSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelFilterSpec>,
}

/// Per-channel filter settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelFilterSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_range: Option<String>,
}

impl FilterConfiguration {
    /// A configuration with the expected kind and apiVersion.
    pub fn new(packages: Vec<PackageFilterSpec>) -> Self {
        Self {
            kind: FILTER_CONFIGURATION_KIND.to_string(),
            api_version: FILTER_CONFIGURATION_API_VERSION.to_string(),
            packages,
        }
    }

    /// Load and validate a configuration file (YAML or JSON).
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FbcError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content)
    }

    /// Parse and validate a configuration document.
    pub fn parse(content: &str) -> miette::Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| FbcError::Config {
            message: format!("Failed to parse configuration: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the kind/apiVersion discriminator and that every entry is named.
    pub fn validate(&self) -> Result<(), FbcError> {
        if self.kind != FILTER_CONFIGURATION_KIND
            || self.api_version != FILTER_CONFIGURATION_API_VERSION
        {
            return Err(FbcError::Config {
                message: format!(
                    "expected kind {FILTER_CONFIGURATION_KIND} and apiVersion \
                     {FILTER_CONFIGURATION_API_VERSION}, got {:?}/{:?}",
                    self.kind, self.api_version
                ),
            });
        }
        for (i, pkg) in self.packages.iter().enumerate() {
            if pkg.name.trim().is_empty() {
                return Err(FbcError::Config {
                    message: format!("packages[{i}] has no name"),
                });
            }
            for (j, ch) in pkg.channels.iter().enumerate() {
                if ch.name.trim().is_empty() {
                    return Err(FbcError::Config {
                        message: format!("packages[{i}].channels[{j}] of {:?} has no name", pkg.name),
                    });
                }
            }
        }
        Ok(())
    }
}

impl PackageFilterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_default_channel(mut self, channel: impl Into<String>) -> Self {
        self.default_channel = Some(channel.into());
        self
    }

    pub fn with_channel(mut self, channel: ChannelFilterSpec) -> Self {
        self.channels.push(channel);
        self
    }

    /// The default-channel override, treating an empty string as unset.
    pub fn default_channel_override(&self) -> Option<&str> {
        self.default_channel.as_deref().filter(|s| !s.is_empty())
    }

    /// Names of the allowed channels, in configuration order.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }
}

impl ChannelFilterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_range: None,
        }
    }

    pub fn with_range(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_range: Some(range.into()),
        }
    }

    /// The version range expression, treating an empty string as unset.
    pub fn range(&self) -> Option<&str> {
        self.version_range
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
