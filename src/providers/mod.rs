//! Supported provider families.
//!
//! Each provider owns one section of the configuration tree, named by
//! [`Provider::key`]. Providers are disabled unless the stack configuration
//! sets `<key>.enabled` to a truthy value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::StackConfig;
use crate::error::Error;
use crate::value::ConfigValue;

/// A provisioning target supported by the configuration schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    OpenStack,
    Kubernetes,
}

impl Provider {
    /// Every supported provider, in display order.
    pub const ALL: [Provider; 5] = [
        Provider::Aws,
        Provider::Azure,
        Provider::Gcp,
        Provider::OpenStack,
        Provider::Kubernetes,
    ];

    /// The configuration section this provider reads from.
    pub fn key(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
            Provider::OpenStack => "openstack",
            Provider::Kubernetes => "kubernetes",
        }
    }

    /// Human-facing name for status output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Aws => "AWS",
            Provider::Azure => "Azure",
            Provider::Gcp => "GCP",
            Provider::OpenStack => "OpenStack",
            Provider::Kubernetes => "Kubernetes",
        }
    }

    /// The defaults block merged in for this provider.
    ///
    /// Providers ship disabled with one conventional locality default so a
    /// stack file only has to flip `enabled` to get going.
    pub fn default_block(&self) -> ConfigValue {
        let specific = match self {
            Provider::Aws => ("region", "us-west-2"),
            Provider::Azure => ("location", "eastus"),
            Provider::Gcp => ("region", "us-central1"),
            Provider::OpenStack => ("region", "RegionOne"),
            Provider::Kubernetes => ("context", "default"),
        };
        ConfigValue::mapping([
            ("enabled", ConfigValue::Bool(false)),
            (specific.0, ConfigValue::from(specific.1)),
        ])
    }

    /// Whether the stack configuration enables this provider.
    pub fn enabled_in(&self, config: &StackConfig) -> bool {
        config.provider_enabled(*self)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "azure" => Ok(Provider::Azure),
            "gcp" | "google" => Ok(Provider::Gcp),
            "openstack" => Ok(Provider::OpenStack),
            "kubernetes" | "k8s" => Ok(Provider::Kubernetes),
            other => Err(Error::UnknownProvider(other.to_string())),
        }
    }
}
