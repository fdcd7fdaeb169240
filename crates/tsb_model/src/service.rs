//! Service registry and traffic group types.

use crate::fqn::TsbMeta;
use serde::{Deserialize, Serialize};

/// A service registered in TSB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Fully-qualified service name.
    pub fqn: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// One entry per metric source; each carries an aggregation key.
    #[serde(default)]
    pub metrics: Vec<ServiceMetric>,
    /// Canonical service name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub canonical_name: String,
    /// SPIFFE identities of the service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spiffe_ids: Vec<String>,
    /// Deployments of the service, one per cluster/namespace instance.
    #[serde(default)]
    pub service_deployments: Vec<ServiceDeployment>,
}

/// A metric source of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetric {
    /// Join key shared with topology nodes.
    pub aggregation_key: String,
}

/// A deployment record of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDeployment {
    /// Deployment FQN; encodes the namespace among other segments.
    pub fqn: String,
    /// Where the deployment was discovered.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
}

impl Service {
    /// Creates a service with the given FQN and no metrics or deployments.
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            ..Self::default()
        }
    }

    /// Adds a metric source with the given aggregation key.
    #[must_use]
    pub fn with_aggregation_key(mut self, key: impl Into<String>) -> Self {
        self.metrics.push(ServiceMetric {
            aggregation_key: key.into(),
        });
        self
    }

    /// Adds a deployment with the given FQN.
    #[must_use]
    pub fn with_deployment(mut self, fqn: impl Into<String>) -> Self {
        self.service_deployments.push(ServiceDeployment {
            fqn: fqn.into(),
            source: String::new(),
        });
        self
    }

    /// Iterates every aggregation key of the service.
    pub fn aggregation_keys(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.aggregation_key.as_str())
    }
}

/// How a traffic group's configuration is authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConfigMode {
    /// Configuration is authored directly as Istio resources.
    Direct,
    /// Configuration is managed by TSB; carries the raw mode name.
    Bridged(String),
}

impl ConfigMode {
    /// Returns true for `DIRECT`.
    pub const fn is_direct(&self) -> bool {
        matches!(self, Self::Direct)
    }
}

impl Default for ConfigMode {
    fn default() -> Self {
        Self::Bridged("BRIDGED".to_string())
    }
}

impl From<String> for ConfigMode {
    fn from(mode: String) -> Self {
        if mode == "DIRECT" {
            Self::Direct
        } else {
            Self::Bridged(mode)
        }
    }
}

impl From<&str> for ConfigMode {
    fn from(mode: &str) -> Self {
        Self::from(mode.to_string())
    }
}

impl From<ConfigMode> for String {
    fn from(mode: ConfigMode) -> Self {
        match mode {
            ConfigMode::Direct => "DIRECT".to_string(),
            ConfigMode::Bridged(mode) => mode,
        }
    }
}

/// The governance unit of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficGroup {
    /// Fully-qualified group name.
    pub fqn: String,
    /// Config mode of the group.
    #[serde(default)]
    pub config_mode: ConfigMode,
    /// Group metadata as returned by the API.
    #[serde(default)]
    pub metadata: TsbMeta,
}

impl TrafficGroup {
    /// Creates a traffic group, deriving its metadata from the FQN.
    pub fn new(fqn: impl Into<String>, config_mode: impl Into<ConfigMode>) -> Self {
        let fqn = fqn.into();
        let metadata = TsbMeta::from_fqn(&fqn);
        Self {
            fqn,
            config_mode: config_mode.into(),
            metadata,
        }
    }
}
