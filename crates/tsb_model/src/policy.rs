//! Reachability policy objects.
//!
//! Two kinds are produced: an Istio `Sidecar` for traffic groups in
//! `DIRECT` mode and a TSB `TrafficSetting` for every other mode. Both are
//! emitted inside the same [`Object`] envelope.

use crate::fqn::{self, TsbMeta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API version of Istio networking resources.
pub const ISTIO_NETWORKING_API: &str = "networking.istio.io/v1beta1";
/// Kind of Istio sidecar resources.
pub const SIDECAR_KIND: &str = "Sidecar";
/// API version of TSB traffic resources.
pub const TRAFFIC_API: &str = "traffic.tsb.tetrate.io/v2";
/// Kind of TSB traffic setting resources.
pub const TRAFFIC_SETTING_KIND: &str = "TrafficSetting";

/// Hosts every generated policy starts with.
pub const BASE_HOSTS: [&str; 2] = ["istio-system/*", "xcp-multicluster/*"];

/// Name of generated sidecars.
pub const SIDECAR_NAME: &str = "reachability-sidecar";
/// Name of synthesized traffic settings.
pub const TRAFFIC_SETTING_NAME: &str = "reachability-setting";

/// Returns the host entry that admits every host of `namespace`.
pub fn namespace_host(namespace: &str) -> String {
    format!("{namespace}/*")
}

fn base_hosts() -> Vec<String> {
    BASE_HOSTS.iter().map(ToString::to_string).collect()
}

/// Kubernetes object metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubeMeta {
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
    /// Labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// An Istio `Sidecar` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidecar {
    /// Object metadata.
    pub metadata: KubeMeta,
    /// Sidecar spec.
    pub spec: SidecarSpec,
}

/// Spec of an Istio `Sidecar`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarSpec {
    /// Egress listeners.
    #[serde(default)]
    pub egress: Vec<EgressListener>,
}

/// An Istio egress listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressListener {
    /// Hosts in `namespace/dnsName` form.
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl Sidecar {
    /// Creates the reachability sidecar for `namespace`, seeded with [`BASE_HOSTS`].
    pub fn for_namespace(namespace: impl Into<String>, annotations: BTreeMap<String, String>) -> Self {
        Self {
            metadata: KubeMeta {
                name: SIDECAR_NAME.to_string(),
                namespace: namespace.into(),
                labels: BTreeMap::new(),
                annotations,
            },
            spec: SidecarSpec {
                egress: vec![EgressListener {
                    hosts: base_hosts(),
                }],
            },
        }
    }

    /// Hosts of the first egress listener.
    pub fn hosts(&self) -> &[String] {
        self.spec
            .egress
            .first()
            .map(|l| l.hosts.as_slice())
            .unwrap_or_default()
    }

    /// Appends a host to the first egress listener.
    pub fn push_host(&mut self, host: String) {
        match self.spec.egress.first_mut() {
            Some(listener) => listener.hosts.push(host),
            None => self.spec.egress.push(EgressListener { hosts: vec![host] }),
        }
    }
}

/// Reachability mode of a TSB traffic setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReachabilityMode {
    /// No mode set.
    #[default]
    Unset,
    /// Reach the own namespace only.
    Namespace,
    /// Reach the own traffic group.
    Group,
    /// Reach the own workspace.
    Workspace,
    /// Reach the whole cluster.
    Cluster,
    /// Reach the listed hosts.
    Custom,
}

impl ReachabilityMode {
    /// Returns true when no mode is set.
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

/// Reachability block of a TSB traffic setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachabilitySettings {
    /// Reachability mode.
    #[serde(default, skip_serializing_if = "ReachabilityMode::is_unset")]
    pub mode: ReachabilityMode,
    /// Reachable hosts.
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// A TSB `TrafficSetting`.
///
/// Only the fields reachability generation touches are modelled; every
/// other field of a fetched setting is kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficSetting {
    /// Fully-qualified setting name.
    #[serde(default)]
    pub fqn: String,
    /// Reachability block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachability: Option<ReachabilitySettings>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TrafficSetting {
    /// Synthesizes a setting for the group described by `meta`, seeded with [`BASE_HOSTS`].
    pub fn synthesize(meta: &TsbMeta) -> Self {
        Self {
            fqn: format!(
                "organizations/{}/tenants/{}/workspaces/{}/trafficgroups/{}/settings/{}",
                meta.organization, meta.tenant, meta.workspace, meta.group, TRAFFIC_SETTING_NAME
            ),
            reachability: Some(ReachabilitySettings {
                mode: ReachabilityMode::Unset,
                hosts: base_hosts(),
            }),
            extra: BTreeMap::new(),
        }
    }

    /// Setting name taken from the `settings` segment of the FQN.
    pub fn name(&self) -> &str {
        fqn::segment(&self.fqn, "settings").unwrap_or_default()
    }

    /// Reachability hosts, empty when there is no reachability block.
    pub fn hosts(&self) -> &[String] {
        self.reachability
            .as_ref()
            .map(|r| r.hosts.as_slice())
            .unwrap_or_default()
    }

    /// Reachability block, created empty if missing.
    pub fn reachability_mut(&mut self) -> &mut ReachabilitySettings {
        self.reachability.get_or_insert_with(ReachabilitySettings::default)
    }
}

/// A generated policy object.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyObject {
    /// Sidecar for a `DIRECT` mode traffic group.
    Sidecar(Sidecar),
    /// Traffic setting for a TSB-managed traffic group.
    TrafficSetting {
        /// Decomposed metadata of the governing traffic group.
        metadata: TsbMeta,
        /// The merged setting.
        setting: TrafficSetting,
    },
}

impl PolicyObject {
    /// API version of this object.
    pub const fn api_version(&self) -> &'static str {
        match self {
            Self::Sidecar(_) => ISTIO_NETWORKING_API,
            Self::TrafficSetting { .. } => TRAFFIC_API,
        }
    }

    /// Kind of this object.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Sidecar(_) => SIDECAR_KIND,
            Self::TrafficSetting { .. } => TRAFFIC_SETTING_KIND,
        }
    }

    /// Wraps the object in the generic envelope, serializing its spec.
    ///
    /// # Errors
    ///
    /// Returns an error if the spec cannot be serialized.
    pub fn into_object(self) -> serde_json::Result<Object> {
        let api_version = self.api_version().to_string();
        let kind = self.kind().to_string();
        let (metadata, spec) = match self {
            Self::Sidecar(sidecar) => (
                ObjectMetadata::Kube(sidecar.metadata),
                serde_json::to_value(&sidecar.spec)?,
            ),
            Self::TrafficSetting { metadata, setting } => {
                (ObjectMetadata::Tsb(metadata), serde_json::to_value(&setting)?)
            }
        };
        Ok(Object {
            api_version,
            kind,
            metadata,
            spec,
        })
    }
}

/// Metadata of an emitted object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ObjectMetadata {
    /// Kubernetes metadata (sidecars).
    Kube(KubeMeta),
    /// TSB metadata (traffic settings).
    Tsb(TsbMeta),
}

/// Generic envelope of an emitted policy object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    /// API version.
    pub api_version: String,
    /// Object kind.
    pub kind: String,
    /// Object metadata.
    pub metadata: ObjectMetadata,
    /// Serialized spec.
    pub spec: serde_json::Value,
}
