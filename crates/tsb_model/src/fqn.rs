//! FQN decomposition.
//!
//! A TSB fully-qualified name is a slash-delimited path of alternating
//! key/value segments, e.g.
//! `organizations/tetrate/tenants/t1/workspaces/w1/trafficgroups/g1`.
//! Only aligned pairs are considered; a trailing unpaired segment is ignored
//! and nothing here ever fails.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotation key carrying the organization.
pub const ORGANIZATION_ANNOTATION: &str = "tsb.tetrate.io/organization";
/// Annotation key carrying the tenant.
pub const TENANT_ANNOTATION: &str = "tsb.tetrate.io/tenant";
/// Annotation key carrying the workspace.
pub const WORKSPACE_ANNOTATION: &str = "tsb.tetrate.io/workspace";
/// Annotation key carrying the traffic group.
pub const TRAFFIC_GROUP_ANNOTATION: &str = "tsb.tetrate.io/trafficGroup";

/// Iterates the aligned `(key, value)` pairs of an FQN.
pub fn pairs(fqn: &str) -> impl Iterator<Item = (&str, &str)> {
    let parts: Vec<&str> = fqn.split('/').collect();
    let mut pairs = Vec::with_capacity(parts.len() / 2);
    for pair in parts.chunks_exact(2) {
        pairs.push((pair[0], pair[1]));
    }
    pairs.into_iter()
}

/// Returns every value that follows `key` in the FQN.
pub fn values<'a>(fqn: &'a str, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    pairs(fqn).filter(move |(k, _)| *k == key).map(|(_, v)| v)
}

/// Returns the first value that follows `key` in the FQN.
pub fn segment<'a>(fqn: &'a str, key: &str) -> Option<&'a str> {
    pairs(fqn).find(|(k, _)| *k == key).map(|(_, v)| v)
}

/// TSB object metadata.
///
/// Used both as the metadata of a traffic group returned by the API and as
/// the metadata emitted for `TrafficSetting` objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsbMeta {
    /// Object name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Organization the object belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organization: String,
    /// Tenant the object belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tenant: String,
    /// Workspace the object belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub workspace: String,
    /// Traffic group the object belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
}

impl TsbMeta {
    /// Decomposes an FQN into organization, tenant, workspace and group.
    ///
    /// Fields whose key does not appear stay empty.
    pub fn from_fqn(fqn: &str) -> Self {
        let mut meta = Self::default();
        for (key, value) in pairs(fqn) {
            match key {
                "organizations" => meta.organization = value.to_string(),
                "tenants" => meta.tenant = value.to_string(),
                "workspaces" => meta.workspace = value.to_string(),
                "trafficgroups" => meta.group = value.to_string(),
                _ => {}
            }
        }
        tracing::debug!("metadata for {:?}: {:?}", fqn, meta);
        meta
    }

    /// Sets the object name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Decomposes an FQN into `tsb.tetrate.io/*` annotations.
pub fn annotations_from_fqn(fqn: &str) -> BTreeMap<String, String> {
    let mut annotations = BTreeMap::new();
    for (key, value) in pairs(fqn) {
        let annotation = match key {
            "organizations" => ORGANIZATION_ANNOTATION,
            "tenants" => TENANT_ANNOTATION,
            "workspaces" => WORKSPACE_ANNOTATION,
            "trafficgroups" => TRAFFIC_GROUP_ANNOTATION,
            _ => continue,
        };
        annotations.insert(annotation.to_string(), value.to_string());
    }
    tracing::debug!("annotations for {:?}: {:?}", fqn, annotations);
    annotations
}
