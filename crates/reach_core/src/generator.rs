//! Reachability policy generation.
//!
//! Each governed call is dispatched on its traffic group's config mode:
//! - `DIRECT` groups get one Istio `Sidecar` per source namespace
//! - every other mode merges into the group's TSB `TrafficSetting`, fetched
//!   from the server once per group and synthesized when none exists
//!
//! One [`SeenDestinations`] record spans both modes for the whole pass, so a
//! destination merged for a source namespace under one mode is skipped under
//! the other.

use crate::error::{Error, Result};
use crate::graph::{Call, CallGraph};
use crate::DIAGNOSTIC_TARGET;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};
use tsb_model::fqn::{annotations_from_fqn, TsbMeta};
use tsb_model::policy::namespace_host;
use tsb_model::{
    Object, PolicyObject, ReachabilityMode, Sidecar, TrafficGroup, TrafficSetting, TsbApi,
};

/// Destination namespaces already merged, per source namespace.
#[derive(Debug, Default)]
pub struct SeenDestinations {
    seen: HashMap<String, HashSet<String>>,
}

impl SeenDestinations {
    /// Records `dest` for `source`. Returns false if it was already recorded.
    pub fn record(&mut self, source: &str, dest: &str) -> bool {
        self.seen
            .entry(source.to_string())
            .or_default()
            .insert(dest.to_string())
    }
}

/// Policy state accumulated over one generation pass.
///
/// Keyed by namespace for sidecars and by traffic group FQN for traffic
/// settings and their metadata; ordered maps keep the output stable.
#[derive(Debug, Default)]
pub struct Accumulator {
    sidecars: BTreeMap<String, Sidecar>,
    settings: BTreeMap<String, TrafficSetting>,
    metadata: BTreeMap<String, TsbMeta>,
    seen: SeenDestinations,
}

impl Accumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a call governed by a `DIRECT` mode group into sidecars.
    pub fn merge_direct(&mut self, call: &Call<'_>, group: &TrafficGroup) {
        let annotations = annotations_from_fqn(&group.fqn);

        for ns in &call.source_namespaces {
            debug!("source namespace: {}", ns);
            let sidecar = self.sidecars.entry(ns.clone()).or_insert_with(|| {
                debug!("new sidecar for namespace {}", ns);
                Sidecar::for_namespace(ns.clone(), annotations.clone())
            });

            for dest in &call.target_namespaces {
                if !self.seen.record(ns, dest) {
                    debug!("dest {:?} already exists for ns {:?}", dest, ns);
                    continue;
                }
                debug!("first time found ns {:?} for src {:?}", dest, ns);
                let host = namespace_host(dest);
                if !sidecar.hosts().contains(&host) {
                    sidecar.push_host(host);
                }
            }
        }
    }

    /// Converts the accumulated state into policy objects.
    ///
    /// Sidecars come first ordered by namespace, then traffic settings
    /// ordered by group FQN.
    pub fn into_policies(self) -> Vec<PolicyObject> {
        let Self {
            sidecars,
            settings,
            mut metadata,
            ..
        } = self;

        let mut policies = Vec::with_capacity(sidecars.len() + settings.len());
        policies.extend(sidecars.into_values().map(PolicyObject::Sidecar));
        for (group_fqn, setting) in settings {
            let metadata = metadata
                .remove(&group_fqn)
                .unwrap_or_else(|| TsbMeta::from_fqn(&group_fqn))
                .with_name(setting.name());
            policies.push(PolicyObject::TrafficSetting { metadata, setting });
        }
        policies
    }
}

/// Generates reachability policy from a [`CallGraph`].
pub struct Generator<'c, C> {
    client: &'c C,
}

impl<'c, C: TsbApi> Generator<'c, C> {
    /// Creates a generator that fetches existing traffic settings through `client`.
    pub const fn new(client: &'c C) -> Self {
        Self { client }
    }

    /// Generates policy objects wrapped in their output envelopes.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching a traffic setting fails or a spec
    /// cannot be serialized. No objects are returned in either case.
    pub async fn generate(&self, graph: &CallGraph<'_>) -> Result<Vec<Object>> {
        let policies = self.policies(graph).await?;
        debug!("total results: {}", policies.len());

        policies
            .into_iter()
            .map(|policy| {
                let kind = policy.kind();
                policy
                    .into_object()
                    .map_err(|source| Error::Spec { kind, source })
            })
            .collect()
    }

    /// Generates the typed policy objects.
    ///
    /// Calls without a traffic group are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::TrafficSettingFetch` if fetching a traffic setting fails.
    pub async fn policies(&self, graph: &CallGraph<'_>) -> Result<Vec<PolicyObject>> {
        let mut acc = Accumulator::new();
        debug!("generating policy for {} calls", graph.len());

        for call in graph {
            let Some(group) = &call.source_traffic_group else {
                continue;
            };
            debug!(
                "processing call {} => {} under {:?}",
                call.source_service.fqn, call.target_service.fqn, group.fqn
            );

            if group.config_mode.is_direct() {
                acc.merge_direct(call, group);
            } else {
                let meta = TsbMeta::from_fqn(&group.fqn);
                acc.metadata.insert(group.fqn.clone(), meta.clone());
                self.merge_bridged(&mut acc, call, group, &meta).await?;
            }
        }

        Ok(acc.into_policies())
    }

    async fn merge_bridged(
        &self,
        acc: &mut Accumulator,
        call: &Call<'_>,
        group: &TrafficGroup,
        meta: &TsbMeta,
    ) -> Result<()> {
        for ns in &call.source_namespaces {
            debug!("source namespace: {}", ns);
            let setting = match acc.settings.entry(group.fqn.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let fetched = self
                        .client
                        .fetch_traffic_setting(&group.fqn)
                        .await
                        .map_err(|e| Error::TrafficSettingFetch {
                            group: group.fqn.clone(),
                            source: Box::new(e),
                        })?;
                    let setting = fetched.unwrap_or_else(|| {
                        debug!("no traffic setting for {:?}, synthesizing one", group.fqn);
                        TrafficSetting::synthesize(meta)
                    });
                    debug!("got settings {:?} for namespace {:?}", setting.fqn, ns);
                    entry.insert(setting)
                }
            };
            merge_into_setting(&mut acc.seen, setting, ns, call, group);
        }
        Ok(())
    }
}

/// Merges the destinations of `call` reached from `ns` into `setting`.
fn merge_into_setting(
    seen: &mut SeenDestinations,
    setting: &mut TrafficSetting,
    ns: &str,
    call: &Call<'_>,
    group: &TrafficGroup,
) {
    for dest in &call.target_namespaces {
        if !seen.record(ns, dest) {
            debug!("dest {:?} already exists for ns {:?}", dest, ns);
            continue;
        }
        debug!("first time found ns {:?} for src {:?}", dest, ns);

        let reachability = setting.reachability_mut();
        if !reachability.mode.is_unset() && reachability.mode != ReachabilityMode::Custom {
            warn!(
                target: DIAGNOSTIC_TARGET,
                "traffic group {:?} has reachability mode {:?} instead of CUSTOM; hosts are merged but may not apply",
                group.fqn, reachability.mode
            );
        }
        let host = namespace_host(dest);
        if !reachability.hosts.contains(&host) {
            reachability.hosts.push(host);
        }
    }
}
