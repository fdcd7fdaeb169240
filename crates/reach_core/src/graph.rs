//! Namespace-level call graph.

use crate::error::{Error, Result};
use crate::index::ServiceIndex;
use crate::namespace::namespaces;
use crate::DIAGNOSTIC_TARGET;
use tracing::{debug, warn};
use tsb_model::{Service, TopologyResponse, TrafficGroup, TsbApi};

/// One observed call between two registered services.
#[derive(Debug, Clone, PartialEq)]
pub struct Call<'a> {
    /// Calling service.
    pub source_service: &'a Service,
    /// Namespaces the calling service runs in.
    pub source_namespaces: Vec<String>,
    /// Traffic group governing the calling service. Calls without one are
    /// kept in the graph but produce no policy.
    pub source_traffic_group: Option<TrafficGroup>,
    /// Called service.
    pub target_service: &'a Service,
    /// Namespaces the called service runs in.
    pub target_namespaces: Vec<String>,
}

/// Calls in topology edge order. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallGraph<'a> {
    /// The calls.
    pub calls: Vec<Call<'a>>,
}

impl<'a> CallGraph<'a> {
    /// Number of calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns true if there are no calls.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Iterates the calls.
    pub fn iter(&self) -> std::slice::Iter<'_, Call<'a>> {
        self.calls.iter()
    }
}

impl<'g, 'a> IntoIterator for &'g CallGraph<'a> {
    type Item = &'g Call<'a>;
    type IntoIter = std::slice::Iter<'g, Call<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.iter()
    }
}

/// Builds a [`CallGraph`] from a topology and the service list.
pub struct GraphBuilder<'c, C> {
    client: &'c C,
}

impl<'c, C: TsbApi> GraphBuilder<'c, C> {
    /// Creates a builder that looks up traffic groups through `client`.
    pub const fn new(client: &'c C) -> Self {
        Self { client }
    }

    /// Correlates every topology call to registered services.
    ///
    /// Calls with an endpoint that matches no service are skipped. A
    /// calling service without a traffic group is reported and its call is
    /// kept ungoverned.
    ///
    /// # Errors
    ///
    /// Returns `Error::TrafficGroupLookup` as soon as one lookup fails; the
    /// calls resolved so far are discarded.
    pub async fn build<'a>(
        &self,
        topology: &TopologyResponse,
        services: &'a [Service],
    ) -> Result<CallGraph<'a>> {
        let index = ServiceIndex::build(&topology.nodes, services);
        let mut graph = CallGraph::default();

        for edge in &topology.calls {
            debug!("processing call {}", edge.id);

            let Some(source_service) = index.resolve(&edge.source) else {
                debug!("no service for node {}", edge.source);
                continue;
            };
            let Some(target_service) = index.resolve(&edge.target) else {
                debug!("no service for node {}", edge.target);
                continue;
            };
            debug!(
                "computed source => target: {} => {}",
                source_service.fqn, target_service.fqn
            );

            let source_traffic_group = self
                .client
                .lookup_traffic_group(source_service)
                .await
                .map_err(|e| Error::TrafficGroupLookup {
                    service: source_service.fqn.clone(),
                    source: Box::new(e),
                })?;
            if source_traffic_group.is_none() {
                warn!(
                    target: DIAGNOSTIC_TARGET,
                    "no trafficgroup found for source service {:?}, skipping...",
                    source_service.fqn
                );
            }

            graph.calls.push(Call {
                source_service,
                source_namespaces: namespaces(source_service),
                source_traffic_group,
                target_service,
                target_namespaces: namespaces(target_service),
            });
        }

        debug!("graph built with {} calls", graph.len());
        Ok(graph)
    }
}
