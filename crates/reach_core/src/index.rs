//! Topology node to service correlation.

use std::collections::HashMap;
use tracing::debug;
use tsb_model::{Service, TopologyNode};

/// Lookup from topology node id to registered service.
///
/// Built by joining node aggregation keys with the aggregation keys of
/// every service's metric sources. When two services share a key the one
/// listed last wins.
#[derive(Debug, Default)]
pub struct ServiceIndex<'a> {
    by_node: HashMap<String, &'a Service>,
}

impl<'a> ServiceIndex<'a> {
    /// Builds the index. Nodes whose key matches no service are left out.
    pub fn build(nodes: &[TopologyNode], services: &'a [Service]) -> Self {
        let mut by_key: HashMap<&str, &Service> = HashMap::new();
        for service in services {
            for key in service.aggregation_keys() {
                debug!("aggregation key {:?} has FQN {:?}", key, service.fqn);
                by_key.insert(key, service);
            }
        }

        let mut node_keys: HashMap<&str, &str> = HashMap::new();
        for node in nodes {
            debug!("node ID {:?} belongs to {:?}", node.id, node.aggregation_key);
            node_keys.insert(&node.id, &node.aggregation_key);
        }

        let mut by_node = HashMap::with_capacity(node_keys.len());
        for (id, key) in node_keys {
            if let Some(service) = by_key.get(key) {
                debug!("id {:?} maps to service {:?}", id, service.fqn);
                by_node.insert(id.to_string(), *service);
            } else {
                debug!("no service for key {:?}", key);
            }
        }

        Self { by_node }
    }

    /// Returns the service a node belongs to.
    pub fn resolve(&self, node_id: &str) -> Option<&'a Service> {
        self.by_node.get(node_id).copied()
    }

    /// Number of resolved nodes.
    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    /// Returns true if no node resolved.
    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsb_model::TopologyResponse;

    #[test]
    fn resolves_nodes_through_any_aggregation_key() {
        let topology = TopologyResponse::new()
            .with_node("n1", "svcA|ns-a|c1|-")
            .with_node("n2", "svcB");
        let services = vec![
            Service::new("organizations/o/services/svcA")
                .with_aggregation_key("svcA")
                .with_aggregation_key("svcA|ns-a|c1|-"),
            Service::new("organizations/o/services/svcB").with_aggregation_key("svcB"),
        ];

        let index = ServiceIndex::build(&topology.nodes, &services);
        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("n1").unwrap().fqn, "organizations/o/services/svcA");
        assert_eq!(index.resolve("n2").unwrap().fqn, "organizations/o/services/svcB");
    }

    #[test]
    fn unmatched_nodes_are_omitted() {
        let topology = TopologyResponse::new()
            .with_node("n1", "svcA")
            .with_node("n2", "unknown");
        let services = vec![Service::new("svcA").with_aggregation_key("svcA")];

        let index = ServiceIndex::build(&topology.nodes, &services);
        assert_eq!(index.len(), 1);
        assert!(index.resolve("n2").is_none());
        assert!(index.resolve("n3").is_none());
    }

    #[test]
    fn last_service_wins_on_shared_key() {
        let topology = TopologyResponse::new().with_node("n1", "shared");
        let services = vec![
            Service::new("first").with_aggregation_key("shared"),
            Service::new("second").with_aggregation_key("shared"),
        ];

        let index = ServiceIndex::build(&topology.nodes, &services);
        assert_eq!(index.resolve("n1").unwrap().fqn, "second");
    }

    #[test]
    fn empty_inputs_build_empty_index() {
        let index = ServiceIndex::build(&[], &[]);
        assert!(index.is_empty());
    }
}
