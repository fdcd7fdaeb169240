//! Namespace resolution from service deployments.

use tsb_model::{fqn, Service};

/// Returns the namespaces `service` is deployed into.
///
/// Every value following a `namespaces` key in a deployment FQN is
/// returned in deployment order. Duplicates are kept; destinations are
/// deduplicated during generation.
pub fn namespaces(service: &Service) -> Vec<String> {
    service
        .service_deployments
        .iter()
        .flat_map(|deployment| fqn::values(&deployment.fqn, "namespaces"))
        .map(ToString::to_string)
        .collect()
}
