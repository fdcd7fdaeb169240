//! Wire envelopes of TSB API responses.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tsb_model::{Service, TimeWindow, TopologyResponse, TrafficGroup, TrafficSetting};

/// GraphQL query for the global topology.
pub const TOPOLOGY_QUERY: &str = "query ListNodesAndEdges($duration: Duration!) {topo: getGlobalTopology(duration: $duration) { nodes {id ,name, type, isReal } calls { id, source, sourceComponents, target, targetComponents, detectPoints } } }";

/// Body of the topology GraphQL request.
#[derive(Debug, Serialize)]
pub struct TopologyRequest {
    query: &'static str,
    variables: TopologyVariables,
}

#[derive(Debug, Serialize)]
struct TopologyVariables {
    duration: Duration,
}

#[derive(Debug, Serialize)]
struct Duration {
    start: String,
    end: String,
    step: &'static str,
}

impl TopologyRequest {
    /// Builds the request for the given window, stepped by day.
    pub fn new(window: &TimeWindow) -> Self {
        Self {
            query: TOPOLOGY_QUERY,
            variables: TopologyVariables {
                duration: Duration {
                    start: window.start_str(),
                    end: window.end_str(),
                    step: "DAY",
                },
            },
        }
    }
}

/// GraphQL response envelope of the topology query.
#[derive(Debug, Deserialize)]
pub struct TopologyEnvelope {
    #[serde(default)]
    data: Option<TopologyData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct TopologyData {
    #[serde(default)]
    topo: TopologyResponse,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl TopologyEnvelope {
    /// Extracts the topology.
    ///
    /// # Errors
    ///
    /// Returns `Error::GraphQl` if the server reported query errors.
    pub fn into_topology(self) -> Result<TopologyResponse> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GraphQl(messages.join("; ")));
        }
        Ok(self.data.map(|d| d.topo).unwrap_or_default())
    }
}

/// Response of the list-services endpoint.
#[derive(Debug, Deserialize)]
pub struct ServicesEnvelope {
    /// Registered services.
    #[serde(default)]
    pub services: Vec<Service>,
}

/// Response of the service group lookup endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficGroupsEnvelope {
    /// Matching traffic groups.
    #[serde(default)]
    pub traffic_groups: Vec<TrafficGroup>,
}

impl TrafficGroupsEnvelope {
    /// First matching group, if any.
    pub fn into_first(self) -> Option<TrafficGroup> {
        self.traffic_groups.into_iter().next()
    }
}

/// Response of the list-settings endpoint of a traffic group.
#[derive(Debug, Deserialize)]
pub struct SettingsEnvelope {
    /// Settings of the group.
    #[serde(default)]
    pub settings: Vec<TrafficSetting>,
}

impl SettingsEnvelope {
    /// First setting, if any.
    pub fn into_first(self) -> Option<TrafficSetting> {
        self.settings.into_iter().next()
    }
}

/// Decodes a JSON body, tagging failures with `what`.
///
/// # Errors
///
/// Returns `Error::Decode` if the body is not valid JSON for `T`.
pub fn decode<T: for<'de> Deserialize<'de>>(what: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| Error::Decode { what, source })
}
