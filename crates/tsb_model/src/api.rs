//! The TSB collaborator contract consumed by the reachability pipeline.

use crate::policy::TrafficSetting;
use crate::service::{Service, TrafficGroup};
use crate::topology::TopologyResponse;
use crate::window::TimeWindow;

/// Remote policy and observability API.
///
/// The pipeline awaits every call before issuing the next one, so an
/// implementation never sees more than one outstanding request.
#[allow(async_fn_in_trait)]
pub trait TsbApi {
    /// Error returned by every call.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the global service topology observed during `window`.
    async fn fetch_topology(&self, window: &TimeWindow) -> Result<TopologyResponse, Self::Error>;

    /// Returns every registered service.
    async fn fetch_services(&self) -> Result<Vec<Service>, Self::Error>;

    /// Returns the traffic group governing `service`, if any.
    ///
    /// When several groups match, the first one is returned.
    async fn lookup_traffic_group(&self, service: &Service)
        -> Result<Option<TrafficGroup>, Self::Error>;

    /// Returns the existing traffic setting of the group, if any.
    async fn fetch_traffic_setting(&self, group_fqn: &str)
        -> Result<Option<TrafficSetting>, Self::Error>;
}
