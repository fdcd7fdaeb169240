//! In-memory [`TsbApi`] used by pipeline tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tsb_model::{
    Service, TimeWindow, TopologyResponse, TrafficGroup, TrafficSetting, TsbApi,
};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// Canned TSB answers keyed by service FQN and group FQN.
#[derive(Default)]
pub struct FakeTsb {
    topology: TopologyResponse,
    services: Vec<Service>,
    groups: HashMap<String, TrafficGroup>,
    settings: HashMap<String, TrafficSetting>,
    failing_lookups: HashSet<String>,
    failing_settings: HashSet<String>,
    fail_topology: bool,
    fail_services: bool,
    pub lookups: RefCell<Vec<String>>,
    pub setting_fetches: RefCell<Vec<String>>,
}

impl FakeTsb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topology(mut self, topology: TopologyResponse) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_group(mut self, service: &Service, group: TrafficGroup) -> Self {
        self.groups.insert(service.fqn.clone(), group);
        self
    }

    pub fn with_setting(mut self, group_fqn: &str, setting: TrafficSetting) -> Self {
        self.settings.insert(group_fqn.to_string(), setting);
        self
    }

    pub fn failing_lookup(mut self, service: &Service) -> Self {
        self.failing_lookups.insert(service.fqn.clone());
        self
    }

    pub fn failing_setting(mut self, group_fqn: &str) -> Self {
        self.failing_settings.insert(group_fqn.to_string());
        self
    }

    pub fn failing_topology(mut self) -> Self {
        self.fail_topology = true;
        self
    }

    pub fn failing_services(mut self) -> Self {
        self.fail_services = true;
        self
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub const fn topology(&self) -> &TopologyResponse {
        &self.topology
    }
}

impl TsbApi for FakeTsb {
    type Error = FakeError;

    async fn fetch_topology(&self, _window: &TimeWindow) -> Result<TopologyResponse, FakeError> {
        if self.fail_topology {
            return Err(FakeError("topology unavailable".to_string()));
        }
        Ok(self.topology.clone())
    }

    async fn fetch_services(&self) -> Result<Vec<Service>, FakeError> {
        if self.fail_services {
            return Err(FakeError("service registry unavailable".to_string()));
        }
        Ok(self.services.clone())
    }

    async fn lookup_traffic_group(&self, service: &Service) -> Result<Option<TrafficGroup>, FakeError> {
        self.lookups.borrow_mut().push(service.fqn.clone());
        if self.failing_lookups.contains(&service.fqn) {
            return Err(FakeError(format!("lookup failed for {}", service.fqn)));
        }
        Ok(self.groups.get(&service.fqn).cloned())
    }

    async fn fetch_traffic_setting(&self, group_fqn: &str) -> Result<Option<TrafficSetting>, FakeError> {
        self.setting_fetches.borrow_mut().push(group_fqn.to_string());
        if self.failing_settings.contains(group_fqn) {
            return Err(FakeError(format!("settings failed for {group_fqn}")));
        }
        Ok(self.settings.get(group_fqn).cloned())
    }
}

/// One event recorded by [`CapturedEvents`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

/// Tracing layer recording events per target.
#[derive(Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<(String, CapturedEvent)>>>);

impl CapturedEvents {
    /// Records events emitted on the current thread until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn at_target(&self, target: &str) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.0.lock().unwrap().push((
            metadata.target().to_string(),
            CapturedEvent {
                level: *metadata.level(),
                message: visitor.0,
            },
        ));
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// FQN of traffic group `name` in the test workspace.
pub fn group_fqn(name: &str) -> String {
    format!("organizations/tetrate/tenants/t1/workspaces/w1/trafficgroups/{name}")
}

/// Service `name` with aggregation key `name`, deployed once per namespace.
pub fn service(name: &str, namespaces: &[&str]) -> Service {
    namespaces.iter().fold(
        Service::new(format!("organizations/tetrate/services/{name}")).with_aggregation_key(name),
        |service, ns| {
            service.with_deployment(format!(
                "organizations/tetrate/clusters/c1/namespaces/{ns}/services/{name}"
            ))
        },
    )
}

pub fn window() -> TimeWindow {
    TimeWindow::parse("2024-01-01", "2024-01-06").unwrap()
}
