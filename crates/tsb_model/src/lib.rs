//! Data model for reachgen.
//!
//! This crate provides:
//! - Topology and service registry types as returned by the TSB API
//! - FQN decomposition into TSB metadata and annotations
//! - Istio `Sidecar` and TSB `TrafficSetting` policy objects
//! - The [`TsbApi`] collaborator trait the core pipeline consumes
//!
//! # Example
//!
//! ```rust,ignore
//! use tsb_model::fqn;
//!
//! let meta = fqn::TsbMeta::from_fqn("organizations/o/tenants/t/workspaces/w/trafficgroups/g");
//! assert_eq!(meta.group, "g");
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod error;
pub mod fqn;
pub mod policy;
pub mod service;
pub mod topology;
pub mod window;

pub use api::TsbApi;
pub use error::{Error, Result};
pub use fqn::TsbMeta;
pub use policy::{
    KubeMeta, Object, ObjectMetadata, PolicyObject, ReachabilityMode, ReachabilitySettings,
    Sidecar, TrafficSetting,
};
pub use service::{ConfigMode, Service, ServiceDeployment, TrafficGroup};
pub use topology::{TopologyCall, TopologyNode, TopologyResponse};
pub use window::TimeWindow;
