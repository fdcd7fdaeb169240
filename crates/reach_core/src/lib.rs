//! Reachability policy generation for reachgen.
//!
//! The pipeline runs once over a fixed snapshot:
//! 1. [`index`] joins topology nodes to registered services
//! 2. [`namespace`] derives the namespaces each service runs in
//! 3. [`graph`] turns observed calls into a namespace-level call graph
//! 4. [`generator`] merges the graph into `Sidecar` or `TrafficSetting` objects
//! 5. [`output`] renders the objects as YAML or JSON documents
//!
//! # Example
//!
//! ```rust,ignore
//! use reach_core::{OutputFormat, Pipeline};
//!
//! let objects = Pipeline::new(&client).run(&window).await?;
//! print!("{}", reach_core::output::render(&objects, OutputFormat::Yaml)?);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod generator;
pub mod graph;
pub mod index;
pub mod namespace;
pub mod output;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use generator::Generator;
pub use graph::{Call, CallGraph, GraphBuilder};
pub use index::ServiceIndex;
pub use output::OutputFormat;
pub use pipeline::Pipeline;

/// Tracing target of diagnostics the user should see at any log level.
pub const DIAGNOSTIC_TARGET: &str = "reachgen::diagnostic";
