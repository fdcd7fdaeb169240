//! One batch run from fetched topology to policy objects.

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::graph::GraphBuilder;
use serde::Serialize;
use tracing::{debug, info};
use tsb_model::{Object, TimeWindow, TsbApi};

/// Drives a single reachability generation run.
pub struct Pipeline<'c, C> {
    client: &'c C,
    verbose: bool,
}

impl<'c, C: TsbApi> Pipeline<'c, C> {
    /// Creates a pipeline over `client`.
    pub const fn new(client: &'c C) -> Self {
        Self {
            client,
            verbose: false,
        }
    }

    /// Dumps fetched inputs as JSON in debug logs.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Fetches topology and services for `window` and generates policy.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any stage; nothing is returned for
    /// a failed run.
    pub async fn run(&self, window: &TimeWindow) -> Result<Vec<Object>> {
        info!(
            "fetching topology from {} to {}",
            window.start_str(),
            window.end_str()
        );
        let topology = self
            .client
            .fetch_topology(window)
            .await
            .map_err(|e| Error::Topology(Box::new(e)))?;
        self.dump("topology", &topology);

        let services = self
            .client
            .fetch_services()
            .await
            .map_err(|e| Error::Services(Box::new(e)))?;
        self.dump("services", &services);

        info!(
            "correlating {} calls across {} services",
            topology.calls.len(),
            services.len()
        );
        let graph = GraphBuilder::new(self.client)
            .build(&topology, &services)
            .await?;

        let objects = Generator::new(self.client).generate(&graph).await?;
        info!("generated {} policy objects", objects.len());
        Ok(objects)
    }

    fn dump<T: Serialize>(&self, what: &str, value: &T) {
        if !self.verbose {
            return;
        }
        match serde_json::to_string_pretty(value) {
            Ok(json) => debug!("{}:\n{}", what, json),
            Err(e) => debug!("failed to marshal {} into json: {}", what, e),
        }
    }
}
