//! HTTP client for the TSB API.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::response::{
    decode, ServicesEnvelope, SettingsEnvelope, TopologyEnvelope, TopologyRequest,
    TrafficGroupsEnvelope,
};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::debug;
use tsb_model::{Service, TimeWindow, TopologyResponse, TrafficGroup, TrafficSetting, TsbApi};

/// Number of body characters logged per response.
const BODY_SAMPLE_LEN: usize = 80;

/// TSB API client authenticating with HTTP basic auth.
pub struct TsbClient {
    config: ClientConfig,
    base_url: String,
    http: reqwest::Client,
}

impl TsbClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        let base_url = config.base_url();
        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let mut request = request
            .basic_auth(&self.config.username, Some(&self.config.password))
            .build()?;
        request
            .headers_mut()
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        let url = request.url().to_string();
        debug!("sending {} to {:?}", request.method(), url);

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("got {} body: {}", status, sample(&body));

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }
        Ok(body)
    }
}

impl TsbApi for TsbClient {
    type Error = Error;

    async fn fetch_topology(&self, window: &TimeWindow) -> Result<TopologyResponse> {
        let request = self
            .http
            .post(self.url("graphql"))
            .json(&TopologyRequest::new(window));
        let body = self.send(request).await?;
        decode::<TopologyEnvelope>("topology", &body)?.into_topology()
    }

    async fn fetch_services(&self) -> Result<Vec<Service>> {
        let path = format!("v2/organizations/{}/services", self.config.org);
        let body = self.send(self.http.get(self.url(&path))).await?;
        Ok(decode::<ServicesEnvelope>("services", &body)?.services)
    }

    async fn lookup_traffic_group(&self, service: &Service) -> Result<Option<TrafficGroup>> {
        let path = format!("v2/{}/groups", service.fqn);
        let body = self.send(self.http.get(self.url(&path))).await.map_err(|e| {
            debug!("failed to get service groups for {:?}: {}", service.fqn, e);
            e
        })?;
        Ok(decode::<TrafficGroupsEnvelope>("traffic groups", &body)?.into_first())
    }

    async fn fetch_traffic_setting(&self, group_fqn: &str) -> Result<Option<TrafficSetting>> {
        let path = format!("v2/{group_fqn}/settings");
        let body = self.send(self.http.get(self.url(&path))).await?;
        Ok(decode::<SettingsEnvelope>("traffic settings", &body)?.into_first())
    }
}

fn sample(body: &str) -> String {
    if body.chars().count() > BODY_SAMPLE_LEN {
        let head: String = body.chars().take(BODY_SAMPLE_LEN).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
