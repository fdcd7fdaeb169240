//! Connection configuration.

use crate::error::{Error, Result};

/// Organization queried when none is given.
pub const DEFAULT_ORG: &str = "tetrate";

/// Configuration for the TSB client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address without scheme, e.g. `tsb.example.com`.
    pub server: String,
    /// Organization to query.
    pub org: String,
    /// HTTP basic auth user.
    pub username: String,
    /// HTTP basic auth password.
    pub password: String,
    /// Skip certificate verification.
    pub insecure: bool,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            org: DEFAULT_ORG.to_string(),
            username: String::new(),
            password: String::new(),
            insecure: false,
            timeout_seconds: 30,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with default org, TLS verification and timeout.
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Normalizes the server address and checks required fields.
    ///
    /// Every request is issued over `https`, so a scheme given on input is
    /// stripped and both `https://tsb.example.com` and `tsb.example.com` work.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the server, username, password or
    /// org is empty.
    pub fn validate(mut self) -> Result<Self> {
        let server = self.server.trim();
        let server = server
            .strip_prefix("https://")
            .or_else(|| server.strip_prefix("http://"))
            .unwrap_or(server);
        self.server = server.trim_end_matches('/').to_string();

        if self.server.is_empty() {
            return Err(Error::InvalidConfig(
                "server address (-s or --server) can't be empty, need an address like \
                 'tsb.yourcorp.com' or an IP like '127.0.1.10'"
                    .to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(Error::InvalidConfig(
                "username (-u or --http-auth-user) can't be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(Error::InvalidConfig(
                "password (-p or --http-auth-password) can't be empty".to_string(),
            ));
        }
        if self.org.is_empty() {
            return Err(Error::InvalidConfig("org can't be empty".to_string()));
        }

        tracing::debug!("using TSB server {:?}", self.server);
        Ok(self)
    }

    /// Base URL every request is issued against.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.server)
    }
}
