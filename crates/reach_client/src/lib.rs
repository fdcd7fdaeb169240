//! TSB API client for reachgen.
//!
//! This crate provides:
//! - An HTTP implementation of [`tsb_model::TsbApi`]
//! - Connection configuration and validation
//! - Wire envelopes of the TSB REST and GraphQL responses
//!
//! # Example
//!
//! ```rust,ignore
//! use reach_client::{ClientConfig, TsbClient};
//!
//! let client = TsbClient::new(ClientConfig::new("tsb.example.com", "admin", "secret"))?;
//! let services = client.fetch_services().await?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::TsbClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
