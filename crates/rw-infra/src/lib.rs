//! # rw-infra
//!
//! Adapters for the ports defined in `rw-core`: the reqwest based
//! registration API client and the TOML configuration loader.

pub mod config;
pub mod http;

pub use config::load_config;
pub use http::HttpRegistrationApi;
