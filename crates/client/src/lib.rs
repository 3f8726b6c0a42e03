//! Client for the jobs API of an IntelX instance.
//!
//! Build an [`IntelXConfig`], hand it to [`IntelXClient::new`], then call the
//! job endpoints through [`IntelXClient::jobs`]. Every call is a single HTTP
//! attempt; failures come back as [`IntelXError`] and are never retried.

pub mod client;
pub mod config;
pub mod error;
pub mod jobs;

pub use client::{IntelXClient, JSON_CONTENT_TYPE, SuccessResponse};
pub use config::{ConfigError, IntelXConfig};
pub use error::IntelXError;
pub use intelx_api_types as types;
pub use jobs::{JobService, PluginKind};
pub use reqwest::{Method, StatusCode};
