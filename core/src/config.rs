//! Client configuration.
//!
//! `ClientConfig` is what an application stores or reads from its
//! environment to build a `RequestClient`: the base URL, default options and
//! an optional token for the `Authentication` header.

use serde::{Deserialize, Serialize};

use crate::options::RequestOptions;

pub const BASE_URL_VAR: &str = "API_BASE_URL";
pub const TOKEN_VAR: &str = "API_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub options: RequestOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `API_BASE_URL` and `API_TOKEN` from the process environment.
    /// Missing variables leave the defaults in place.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(BASE_URL_VAR).unwrap_or_default(),
            options: RequestOptions::default(),
            token: lookup(TOKEN_VAR).filter(|t| !t.is_empty()),
        }
    }
}
