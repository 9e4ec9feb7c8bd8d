#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_header_name, validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// 連線到庫存後端所需的設定，CLI 與 TOML 最後都會合併成這個結構
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
}

impl ServiceSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: None,
            headers: HashMap::new(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ConfigProvider for ServiceSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

impl Validate for ServiceSettings {
    fn validate(&self) -> Result<()> {
        validate_url("service.base_url", &self.base_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("service.timeout_seconds", timeout, 1)?;
        }
        for name in self.headers.keys() {
            validate_header_name("service.headers", name)?;
        }
        Ok(())
    }
}
