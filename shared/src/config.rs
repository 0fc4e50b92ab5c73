//! Runtime settings supplied by the shell.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! api_base_url = "https://685013d7e7c42cfd17974a33.mockapi.io"
//! default_page_size = 6
//! page_size_options = [4, 6, 8, 10]
//! ```

use serde::{Deserialize, Serialize};

use crate::capabilities::{Endpoints, ValidatedUrl};
use crate::{ConfigError, DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_base_url: String,
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoints()?;
        if self.default_page_size == 0 || self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(ConfigError::PageSizeNotOffered {
                size: self.default_page_size,
            });
        }
        Ok(())
    }

    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        ValidatedUrl::new(self.api_base_url.as_str())
            .map(Endpoints::new)
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: self.api_base_url.clone(),
                reason: e.to_string(),
            })
    }
}
