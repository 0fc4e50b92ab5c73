use thiserror::Error;
use url::Url;

use crate::{COUNTRIES_PATH, RECORDS_PATH};

pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("{reason}")]
    Invalid { reason: String },
}

/// An absolute `http`/`https` URL with a host and no embedded credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    url: Url,
}

impl ValidatedUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, UrlError> {
        let url = url.into();
        let invalid = |reason: String| UrlError::Invalid { reason };

        if url.trim().is_empty() {
            return Err(invalid("URL cannot be empty".to_string()));
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(invalid(format!(
                "URL exceeds maximum length of {MAX_URL_LENGTH} bytes"
            )));
        }

        let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(invalid(format!(
                "invalid scheme '{scheme}', only 'http' and 'https' are allowed"
            )));
        }

        if parsed.host_str().is_none() {
            return Err(invalid("URL must have a host".to_string()));
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(invalid("credentials in URL are not allowed".to_string()));
        }

        Ok(Self { url: parsed })
    }

    /// Appends percent-encoded path segments, dropping a trailing slash.
    pub fn join_segments(&self, segments: &[&str]) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }
}

/// The dashboard's REST routes under one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: ValidatedUrl,
}

impl Endpoints {
    pub fn new(base: ValidatedUrl) -> Self {
        Self { base }
    }

    /// `GET` for the list, `POST` to create.
    pub fn records(&self) -> String {
        self.base.join_segments(&[RECORDS_PATH])
    }

    /// `PUT` target for a single record.
    pub fn record(&self, id: &str) -> String {
        self.base.join_segments(&[RECORDS_PATH, id])
    }

    pub fn countries(&self) -> String {
        self.base.join_segments(&[COUNTRIES_PATH])
    }
}
