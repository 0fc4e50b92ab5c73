// lib.rs - Customer requests dashboard core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod forms;
pub mod model;
pub mod normalize;
pub mod status;
pub mod table;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app::{App, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use config::Config;
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{IdOrigin, Model, Record};

pub const PLACEHOLDER: &str = "—";
pub const DEFAULT_API_BASE_URL: &str = "https://685013d7e7c42cfd17974a33.mockapi.io";
pub const RECORDS_PATH: &str = "taxes";
pub const COUNTRIES_PATH: &str = "countries";
pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const PAGE_SIZE_OPTIONS: &[usize] = &[4, 6, 8, 10];
pub const SKELETON_ROWS: usize = 4;
pub const GENDER_OPTIONS: &[&str] = &["Male", "Female"];
pub const DEFAULT_GENDER: &str = "Male";
pub const FALLBACK_ALERT: &str = "Could not load live data. Showing fallback entries instead.";
pub const EMPTY_TABLE_MESSAGE: &str = "No requests match this view.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Status,
    Serialization,
    Deserialization,
    Validation,
    Config,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Status => "HTTP_STATUS_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::Config => "CONFIG_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    #[must_use]
    pub fn from_status(status: u16) -> Self {
        Self::new(ErrorKind::Status, format!("Request failed: {status}")).with_status(status)
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network | ErrorKind::Status | ErrorKind::Validation => self.message.clone(),
            ErrorKind::Serialization | ErrorKind::Deserialization => {
                "The server sent data that could not be read.".into()
            }
            ErrorKind::Config => "The dashboard is misconfigured.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status: {status})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

/// Local checks that block a submission before it reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    NameRequired,
    #[error("Country is required.")]
    CountryRequired,
    #[error("Gender is required.")]
    GenderRequired,
    #[error("Request date is required.")]
    RequestDateRequired,
    #[error("This record has not been saved to the server yet.")]
    UnsavedRecord,
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("default page size {size} is not one of the page size options")]
    PageSizeNotOffered { size: usize },
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Config, e.to_string())
    }
}
