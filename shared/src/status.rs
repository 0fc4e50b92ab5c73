//! Loading and saving flags as explicit state records.
//!
//! Each status moves only through [`LoadStatus::next`] / [`SaveStatus::next`],
//! which are pure `(state, transition) -> state` functions.

use serde::{Deserialize, Serialize};

/// How a read was started. Background reads keep the table on screen and
/// only raise the refresh indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fetch {
    Foreground,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTransition {
    Started(Fetch),
    Succeeded(Fetch),
    Failed(Fetch, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStatus {
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
}

impl LoadStatus {
    #[must_use]
    pub fn next(self, transition: LoadTransition) -> Self {
        match transition {
            LoadTransition::Started(fetch) => Self {
                loading: self.loading || fetch == Fetch::Foreground,
                refreshing: self.refreshing || fetch == Fetch::Background,
                ..self
            },
            LoadTransition::Succeeded(fetch) => Self {
                error: None,
                ..self.settle(fetch)
            },
            LoadTransition::Failed(fetch, message) => Self {
                error: Some(message),
                ..self.settle(fetch)
            },
        }
    }

    fn settle(self, fetch: Fetch) -> Self {
        match fetch {
            Fetch::Foreground => Self {
                loading: false,
                ..self
            },
            Fetch::Background => Self {
                refreshing: false,
                ..self
            },
        }
    }

}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTransition {
    Started,
    Succeeded,
    Failed(String),
    /// Drops a shown error. A pending request keeps its flag until it settles.
    Cleared,
}

/// Status of a single mutation kind (create or update).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStatus {
    pub in_flight: bool,
    pub error: Option<String>,
}

impl SaveStatus {
    #[must_use]
    pub fn next(self, transition: SaveTransition) -> Self {
        match transition {
            SaveTransition::Started => Self {
                in_flight: true,
                error: None,
            },
            SaveTransition::Succeeded => Self::default(),
            SaveTransition::Cleared => Self { error: None, ..self },
            SaveTransition::Failed(message) => Self {
                in_flight: false,
                error: Some(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreground_load_round_trip() {
        let status = LoadStatus::default().next(LoadTransition::Started(Fetch::Foreground));
        assert!(status.loading);
        assert!(!status.refreshing);

        let status = status.next(LoadTransition::Succeeded(Fetch::Foreground));
        assert_eq!(status, LoadStatus::default());
    }

    #[test]
    fn background_failure_keeps_error_and_clears_flag() {
        let status = LoadStatus::default()
            .next(LoadTransition::Started(Fetch::Background))
            .next(LoadTransition::Failed(Fetch::Background, "Request failed: 500".into()));
        assert!(!status.refreshing);
        assert_eq!(status.error.as_deref(), Some("Request failed: 500"));
    }

    #[test]
    fn starting_a_load_keeps_previous_error() {
        let status = LoadStatus {
            error: Some("boom".into()),
            ..LoadStatus::default()
        }
        .next(LoadTransition::Started(Fetch::Background));
        assert_eq!(status.error.as_deref(), Some("boom"));
        assert!(status.refreshing);
    }

    #[test]
    fn flags_are_independent() {
        let status = LoadStatus::default()
            .next(LoadTransition::Started(Fetch::Foreground))
            .next(LoadTransition::Started(Fetch::Background))
            .next(LoadTransition::Succeeded(Fetch::Background));
        assert!(status.loading);
        assert!(!status.refreshing);
    }

    #[test]
    fn save_status_transitions() {
        let status = SaveStatus {
            in_flight: false,
            error: Some("old".into()),
        }
        .next(SaveTransition::Started);
        assert!(status.in_flight);
        assert!(status.error.is_none());

        let failed = status.next(SaveTransition::Failed("Request failed: 404".into()));
        assert!(!failed.in_flight);
        assert_eq!(failed.error.as_deref(), Some("Request failed: 404"));

        assert_eq!(failed.next(SaveTransition::Cleared), SaveStatus::default());
    }

    #[test]
    fn clearing_keeps_a_pending_request() {
        let status = SaveStatus::default()
            .next(SaveTransition::Started)
            .next(SaveTransition::Cleared);
        assert!(status.in_flight);

        let status = status.next(SaveTransition::Succeeded);
        assert_eq!(status, SaveStatus::default());
    }
}
