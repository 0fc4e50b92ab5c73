use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::forms::{CreateField, EditField};
use crate::normalize::RawRow;
use crate::status::Fetch;

pub type RowsResult = crux_http::Result<crux_http::Response<Vec<RawRow>>>;
pub type WriteResult = crux_http::Result<crux_http::Response<Vec<u8>>>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum Event {
    Noop,

    // Lifecycle
    Configure(Config),
    Mounted,
    Unmounted,
    RefreshRequested,

    // Table
    CountryFilterMenuToggled,
    CountryFilterToggled { country: String },
    CountryFilterCleared,
    NextPage,
    PreviousPage,
    PageSizeSelected { size: usize },

    // Edit dialog
    EditRequested { id: String },
    EditFieldChanged { field: EditField, value: String },
    EditCancelled,
    EditSubmitted,

    // Create dialog
    CreateOpened,
    CreateFieldChanged { field: CreateField, value: String },
    CreateCancelled,
    CreateSubmitted,

    // Effect callbacks, tagged with the generation they were issued under
    #[serde(skip)]
    RecordsFetched {
        generation: u64,
        fetch: Fetch,
        result: RowsResult,
    },
    #[serde(skip)]
    CountriesFetched { generation: u64, result: RowsResult },
    #[serde(skip)]
    RecordUpdated { generation: u64, result: WriteResult },
    #[serde(skip)]
    RecordCreated { generation: u64, result: WriteResult },
}

impl Default for Event {
    fn default() -> Self {
        Self::Noop
    }
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Configure(_) => "configure",
            Self::Mounted => "mounted",
            Self::Unmounted => "unmounted",
            Self::RefreshRequested => "refresh_requested",
            Self::CountryFilterMenuToggled => "country_filter_menu_toggled",
            Self::CountryFilterToggled { .. } => "country_filter_toggled",
            Self::CountryFilterCleared => "country_filter_cleared",
            Self::NextPage => "next_page",
            Self::PreviousPage => "previous_page",
            Self::PageSizeSelected { .. } => "page_size_selected",
            Self::EditRequested { .. } => "edit_requested",
            Self::EditFieldChanged { .. } => "edit_field_changed",
            Self::EditCancelled => "edit_cancelled",
            Self::EditSubmitted => "edit_submitted",
            Self::CreateOpened => "create_opened",
            Self::CreateFieldChanged { .. } => "create_field_changed",
            Self::CreateCancelled => "create_cancelled",
            Self::CreateSubmitted => "create_submitted",
            Self::RecordsFetched { .. } => "records_fetched",
            Self::CountriesFetched { .. } => "countries_fetched",
            Self::RecordUpdated { .. } => "record_updated",
            Self::RecordCreated { .. } => "record_created",
        }
    }

    /// Generation of an effect callback, `None` for user intents.
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        match self {
            Self::RecordsFetched { generation, .. }
            | Self::CountriesFetched { generation, .. }
            | Self::RecordUpdated { generation, .. }
            | Self::RecordCreated { generation, .. } => Some(*generation),
            _ => None,
        }
    }
}
