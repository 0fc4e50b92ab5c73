use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::forms::{CreateForm, EditForm};
use crate::normalize::{countries_of, country_names, normalize_rows, sample_records, RawRow};
use crate::status::{Fetch, LoadStatus, LoadTransition, SaveStatus, SaveTransition};
use crate::table::{FilterState, PageState};
use crate::AppResult;

/// Where a record's id came from. Local ids are random placeholders that the
/// server has never seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdOrigin {
    #[default]
    Server,
    Local,
}

/// A customer request in canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub id_origin: IdOrigin,
    pub name: String,
    pub gender: String,
    pub request_date: String,
    pub country: String,
}

/// Fields the edit dialog may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChanges {
    pub name: String,
    pub country: String,
}

impl Record {
    #[must_use]
    pub fn with_changes(&self, changes: &RecordChanges) -> Self {
        Self {
            name: changes.name.clone(),
            country: changes.country.clone(),
            ..self.clone()
        }
    }
}

/// Full-record body for `PUT /taxes/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub gender: &'a str,
    pub request_date: &'a str,
    pub country: &'a str,
}

impl<'a> From<&'a Record> for RecordPayload<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            id: &record.id,
            name: &record.name,
            gender: &record.gender,
            request_date: &record.request_date,
            country: &record.country,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Model {
    pub config: Config,

    // Table data
    pub records: Vec<Record>,
    pub using_fallback: bool,
    pub countries: Vec<String>,
    pub filter: FilterState,
    pub page: PageState,
    pub filter_menu_open: bool,

    // Request status
    pub load: LoadStatus,
    pub update: SaveStatus,
    pub create: SaveStatus,

    // Dialogs
    pub edit_dialog: Option<EditForm>,
    pub create_dialog: Option<CreateForm>,

    // Stale-response guard
    pub live: bool,
    pub generation: u64,
}

impl Default for Model {
    fn default() -> Self {
        let config = Config::default();
        let records = sample_records();
        let countries = countries_of(&records);
        Self {
            page: PageState::new(config.default_page_size),
            config,
            records,
            using_fallback: false,
            countries,
            filter: FilterState::default(),
            filter_menu_open: false,
            load: LoadStatus::default(),
            update: SaveStatus::default(),
            create: SaveStatus::default(),
            edit_dialog: None,
            create_dialog: None,
            live: false,
            generation: 0,
        }
    }
}

impl Model {
    pub fn mount(&mut self) {
        self.live = true;
        self.generation += 1;
        self.discard_view_state();
    }

    pub fn unmount(&mut self) {
        self.live = false;
        self.generation += 1;
        self.discard_view_state();
    }

    /// Responses from the previous generation will be dropped, so nothing
    /// else would settle these. Records and country options are kept.
    fn discard_view_state(&mut self) {
        self.load = LoadStatus::default();
        self.update = SaveStatus::default();
        self.create = SaveStatus::default();
        self.edit_dialog = None;
        self.create_dialog = None;
        self.filter_menu_open = false;
        self.filter.clear();
        self.page = PageState::new(self.config.default_page_size);
    }

    /// Whether a response issued under `generation` may still touch state.
    #[must_use]
    pub fn accepts(&self, generation: u64) -> bool {
        self.live && generation == self.generation
    }

    /// Applies a new config. Page size falls back to the new default.
    pub fn apply_config(&mut self, config: Config) {
        self.page = PageState::new(config.default_page_size);
        self.config = config;
    }

    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.page.reset();
    }

    pub fn begin_load(&mut self, fetch: Fetch) {
        self.load = std::mem::take(&mut self.load).next(LoadTransition::Started(fetch));
    }

    /// Stores a finished read. Any failure swaps in the sample rows so the
    /// table is never empty.
    pub fn finish_load(&mut self, fetch: Fetch, outcome: AppResult<Vec<RawRow>>) {
        let load = std::mem::take(&mut self.load);
        match outcome {
            Ok(rows) => {
                debug!(count = rows.len(), "records loaded");
                self.replace_records(normalize_rows(&rows));
                self.using_fallback = false;
                self.load = load.next(LoadTransition::Succeeded(fetch));
            }
            Err(e) => {
                warn!(error = %e, "records load failed, using sample rows");
                self.replace_records(sample_records());
                self.using_fallback = true;
                self.load = load.next(LoadTransition::Failed(fetch, e.message));
            }
        }
    }

    /// Stores the country reference list. On failure, or when the server
    /// list is empty, options are rebuilt from what is already known.
    pub fn finish_countries(&mut self, outcome: AppResult<Vec<RawRow>>) {
        match outcome {
            Ok(rows) => {
                let names = country_names(&rows);
                if names.is_empty() {
                    debug!("country list empty, keeping current options");
                } else {
                    self.countries = names;
                }
            }
            Err(e) => {
                warn!(error = %e, "country list failed, deriving from records");
                self.countries = countries_of(&self.records);
            }
        }
    }

    pub fn toggle_country(&mut self, country: &str) {
        self.filter.toggle(country);
        self.page.reset();
    }

    pub fn clear_country_filter(&mut self) {
        self.filter.clear();
        self.page.reset();
    }

    #[must_use]
    pub fn total_matching(&self) -> usize {
        self.records.iter().filter(|r| self.filter.matches(r)).count()
    }

    /// Opens the edit dialog for `id`. Refused while an update is pending,
    /// so its response can only close the dialog it was sent from.
    pub fn open_edit(&mut self, id: &str) -> bool {
        if self.update.in_flight {
            debug!(id, "update in flight, not opening another edit");
            return false;
        }
        match self.records.iter().find(|r| r.id == id) {
            Some(record) => {
                self.edit_dialog = Some(EditForm::open(record.clone()));
                self.transition_update(SaveTransition::Cleared);
                true
            }
            None => {
                warn!(id, "edit requested for unknown record");
                false
            }
        }
    }

    pub fn close_edit(&mut self) {
        self.edit_dialog = None;
    }

    pub fn transition_update(&mut self, transition: SaveTransition) {
        self.update = std::mem::take(&mut self.update).next(transition);
    }

    pub fn transition_create(&mut self, transition: SaveTransition) {
        self.create = std::mem::take(&mut self.create).next(transition);
    }

    /// Opens a fresh create form. An open form keeps its values, and nothing
    /// opens while a create is pending.
    pub fn open_create(&mut self, today: NaiveDate) {
        if self.create.in_flight {
            debug!("create in flight, not opening another form");
            return;
        }
        if self.create_dialog.is_none() {
            self.create_dialog = Some(CreateForm::open(&self.countries, today));
            self.transition_create(SaveTransition::Cleared);
        }
    }

    pub fn close_create(&mut self) {
        self.create_dialog = None;
    }
}
