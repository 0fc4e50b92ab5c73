//! The Crux app: request orchestration in `update`, view derivation in `view`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capabilities::Capabilities;
use crate::event::Event;
use crate::model::{IdOrigin, Model, RecordPayload};
use crate::normalize::{format_date, gender_badge, GenderBadge, RawRow};
use crate::status::{Fetch, SaveTransition};
use crate::table::{self, PageWindow};
use crate::{
    AppError, AppResult, ErrorKind, ValidationError, EMPTY_TABLE_MESSAGE, FALLBACK_ALERT,
    GENDER_OPTIONS, SKELETON_ROWS,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub gender_badge: GenderBadge,
    pub request_date: String,
    pub country: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryOption {
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationView {
    pub page_index: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub window: PageWindow,
    pub can_previous: bool,
    pub can_next: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditDialogView {
    pub id: String,
    pub name: String,
    pub country: String,
    pub country_options: Vec<String>,
    pub saving: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDialogView {
    pub name: String,
    pub country: String,
    pub gender: String,
    pub request_date: String,
    pub country_options: Vec<String>,
    pub gender_options: Vec<String>,
    pub saving: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub rows: Vec<RowView>,
    pub skeleton_rows: usize,
    pub empty_message: Option<String>,
    pub pagination: PaginationView,
    pub filter_open: bool,
    pub filter_active: bool,
    pub country_options: Vec<CountryOption>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub using_fallback: bool,
    pub alert: Option<String>,
    pub load_error: Option<String>,
    pub edit_dialog: Option<EditDialogView>,
    pub create_dialog: Option<CreateDialogView>,
}

/// Splits a finished request into its body or a classified error.
fn outcome<T>(result: crux_http::Result<crux_http::Response<T>>) -> AppResult<Option<T>> {
    let mut response = result.map_err(|e| AppError::network(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::from_status(status.into()));
    }
    Ok(response.take_body())
}

fn rows_outcome(result: crux_http::Result<crux_http::Response<Vec<RawRow>>>) -> AppResult<Vec<RawRow>> {
    outcome(result)?.ok_or_else(|| AppError::new(ErrorKind::Deserialization, "empty response body"))
}

#[derive(Default)]
pub struct App;

impl App {
    fn load_all(model: &mut Model, caps: &Capabilities, fetch: Fetch) {
        model.begin_load(fetch);
        let url = match model.config.endpoints() {
            Ok(endpoints) => endpoints.records(),
            Err(e) => {
                model.finish_load(fetch, Err(e.into()));
                return;
            }
        };

        let generation = model.generation;
        info!(%url, ?fetch, generation, "loading records");
        caps.http
            .get(url)
            .expect_json::<Vec<RawRow>>()
            .send(move |result| Event::RecordsFetched {
                generation,
                fetch,
                result,
            });
    }

    fn load_country_options(model: &mut Model, caps: &Capabilities) {
        let url = match model.config.endpoints() {
            Ok(endpoints) => endpoints.countries(),
            Err(e) => {
                model.finish_countries(Err(e.into()));
                return;
            }
        };

        let generation = model.generation;
        info!(%url, generation, "loading country options");
        caps.http
            .get(url)
            .expect_json::<Vec<RawRow>>()
            .send(move |result| Event::CountriesFetched { generation, result });
    }

    fn update_record(model: &mut Model, caps: &Capabilities) {
        if model.update.in_flight {
            debug!("update already in flight, ignoring submit");
            return;
        }
        let Some(dialog) = &model.edit_dialog else {
            return;
        };
        let Some(changes) = dialog.submission() else {
            debug!("edit form incomplete, ignoring submit");
            return;
        };
        if dialog.record.id_origin == IdOrigin::Local {
            let error = AppError::from(ValidationError::UnsavedRecord);
            model.transition_update(SaveTransition::Failed(error.user_facing_message()));
            return;
        }

        let record = dialog.record.with_changes(&changes);
        let url = match model.config.endpoints() {
            Ok(endpoints) => endpoints.record(&record.id),
            Err(e) => {
                let error = AppError::from(e);
                model.transition_update(SaveTransition::Failed(error.user_facing_message()));
                return;
            }
        };

        let generation = model.generation;
        match caps.http.put(&url).body_json(&RecordPayload::from(&record)) {
            Ok(request) => {
                info!(%url, id = %record.id, generation, "updating record");
                model.transition_update(SaveTransition::Started);
                request.send(move |result| Event::RecordUpdated { generation, result });
            }
            Err(e) => {
                warn!(error = %e, "update body could not be serialized");
                let error = AppError::new(ErrorKind::Serialization, e.to_string());
                model.transition_update(SaveTransition::Failed(error.user_facing_message()));
            }
        }
    }

    fn create_record(model: &mut Model, caps: &Capabilities) {
        if model.create.in_flight {
            debug!("create already in flight, ignoring submit");
            return;
        }
        let Some(dialog) = &mut model.create_dialog else {
            return;
        };
        let payload = match dialog.validate() {
            Ok(payload) => {
                dialog.validation_error = None;
                payload
            }
            Err(e) => {
                debug!(error = %e, "create form rejected locally");
                dialog.validation_error = Some(e);
                return;
            }
        };

        let url = match model.config.endpoints() {
            Ok(endpoints) => endpoints.records(),
            Err(e) => {
                let error = AppError::from(e);
                model.transition_create(SaveTransition::Failed(error.user_facing_message()));
                return;
            }
        };

        let generation = model.generation;
        match caps.http.post(&url).body_json(&payload) {
            Ok(request) => {
                info!(%url, generation, "creating record");
                model.transition_create(SaveTransition::Started);
                request.send(move |result| Event::RecordCreated { generation, result });
            }
            Err(e) => {
                warn!(error = %e, "create body could not be serialized");
                let error = AppError::new(ErrorKind::Serialization, e.to_string());
                model.transition_create(SaveTransition::Failed(error.user_facing_message()));
            }
        }
    }

    fn row_view(record: &crate::model::Record) -> RowView {
        RowView {
            id: record.id.clone(),
            name: record.name.clone(),
            gender: record.gender.clone(),
            gender_badge: gender_badge(&record.gender),
            request_date: format_date(&record.request_date),
            country: record.country.clone(),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        if let Some(generation) = event.generation() {
            if !model.accepts(generation) {
                debug!(
                    event = event.name(),
                    generation,
                    current = model.generation,
                    live = model.live,
                    "dropping stale response"
                );
                return;
            }
        }
        debug!(event = event.name(), "update");

        match event {
            Event::Noop => return,

            Event::Configure(config) => match config.validate() {
                Ok(()) => {
                    info!(base = %config.api_base_url, "config applied");
                    model.apply_config(config);
                }
                Err(e) => warn!(error = %e, "ignoring invalid config"),
            },

            Event::Mounted => {
                model.mount();
                Self::load_all(model, caps, Fetch::Foreground);
                Self::load_country_options(model, caps);
            }
            Event::Unmounted => model.unmount(),
            Event::RefreshRequested => Self::load_all(model, caps, Fetch::Background),

            Event::RecordsFetched { fetch, result, .. } => {
                model.finish_load(fetch, rows_outcome(result));
            }
            Event::CountriesFetched { result, .. } => {
                model.finish_countries(rows_outcome(result));
            }

            Event::CountryFilterMenuToggled => model.filter_menu_open = !model.filter_menu_open,
            Event::CountryFilterToggled { country } => model.toggle_country(&country),
            Event::CountryFilterCleared => model.clear_country_filter(),
            Event::NextPage => {
                let total = model.total_matching();
                model.page.next(total);
            }
            Event::PreviousPage => model.page.previous(),
            Event::PageSizeSelected { size } => {
                if model.config.page_size_options.contains(&size) {
                    let total = model.total_matching();
                    model.page.set_page_size(size, total);
                } else {
                    warn!(size, "page size not offered");
                }
            }

            Event::EditRequested { id } => {
                model.open_edit(&id);
            }
            Event::EditFieldChanged { field, value } => {
                if model.update.in_flight {
                    return;
                }
                if let Some(dialog) = &mut model.edit_dialog {
                    dialog.set(field, value);
                }
            }
            Event::EditCancelled => model.close_edit(),
            Event::EditSubmitted => Self::update_record(model, caps),
            Event::RecordUpdated { result, .. } => match outcome(result) {
                Ok(_) => {
                    info!("record updated");
                    model.transition_update(SaveTransition::Succeeded);
                    model.close_edit();
                    Self::load_all(model, caps, Fetch::Background);
                }
                Err(e) => {
                    warn!(error = %e, "record update failed");
                    model.transition_update(SaveTransition::Failed(e.user_facing_message()));
                }
            },

            Event::CreateOpened => model.open_create(chrono::Utc::now().date_naive()),
            Event::CreateFieldChanged { field, value } => {
                if model.create.in_flight {
                    return;
                }
                if let Some(dialog) = &mut model.create_dialog {
                    dialog.set(field, value);
                }
            }
            Event::CreateCancelled => model.close_create(),
            Event::CreateSubmitted => Self::create_record(model, caps),
            Event::RecordCreated { result, .. } => match outcome(result) {
                Ok(_) => {
                    info!("record created");
                    model.transition_create(SaveTransition::Succeeded);
                    model.close_create();
                    Self::load_all(model, caps, Fetch::Background);
                }
                Err(e) => {
                    warn!(error = %e, "record create failed");
                    model.transition_create(SaveTransition::Failed(e.user_facing_message()));
                }
            },
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        let table = table::view(&model.records, &model.filter, &model.page);
        let total = table.total_matching;
        let rows: Vec<RowView> = table.rows.into_iter().map(Self::row_view).collect();

        let empty_message = (!model.load.loading && rows.is_empty())
            .then(|| EMPTY_TABLE_MESSAGE.to_string());

        let country_options = model
            .countries
            .iter()
            .map(|name| CountryOption {
                name: name.clone(),
                selected: model.filter.is_selected(name),
            })
            .collect();

        let edit_dialog = model.edit_dialog.as_ref().map(|dialog| EditDialogView {
            id: dialog.record.id.clone(),
            name: dialog.name.clone(),
            country: dialog.country.clone(),
            country_options: dialog.country_options(&model.countries),
            saving: model.update.in_flight,
            error: model.update.error.clone(),
        });

        let create_dialog = model.create_dialog.as_ref().map(|dialog| CreateDialogView {
            name: dialog.name.clone(),
            country: dialog.country.clone(),
            gender: dialog.gender.clone(),
            request_date: dialog.request_date.clone(),
            country_options: dialog.country_options(&model.countries),
            gender_options: GENDER_OPTIONS.iter().map(ToString::to_string).collect(),
            saving: model.create.in_flight,
            error: dialog
                .validation_error
                .map(|e| e.to_string())
                .or_else(|| model.create.error.clone()),
        });

        ViewModel {
            rows,
            skeleton_rows: if model.load.loading { SKELETON_ROWS } else { 0 },
            empty_message,
            pagination: PaginationView {
                page_index: model.page.page_index,
                page_size: model.page.page_size,
                page_size_options: model.config.page_size_options.clone(),
                window: model.page.window(total),
                can_previous: model.page.can_previous(),
                can_next: model.page.can_next(total),
            },
            filter_open: model.filter_menu_open,
            filter_active: !model.filter.is_empty(),
            country_options,
            is_loading: model.load.loading,
            is_refreshing: model.load.refreshing,
            using_fallback: model.using_fallback,
            alert: model.using_fallback.then(|| FALLBACK_ALERT.to_string()),
            load_error: model.load.error.clone(),
            edit_dialog,
            create_dialog,
        }
    }
}
