//! Edit and create dialog state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Record, RecordChanges};
use crate::normalize::{canonical_timestamp, sorted_unique};
use crate::{ValidationError, DEFAULT_GENDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    Name,
    Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditForm {
    pub record: Record,
    pub name: String,
    pub country: String,
}

impl EditForm {
    #[must_use]
    pub fn open(record: Record) -> Self {
        Self {
            name: record.name.clone(),
            country: record.country.clone(),
            record,
        }
    }

    pub fn set(&mut self, field: EditField, value: String) {
        match field {
            EditField::Name => self.name = value,
            EditField::Country => self.country = value,
        }
    }

    /// Known options plus the record's own country, trimmed and sorted.
    #[must_use]
    pub fn country_options(&self, known: &[String]) -> Vec<String> {
        sorted_unique(
            known
                .iter()
                .chain(std::iter::once(&self.record.country))
                .map(|c| c.trim().to_string()),
        )
    }

    /// The changes to send, or `None` when the name is blank or no country
    /// is chosen.
    #[must_use]
    pub fn submission(&self) -> Option<RecordChanges> {
        let name = self.name.trim();
        if name.is_empty() || self.country.is_empty() {
            return None;
        }
        Some(RecordChanges {
            name: name.to_string(),
            country: self.country.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateField {
    Name,
    Country,
    Gender,
    RequestDate,
}

/// Body for `POST /taxes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload {
    pub name: String,
    pub gender: String,
    pub country: String,
    pub request_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateForm {
    pub name: String,
    pub country: String,
    pub gender: String,
    pub request_date: String,
    pub validation_error: Option<ValidationError>,
}

impl CreateForm {
    #[must_use]
    pub fn open(countries: &[String], today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            country: countries.first().cloned().unwrap_or_default(),
            gender: DEFAULT_GENDER.into(),
            request_date: today.format("%Y-%m-%d").to_string(),
            validation_error: None,
        }
    }

    pub fn set(&mut self, field: CreateField, value: String) {
        match field {
            CreateField::Name => self.name = value,
            CreateField::Country => self.country = value,
            CreateField::Gender => self.gender = value,
            CreateField::RequestDate => self.request_date = value,
        }
    }

    /// The chosen country first, then the known options, without repeats.
    #[must_use]
    pub fn country_options(&self, known: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(known.len() + 1);
        for country in std::iter::once(&self.country).chain(known) {
            if !country.is_empty() && !out.contains(country) {
                out.push(country.clone());
            }
        }
        out
    }

    /// Checks required fields in form order and builds the request body.
    pub fn validate(&self) -> Result<CreatePayload, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.country.is_empty() {
            return Err(ValidationError::CountryRequired);
        }
        if self.gender.is_empty() {
            return Err(ValidationError::GenderRequired);
        }
        if self.request_date.is_empty() {
            return Err(ValidationError::RequestDateRequired);
        }

        Ok(CreatePayload {
            name: name.to_string(),
            gender: self.gender.clone(),
            country: self.country.clone(),
            request_date: canonical_timestamp(&self.request_date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::sample_records;

    fn countries() -> Vec<String> {
        vec!["India".into(), "Japan".into(), "UK".into(), "US".into()]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn edit_form_starts_from_record() {
        let record = sample_records().remove(1);
        let form = EditForm::open(record.clone());
        assert_eq!(form.name, record.name);
        assert_eq!(form.country, record.country);
    }

    #[test]
    fn edit_submission_trims_name() {
        let mut form = EditForm::open(sample_records().remove(0));
        form.set(EditField::Name, "  Jane  ".into());
        form.set(EditField::Country, "US".into());
        assert_eq!(
            form.submission(),
            Some(RecordChanges {
                name: "Jane".into(),
                country: "US".into()
            })
        );
    }

    #[test]
    fn edit_submission_rejects_blank_fields() {
        let mut form = EditForm::open(sample_records().remove(0));
        form.set(EditField::Name, "   ".into());
        assert!(form.submission().is_none());

        form.set(EditField::Name, "Jane".into());
        form.set(EditField::Country, String::new());
        assert!(form.submission().is_none());
    }

    #[test]
    fn edit_options_include_record_country() {
        let mut record = sample_records().remove(0);
        record.country = " Brazil ".into();
        let form = EditForm::open(record);
        assert_eq!(
            form.country_options(&countries()),
            vec!["Brazil", "India", "Japan", "UK", "US"]
        );
    }

    #[test]
    fn create_form_defaults() {
        let form = CreateForm::open(&countries(), today());
        assert_eq!(form.name, "");
        assert_eq!(form.country, "India");
        assert_eq!(form.gender, "Male");
        assert_eq!(form.request_date, "2025-03-14");
        assert!(form.validation_error.is_none());

        let empty = CreateForm::open(&[], today());
        assert_eq!(empty.country, "");
    }

    #[test]
    fn create_validation_order() {
        let mut form = CreateForm::open(&[], today());
        form.set(CreateField::Gender, String::new());
        form.set(CreateField::RequestDate, String::new());
        assert_eq!(form.validate(), Err(ValidationError::NameRequired));

        form.set(CreateField::Name, "Ada".into());
        assert_eq!(form.validate(), Err(ValidationError::CountryRequired));

        form.set(CreateField::Country, "UK".into());
        assert_eq!(form.validate(), Err(ValidationError::GenderRequired));

        form.set(CreateField::Gender, "Female".into());
        assert_eq!(form.validate(), Err(ValidationError::RequestDateRequired));
    }

    #[test]
    fn create_payload_canonicalizes_date() {
        let mut form = CreateForm::open(&countries(), today());
        form.set(CreateField::Name, " Ada Lovelace ".into());
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Ada Lovelace");
        assert_eq!(payload.request_date, "2025-03-14T00:00:00.000Z");

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["requestDate"], "2025-03-14T00:00:00.000Z");
    }

    #[test]
    fn create_payload_keeps_unparsable_date() {
        let mut form = CreateForm::open(&countries(), today());
        form.set(CreateField::Name, "Ada".into());
        form.set(CreateField::RequestDate, "14/03/2025".into());
        assert_eq!(form.validate().unwrap().request_date, "14/03/2025");
    }

    #[test]
    fn create_options_put_choice_first() {
        let mut form = CreateForm::open(&countries(), today());
        form.set(CreateField::Country, "Peru".into());
        assert_eq!(
            form.country_options(&countries()),
            vec!["Peru", "India", "Japan", "UK", "US"]
        );
    }
}
