//! Turns loosely shaped API rows into canonical [`Record`]s.
//!
//! Every canonical attribute has an ordered alias table. The first alias that
//! is present wins; when none is, the attribute gets a fixed placeholder.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::model::{IdOrigin, Record};
use crate::PLACEHOLDER;

/// A raw JSON object as returned by the API.
pub type RawRow = serde_json::Map<String, Value>;

pub const ID_ALIASES: &[&str] = &["id"];
pub const NAME_ALIASES: &[&str] = &["name", "entity"];
pub const GENDER_ALIASES: &[&str] = &["gender"];
pub const REQUEST_DATE_ALIASES: &[&str] = &["requestDate", "date", "createdAt"];
pub const COUNTRY_ALIASES: &[&str] = &["country", "location"];
pub const COUNTRY_NAME_ALIASES: &[&str] = &["name"];

const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Textual value of the first alias present in `row`.
///
/// `null`, arrays and objects count as absent. An empty string is present.
#[must_use]
pub fn first_present(row: &RawRow, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| match row.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[must_use]
pub fn normalize_row(row: &RawRow) -> Record {
    let (id, id_origin) = match first_present(row, ID_ALIASES) {
        Some(id) => (id, IdOrigin::Server),
        None => (Uuid::new_v4().to_string(), IdOrigin::Local),
    };

    Record {
        id,
        id_origin,
        name: first_present(row, NAME_ALIASES).unwrap_or_else(|| PLACEHOLDER.into()),
        gender: first_present(row, GENDER_ALIASES).unwrap_or_else(|| PLACEHOLDER.into()),
        request_date: first_present(row, REQUEST_DATE_ALIASES).unwrap_or_default(),
        country: first_present(row, COUNTRY_ALIASES).unwrap_or_else(|| PLACEHOLDER.into()),
    }
}

#[must_use]
pub fn normalize_rows(rows: &[RawRow]) -> Vec<Record> {
    rows.iter().map(normalize_row).collect()
}

/// Built-in rows shown whenever the live list cannot be loaded.
#[must_use]
pub fn sample_records() -> Vec<Record> {
    [
        ("1", "Marco Huel", "Male", "2025-01-20", "India"),
        ("2", "Alex Morgan", "Female", "2025-01-18", "US"),
        ("3", "Priya Singh", "Female", "2025-01-12", "UK"),
        ("4", "Hiro Tanaka", "Male", "2025-01-04", "Japan"),
    ]
    .into_iter()
    .map(|(id, name, gender, request_date, country)| Record {
        id: id.into(),
        id_origin: IdOrigin::Server,
        name: name.into(),
        gender: gender.into(),
        request_date: request_date.into(),
        country: country.into(),
    })
    .collect()
}

fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, NAIVE_DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Display form of a request date, e.g. `Jan 20, 2025`.
///
/// Empty input shows the placeholder; unparsable input is shown verbatim.
#[must_use]
pub fn format_date(input: &str) -> String {
    if input.is_empty() {
        return PLACEHOLDER.into();
    }
    match parse_date(input) {
        Some(dt) => dt.format(DISPLAY_DATE_FORMAT).to_string(),
        None => input.to_string(),
    }
}

/// Wire form of a request date: UTC RFC 3339 with milliseconds, or the input
/// unchanged when it does not parse.
#[must_use]
pub fn canonical_timestamp(input: &str) -> String {
    match parse_date(input) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => input.to_string(),
    }
}

/// Sorted ascending, duplicates and empty strings removed.
#[must_use]
pub fn sorted_unique<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
    out.sort();
    out.dedup();
    out
}

/// Country names from the `/countries` reference list.
#[must_use]
pub fn country_names(rows: &[RawRow]) -> Vec<String> {
    sorted_unique(
        rows.iter()
            .filter_map(|row| first_present(row, COUNTRY_NAME_ALIASES))
            .map(|name| name.trim().to_string()),
    )
}

/// Country options derived from records already held in memory.
#[must_use]
pub fn countries_of(records: &[Record]) -> Vec<String> {
    sorted_unique(records.iter().map(|r| r.country.clone()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderBadge {
    Male,
    Female,
    Neutral,
}

#[must_use]
pub fn gender_badge(gender: &str) -> GenderBadge {
    if gender.eq_ignore_ascii_case("male") {
        GenderBadge::Male
    } else if gender.eq_ignore_ascii_case("female") {
        GenderBadge::Female
    } else {
        GenderBadge::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn full_row_maps_one_to_one() {
        let record = normalize_row(&row(json!({
            "id": "17",
            "name": "Ada",
            "gender": "Female",
            "requestDate": "2025-02-01",
            "country": "UK"
        })));

        assert_eq!(record.id, "17");
        assert_eq!(record.id_origin, IdOrigin::Server);
        assert_eq!(record.name, "Ada");
        assert_eq!(record.gender, "Female");
        assert_eq!(record.request_date, "2025-02-01");
        assert_eq!(record.country, "UK");
    }

    #[test]
    fn name_falls_back_to_entity_alias() {
        let record = normalize_row(&row(json!({ "id": "1", "entity": "Acme Ltd" })));
        assert_eq!(record.name, "Acme Ltd");
    }

    #[test]
    fn primary_alias_wins_over_later_ones() {
        let record = normalize_row(&row(json!({
            "name": "Primary",
            "entity": "Secondary",
            "date": "2025-01-01",
            "createdAt": "2024-01-01",
            "country": "US",
            "location": "Mars"
        })));
        assert_eq!(record.name, "Primary");
        assert_eq!(record.request_date, "2025-01-01");
        assert_eq!(record.country, "US");
    }

    #[test]
    fn null_alias_is_skipped() {
        let record = normalize_row(&row(json!({ "name": null, "entity": "Fallback" })));
        assert_eq!(record.name, "Fallback");
    }

    #[test]
    fn empty_string_counts_as_present() {
        let record = normalize_row(&row(json!({ "name": "", "entity": "Ignored" })));
        assert_eq!(record.name, "");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let record = normalize_row(&RawRow::new());
        assert_eq!(record.name, PLACEHOLDER);
        assert_eq!(record.gender, PLACEHOLDER);
        assert_eq!(record.country, PLACEHOLDER);
        assert_eq!(record.request_date, "");
        assert_eq!(format_date(&record.request_date), PLACEHOLDER);
    }

    #[test]
    fn missing_id_is_generated_locally() {
        let a = normalize_row(&RawRow::new());
        let b = normalize_row(&RawRow::new());
        assert_eq!(a.id_origin, IdOrigin::Local);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn numeric_id_is_kept_as_text() {
        let record = normalize_row(&row(json!({ "id": 42 })));
        assert_eq!(record.id, "42");
        assert_eq!(record.id_origin, IdOrigin::Server);
    }

    #[test]
    fn location_alias_fills_country() {
        let record = normalize_row(&row(json!({ "location": "Japan" })));
        assert_eq!(record.country, "Japan");
    }

    #[test]
    fn created_at_alias_fills_request_date() {
        let record = normalize_row(&row(json!({ "createdAt": "2025-06-16T11:58:01.508Z" })));
        assert_eq!(record.request_date, "2025-06-16T11:58:01.508Z");
        assert_eq!(format_date(&record.request_date), "Jun 16, 2025");
    }

    #[test]
    fn sample_has_four_fixed_rows() {
        let rows = sample_records();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].name, "Marco Huel");
        assert_eq!(rows[3].country, "Japan");
        assert!(rows.iter().all(|r| r.id_origin == IdOrigin::Server));
    }

    #[test]
    fn format_date_handles_common_shapes() {
        assert_eq!(format_date("2025-01-20"), "Jan 20, 2025");
        assert_eq!(format_date("2025-01-04T08:30:00"), "Jan 4, 2025");
        assert_eq!(format_date("2025-03-09T23:00:00-02:00"), "Mar 10, 2025");
    }

    #[test]
    fn format_date_passes_garbage_through() {
        assert_eq!(format_date("next tuesday"), "next tuesday");
        assert_eq!(format_date("1750000000"), "1750000000");
    }

    #[test]
    fn canonical_timestamp_is_utc_millis() {
        assert_eq!(canonical_timestamp("2025-01-20"), "2025-01-20T00:00:00.000Z");
        assert_eq!(
            canonical_timestamp("2025-01-20T10:15:30+02:00"),
            "2025-01-20T08:15:30.000Z"
        );
        assert_eq!(canonical_timestamp("soon"), "soon");
    }

    #[test]
    fn country_names_are_sorted_and_unique() {
        let rows = vec![
            row(json!({ "name": "US" })),
            row(json!({ "name": "India" })),
            row(json!({ "name": "US" })),
            row(json!({ "name": "" })),
            row(json!({ "code": "XX" })),
        ];
        assert_eq!(country_names(&rows), vec!["India".to_string(), "US".to_string()]);
    }

    #[test]
    fn countries_of_sample() {
        assert_eq!(
            countries_of(&sample_records()),
            vec!["India", "Japan", "UK", "US"]
        );
    }

    #[test]
    fn gender_badge_is_case_insensitive() {
        assert_eq!(gender_badge("MALE"), GenderBadge::Male);
        assert_eq!(gender_badge("female"), GenderBadge::Female);
        assert_eq!(gender_badge("Females"), GenderBadge::Neutral);
        assert_eq!(gender_badge(PLACEHOLDER), GenderBadge::Neutral);
    }

    proptest! {
        #[test]
        fn alias_only_name_is_used(name in "[A-Za-z ]{1,24}") {
            let mut raw = RawRow::new();
            raw.insert("entity".into(), Value::String(name.clone()));
            prop_assert_eq!(normalize_row(&raw).name, name);
        }

        #[test]
        fn format_date_never_returns_empty(input in ".{0,32}") {
            prop_assert!(!format_date(&input).is_empty());
        }

        #[test]
        fn sorted_unique_is_sorted_and_deduped(values in proptest::collection::vec("[a-c]{0,2}", 0..20)) {
            let out = sorted_unique(values);
            prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(out.iter().all(|v| !v.is_empty()));
        }
    }
}
