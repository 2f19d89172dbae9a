//! Form field value objects

use super::path::FieldPath;
use chrono::{Datelike, Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Type-safe field values
///
/// Text covers free text, passwords and single-choice selections; the
/// chosen option is stored as its value string. Serializes flat (dates as
/// `YYYY-MM-DD`); reading data back goes through [`FormValues::parse`] into
/// a typed struct, which knows which strings are dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Get the text value (returns empty string for date fields)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Date(_) => "",
        }
    }

    /// Get the date value (returns None for text fields)
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Date(_) => false,
        }
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match self {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Date(_) => {
                // Dates are adjusted with shift_days/shift_years, not typed
            }
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = self {
            s.pop();
        }
    }

    /// Move a date value by whole days
    pub fn shift_days(&mut self, days: i64) {
        if let FieldValue::Date(d) = self {
            if let Some(shifted) = d.checked_add_signed(Duration::days(days)) {
                *d = shifted;
            }
        }
    }

    /// Move a date value by whole years, clamping Feb 29 to Feb 28
    pub fn shift_years(&mut self, years: i32) {
        if let FieldValue::Date(d) = self {
            let year = d.year() + years;
            let shifted = d
                .with_year(year)
                .or_else(|| NaiveDate::from_ymd_opt(year, d.month(), 28));
            if let Some(shifted) = shifted {
                *d = shifted;
            }
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.format("%B %-d, %Y").to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// A snapshot of field values keyed by path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<FieldPath, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, path: impl Into<FieldPath>, value: impl Into<FieldValue>) -> Self {
        self.insert(path, value);
        self
    }

    pub fn insert(&mut self, path: impl Into<FieldPath>, value: impl Into<FieldValue>) {
        self.0.insert(path.into(), value.into());
    }

    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        self.0.get(path)
    }

    /// Text of a field, empty when missing or not text
    pub fn text(&self, path: &str) -> &str {
        self.get(path).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn date(&self, path: &str) -> Option<NaiveDate> {
        self.get(path).and_then(FieldValue::as_date)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldValue)> {
        self.0.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON representation, as handed to submission backends
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Convert the snapshot into typed form data
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl<P: Into<FieldPath>, V: Into<FieldValue>> FromIterator<(P, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(path, value)| (path.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod field_value {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_is_empty_text() {
            let value = FieldValue::default();
            assert_eq!(value, FieldValue::Text(String::new()));
            assert!(value.is_empty());
        }

        #[test]
        fn test_push_and_pop_char() {
            let mut value = FieldValue::from("Jo");
            value.push_char('e');
            assert_eq!(value.as_text(), "Joe");
            value.pop_char();
            value.pop_char();
            assert_eq!(value.as_text(), "J");
        }

        #[test]
        fn test_date_ignores_typing() {
            let mut value = FieldValue::from(date(2000, 1, 1));
            value.push_char('x');
            value.pop_char();
            assert_eq!(value.as_date(), Some(date(2000, 1, 1)));
            assert_eq!(value.as_text(), "");
        }

        #[test]
        fn test_shift_days_crosses_month() {
            let mut value = FieldValue::from(date(2000, 1, 31));
            value.shift_days(1);
            assert_eq!(value.as_date(), Some(date(2000, 2, 1)));
            value.shift_days(-2);
            assert_eq!(value.as_date(), Some(date(2000, 1, 30)));
        }

        #[test]
        fn test_shift_years_clamps_leap_day() {
            let mut value = FieldValue::from(date(2000, 2, 29));
            value.shift_years(1);
            assert_eq!(value.as_date(), Some(date(2001, 2, 28)));
        }

        #[test]
        fn test_shift_on_text_is_noop() {
            let mut value = FieldValue::from("abc");
            value.shift_days(3);
            value.shift_years(3);
            assert_eq!(value.as_text(), "abc");
        }

        #[test]
        fn test_display_value_for_date() {
            let value = FieldValue::from(date(1990, 3, 5));
            assert_eq!(value.display_value(), "March 5, 1990");
        }
    }

    mod form_values {
        use super::*;
        use pretty_assertions::assert_eq;
        use serde::Deserialize;

        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Person {
            first_name: String,
            date_of_birth: NaiveDate,
        }

        #[test]
        fn test_text_of_missing_field_is_empty() {
            let values = FormValues::new().with("name", "Ada");
            assert_eq!(values.text("name"), "Ada");
            assert_eq!(values.text("missing"), "");
            assert!(values.date("name").is_none());
        }

        #[test]
        fn test_to_json_shape() {
            let values = FormValues::new()
                .with("name", "Ada")
                .with("born", date(1815, 12, 10));
            assert_eq!(
                values.to_json(),
                serde_json::json!({ "born": "1815-12-10", "name": "Ada" })
            );
        }

        #[test]
        fn test_parse_into_typed_struct() {
            let values = FormValues::new()
                .with("firstName", "Ada")
                .with("dateOfBirth", date(1815, 12, 10));
            let person: Person = values.parse().unwrap();
            assert_eq!(
                person,
                Person {
                    first_name: "Ada".to_string(),
                    date_of_birth: date(1815, 12, 10),
                }
            );
        }

        #[test]
        fn test_date_survives_typed_round_trip() {
            let values = FormValues::new()
                .with("firstName", "Ada")
                .with("dateOfBirth", date(1990, 6, 15));
            let person: Person = values.parse().unwrap();

            let back = FormValues::new()
                .with("firstName", person.first_name)
                .with("dateOfBirth", person.date_of_birth);
            assert_eq!(back.get("dateOfBirth"), Some(&FieldValue::Date(date(1990, 6, 15))));
            assert_eq!(back, values);
        }

        #[test]
        fn test_collect_from_pairs() {
            let values: FormValues = vec![("a", "1"), ("b", "2")].into_iter().collect();
            assert_eq!(values.len(), 2);
            assert!(values.contains("b"));
        }
    }
}
