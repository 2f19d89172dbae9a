//! Registration forms: the simple sign-up form and the three-step wizard

use crate::form::{
    FieldValue, FormController, FormError, FormValues, Rule, Schema, StepDefinition,
    ValidationMode, WizardController,
};
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("phone pattern compiles"));

pub const GENDERS: [(&str, &str); 3] = [("male", "Male"), ("female", "Female"), ("other", "Other")];

pub const COUNTRIES: [(&str, &str); 4] = [
    ("us", "United States"),
    ("uk", "United Kingdom"),
    ("ca", "Canada"),
    ("au", "Australia"),
];

/// Earliest accepted date of birth
pub fn earliest_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn has_upper_lower_digit(value: &FieldValue) -> bool {
    let text = value.as_text();
    text.chars().any(|c| c.is_ascii_lowercase())
        && text.chars().any(|c| c.is_ascii_uppercase())
        && text.chars().any(|c| c.is_ascii_digit())
}

fn password_rules() -> [Rule; 2] {
    [
        Rule::min_length(8, "Password must be at least 8 characters"),
        Rule::custom(
            "Password must contain uppercase, lowercase, and number",
            has_upper_lower_digit,
        ),
    ]
}

fn passwords_match(values: &FormValues) -> bool {
    values.text("password") == values.text("confirmPassword")
}

pub fn simple_schema() -> Schema {
    Schema::new()
        .field("name", [Rule::min_length(2, "Name must be at least 2 characters")])
        .field("email", [Rule::email("Please enter a valid email address")])
        .field("password", password_rules())
}

pub fn personal_info_schema() -> Schema {
    Schema::new()
        .field(
            "firstName",
            [Rule::min_length(2, "First name must be at least 2 characters")],
        )
        .field(
            "lastName",
            [Rule::min_length(2, "Last name must be at least 2 characters")],
        )
        .field(
            "dateOfBirth",
            [
                Rule::date("Please pick a date of birth"),
                Rule::custom("Date of birth cannot be in the future", |value| {
                    value
                        .as_date()
                        .is_some_and(|date| date <= Local::now().date_naive())
                }),
                Rule::custom("Date of birth cannot be before 1900", |value| {
                    value
                        .as_date()
                        .is_some_and(|date| date >= earliest_birth_date())
                }),
            ],
        )
        .field(
            "gender",
            [Rule::one_of(GENDERS.map(|(value, _)| value), "Please select a gender")],
        )
}

pub fn contact_info_schema() -> Schema {
    Schema::new()
        .field("email", [Rule::email("Please enter a valid email address")])
        .field(
            "phone",
            [Rule::pattern(PHONE_RE.clone(), "Please enter a valid phone number")],
        )
        .field("address", [Rule::min_length(5, "Please enter a valid address")])
        .field("city", [Rule::min_length(2, "Please enter a valid city")])
        .field("country", [Rule::min_length(1, "Please select a country")])
}

pub fn account_info_schema() -> Schema {
    Schema::new()
        .field(
            "username",
            [Rule::min_length(3, "Username must be at least 3 characters")],
        )
        .field("password", password_rules())
        .field("confirmPassword", [])
        .refine("confirmPassword", "Passwords don't match", passwords_match)
}

/// All three steps in one schema
pub fn multi_step_schema() -> Schema {
    personal_info_schema()
        .merge(contact_info_schema())
        .merge(account_info_schema())
}

pub fn simple_defaults() -> FormValues {
    FormValues::new()
        .with("name", "")
        .with("email", "")
        .with("password", "")
}

/// Wizard defaults; the date of birth starts at `today`
pub fn multi_step_defaults(today: NaiveDate) -> FormValues {
    FormValues::new()
        .with("firstName", "")
        .with("lastName", "")
        .with("dateOfBirth", today)
        .with("gender", "male")
        .with("email", "")
        .with("phone", "")
        .with("address", "")
        .with("city", "")
        .with("country", "")
        .with("username", "")
        .with("password", "")
        .with("confirmPassword", "")
}

pub fn registration_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "personal",
            "Personal Info",
            ["firstName", "lastName", "dateOfBirth", "gender"],
        ),
        StepDefinition::new(
            "contact",
            "Contact Info",
            ["email", "phone", "address", "city", "country"],
        ),
        StepDefinition::new(
            "account",
            "Account Info",
            ["username", "password", "confirmPassword"],
        ),
    ]
}

pub fn simple_form(mode: ValidationMode) -> FormController {
    FormController::new(simple_defaults(), simple_schema()).with_mode(mode)
}

pub fn registration_wizard(
    mode: ValidationMode,
    today: NaiveDate,
) -> Result<WizardController, FormError> {
    let form = FormController::new(multi_step_defaults(today), multi_step_schema()).with_mode(mode);
    WizardController::new(form, registration_steps())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleFormData {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiStepFormData {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}
