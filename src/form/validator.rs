//! Validation contract and the rule-based schema that implements it

use super::error::ValidationErrors;
use super::path::FieldPath;
use super::value::{FieldValue, FormValues};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// One path-scoped problem reported by a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: FieldPath,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<FieldPath>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Checks a value snapshot; issues come back in the order they were found
#[cfg_attr(test, mockall::automock)]
pub trait Validator: Send + Sync {
    fn validate(&self, values: &FormValues) -> Result<(), Vec<ValidationIssue>>;
}

/// Outcome of a validation pass, restricted to the fields it covered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: BTreeMap<FieldPath, String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: BTreeMap::new(),
        }
    }

    /// Keep the first message per field among issues accepted by `include`
    pub fn from_issues<'a>(
        issues: impl IntoIterator<Item = &'a ValidationIssue>,
        include: impl Fn(&FieldPath) -> bool,
    ) -> Self {
        let mut errors = BTreeMap::new();
        for issue in issues {
            if include(&issue.path) {
                errors
                    .entry(issue.path.clone())
                    .or_insert_with(|| issue.message.clone());
            }
        }
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn invalid_paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.errors.keys()
    }

    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors::new(self.errors)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

type ValueCheck = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;
type FormCheck = Arc<dyn Fn(&FormValues) -> bool + Send + Sync>;

/// A single per-field rule
#[derive(Clone)]
pub enum Rule {
    MinLength { min: usize, message: String },
    Email { message: String },
    Pattern { regex: Regex, message: String },
    OneOf { options: Vec<String>, message: String },
    Date { message: String },
    Custom { check: ValueCheck, message: String },
}

impl Rule {
    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Rule::Email {
            message: message.into(),
        }
    }

    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        Rule::Pattern {
            regex,
            message: message.into(),
        }
    }

    pub fn one_of<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
        message: impl Into<String>,
    ) -> Self {
        Rule::OneOf {
            options: options.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Value must be a date
    pub fn date(message: impl Into<String>) -> Self {
        Rule::Date {
            message: message.into(),
        }
    }

    pub fn custom(
        message: impl Into<String>,
        check: impl Fn(&FieldValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Rule::Custom {
            check: Arc::new(check),
            message: message.into(),
        }
    }

    fn check(&self, value: &FieldValue) -> Result<(), &str> {
        let passed = match self {
            Rule::MinLength { min, .. } => value.as_text().chars().count() >= *min,
            Rule::Email { .. } => EMAIL_RE.is_match(value.as_text()),
            Rule::Pattern { regex, .. } => regex.is_match(value.as_text()),
            Rule::OneOf { options, .. } => options.iter().any(|o| o == value.as_text()),
            Rule::Date { .. } => value.as_date().is_some(),
            Rule::Custom { check, .. } => check(value),
        };
        if passed {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    fn message(&self) -> &str {
        match self {
            Rule::MinLength { message, .. }
            | Rule::Email { message }
            | Rule::Pattern { message, .. }
            | Rule::OneOf { message, .. }
            | Rule::Date { message }
            | Rule::Custom { message, .. } => message,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::MinLength { min, message } => f
                .debug_struct("MinLength")
                .field("min", min)
                .field("message", message)
                .finish(),
            Rule::Email { message } => f.debug_struct("Email").field("message", message).finish(),
            Rule::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            Rule::OneOf { options, message } => f
                .debug_struct("OneOf")
                .field("options", options)
                .field("message", message)
                .finish(),
            Rule::Date { message } => f.debug_struct("Date").field("message", message).finish(),
            Rule::Custom { message, .. } => {
                f.debug_struct("Custom").field("message", message).finish()
            }
        }
    }
}

/// A rule that looks at several fields and reports against one of them
#[derive(Clone)]
pub struct Refinement {
    path: FieldPath,
    message: String,
    check: FormCheck,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("path", &self.path)
            .field("message", &self.message)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct FieldRules {
    path: FieldPath,
    rules: Vec<Rule>,
}

/// Declarative schema: per-field rules, then cross-field refinements
///
/// Refinements always run, even when base rules already failed, so a
/// partial validation of two related fields sees the cross-field issue.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRules>,
    refinements: Vec<Refinement>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field and its rules, checked in the given order
    pub fn field(mut self, path: impl Into<FieldPath>, rules: impl IntoIterator<Item = Rule>) -> Self {
        let path = path.into();
        let rules: Vec<Rule> = rules.into_iter().collect();
        match self.fields.iter_mut().find(|f| f.path == path) {
            Some(existing) => existing.rules = rules,
            None => self.fields.push(FieldRules { path, rules }),
        }
        self
    }

    pub fn refine(
        mut self,
        path: impl Into<FieldPath>,
        message: impl Into<String>,
        check: impl Fn(&FormValues) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.refinements.push(Refinement {
            path: path.into(),
            message: message.into(),
            check: Arc::new(check),
        });
        self
    }

    /// Combine two schemas; fields of `other` replace same-named fields
    pub fn merge(mut self, other: Schema) -> Self {
        for field in other.fields {
            self = self.field(field.path, field.rules);
        }
        self.refinements.extend(other.refinements);
        self
    }

    pub fn field_paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.iter().map(|f| &f.path)
    }
}

impl Validator for Schema {
    fn validate(&self, values: &FormValues) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        for field in &self.fields {
            match values.get(field.path.as_str()) {
                Some(value) => {
                    for rule in &field.rules {
                        if let Err(message) = rule.check(value) {
                            issues.push(ValidationIssue::new(field.path.clone(), message));
                        }
                    }
                }
                None => issues.push(ValidationIssue::new(field.path.clone(), "Required")),
            }
        }

        for refinement in &self.refinements {
            if !(refinement.check)(values) {
                issues.push(ValidationIssue::new(
                    refinement.path.clone(),
                    refinement.message.clone(),
                ));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn account_schema() -> Schema {
        Schema::new()
            .field(
                "password",
                [
                    Rule::min_length(8, "Password must be at least 8 characters"),
                    Rule::custom("Password must contain a digit", |v| {
                        v.as_text().chars().any(|c| c.is_ascii_digit())
                    }),
                ],
            )
            .field("confirmPassword", [])
            .refine("confirmPassword", "Passwords don't match", |values| {
                values.text("password") == values.text("confirmPassword")
            })
    }

    mod rules {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_min_length_counts_chars() {
            let rule = Rule::min_length(2, "too short");
            assert!(rule.check(&FieldValue::from("Jo")).is_ok());
            assert_eq!(rule.check(&FieldValue::from("J")), Err("too short"));
        }

        #[test]
        fn test_email() {
            let rule = Rule::email("Please enter a valid email address");
            assert!(rule.check(&FieldValue::from("a@b.com")).is_ok());
            assert!(rule.check(&FieldValue::from("bad")).is_err());
            assert!(rule.check(&FieldValue::from("a @b.com")).is_err());
        }

        #[test]
        fn test_one_of() {
            let rule = Rule::one_of(["male", "female", "other"], "Pick one");
            assert!(rule.check(&FieldValue::from("other")).is_ok());
            assert!(rule.check(&FieldValue::from("")).is_err());
        }

        #[test]
        fn test_date_rejects_text() {
            let rule = Rule::date("Expected date");
            let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            assert!(rule.check(&FieldValue::from(date)).is_ok());
            assert!(rule.check(&FieldValue::from("2000-01-01")).is_err());
        }

        #[test]
        fn test_pattern() {
            let rule = Rule::pattern(Regex::new(r"^\d+$").unwrap(), "digits only");
            assert!(rule.check(&FieldValue::from("123")).is_ok());
            assert!(rule.check(&FieldValue::from("12a")).is_err());
        }
    }

    mod schema {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_values_pass() {
            let values = FormValues::new()
                .with("password", "Abcdefg1")
                .with("confirmPassword", "Abcdefg1");
            assert!(account_schema().validate(&values).is_ok());
        }

        #[test]
        fn test_issues_are_ordered_by_field_then_rule() {
            let values = FormValues::new()
                .with("password", "short")
                .with("confirmPassword", "short");
            let issues = account_schema().validate(&values).unwrap_err();
            assert_eq!(
                issues,
                vec![
                    ValidationIssue::new("password", "Password must be at least 8 characters"),
                    ValidationIssue::new("password", "Password must contain a digit"),
                ]
            );
        }

        #[test]
        fn test_refinement_targets_designated_path() {
            let values = FormValues::new()
                .with("password", "Abcdefg1")
                .with("confirmPassword", "different");
            let issues = account_schema().validate(&values).unwrap_err();
            assert_eq!(
                issues,
                vec![ValidationIssue::new("confirmPassword", "Passwords don't match")]
            );
        }

        #[test]
        fn test_missing_field_is_required() {
            let schema = Schema::new().field("name", [Rule::min_length(1, "empty")]);
            let issues = schema.validate(&FormValues::new()).unwrap_err();
            assert_eq!(issues, vec![ValidationIssue::new("name", "Required")]);
        }

        #[test]
        fn test_merge_replaces_same_named_fields() {
            let base = Schema::new().field("name", [Rule::min_length(5, "five")]);
            let other = Schema::new()
                .field("name", [Rule::min_length(1, "one")])
                .field("email", []);
            let merged = base.merge(other);
            let paths: Vec<&str> = merged.field_paths().map(FieldPath::as_str).collect();
            assert_eq!(paths, vec!["name", "email"]);

            let values = FormValues::new().with("name", "Al").with("email", "");
            assert!(merged.validate(&values).is_ok());
        }
    }

    mod result {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_keeps_first_message_per_field() {
            let issues = vec![
                ValidationIssue::new("a", "first"),
                ValidationIssue::new("a", "second"),
                ValidationIssue::new("b", "other"),
            ];
            let result = ValidationResult::from_issues(&issues, |_| true);
            assert!(!result.is_valid());
            assert_eq!(result.error("a"), Some("first"));
            assert_eq!(result.error("b"), Some("other"));
        }

        #[test]
        fn test_projection_filters_paths() {
            let issues = vec![ValidationIssue::new("a", "bad")];
            let result = ValidationResult::from_issues(&issues, |p| p.as_str() == "b");
            assert!(result.is_valid());
            assert!(result.errors.is_empty());
        }
    }
}
