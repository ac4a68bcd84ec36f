//! Form input validation
//!
//! Each field is a tiny state machine over `(value, touched)`: typing
//! replaces the value, leaving the field marks it touched, and a reset
//! returns it to the initial state. A field only reports an error once it
//! has been touched, so a fresh form does not light up red.

use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9a-zA-Z]([-_.]?[0-9a-zA-Z])*@[0-9a-zA-Z]([-_.]?[0-9a-zA-Z])*\.[a-zA-Z]{2,3}$",
    )
    .expect("email pattern is a valid regex")
});

/// Validation rule for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Non-blank after trimming
    NotEmpty,
    /// Plain `local@domain.tld` address
    Email,
}

impl Rule {
    pub fn check(&self, value: &str) -> bool {
        match self {
            Rule::NotEmpty => is_not_empty(value),
            Rule::Email => is_email(value),
        }
    }
}

pub fn is_not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Events a field reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Input(String),
    Blur,
    Reset,
}

/// Where a field stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPhase {
    Untouched,
    TouchedValid,
    TouchedInvalid,
}

/// Value and touched flag of one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
}

impl FieldState {
    /// Apply an event, producing the next state
    pub fn reduce(self, event: FieldEvent) -> Self {
        match event {
            FieldEvent::Input(value) => Self {
                value,
                touched: self.touched,
            },
            FieldEvent::Blur => Self {
                value: self.value,
                touched: true,
            },
            FieldEvent::Reset => Self::default(),
        }
    }

    pub fn phase(&self, rule: Rule) -> FieldPhase {
        match (self.touched, rule.check(&self.value)) {
            (false, _) => FieldPhase::Untouched,
            (true, true) => FieldPhase::TouchedValid,
            (true, false) => FieldPhase::TouchedInvalid,
        }
    }
}

/// A named field with its rule and error message
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    rule: Rule,
    message: String,
    state: FieldState,
}

impl Field {
    pub fn new(name: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule,
            message: message.into(),
            state: FieldState::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.state.value
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn dispatch(&mut self, event: FieldEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event);
    }

    pub fn is_valid(&self) -> bool {
        self.rule.check(&self.state.value)
    }

    /// Invalid and already touched
    pub fn has_error(&self) -> bool {
        !self.is_valid() && self.state.touched
    }

    /// Message to show next to the input, if any
    pub fn error(&self) -> Option<&str> {
        self.has_error().then_some(self.message.as_str())
    }

    pub fn phase(&self) -> FieldPhase {
        self.state.phase(self.rule)
    }
}

/// Per-field error returned from a failed submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// An ordered set of fields validated together
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<Field>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field registration
    pub fn field(mut self, name: &str, rule: Rule, message: &str) -> Self {
        self.fields.push(Field::new(name, rule, message));
        self
    }

    /// First name, last name and e-mail
    pub fn member_join() -> Self {
        Self::new()
            .field("first_name", Rule::NotEmpty, "First name must not be empty.")
            .field("last_name", Rule::NotEmpty, "Last name must not be empty.")
            .field("email", Rule::Email, "Please enter a valid email.")
    }

    /// Title and detail of a record
    pub fn record() -> Self {
        Self::new()
            .field("title", Rule::NotEmpty, "Title must not be empty.")
            .field("detail", Rule::NotEmpty, "Detail must not be empty.")
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Send an event to the named field; unknown names are ignored
    pub fn dispatch(&mut self, name: &str, event: FieldEvent) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.dispatch(event);
        } else {
            tracing::debug!(field = name, "event for unknown form field ignored");
        }
    }

    /// Type `value` into a field and leave it
    pub fn fill(&mut self, name: &str, value: &str) {
        self.dispatch(name, FieldEvent::Input(value.to_string()));
        self.dispatch(name, FieldEvent::Blur);
    }

    /// Conjunction over all fields
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(Field::is_valid)
    }

    /// Errors of touched, invalid fields
    pub fn errors(&self) -> Vec<FieldError> {
        self.fields
            .iter()
            .filter_map(|f| {
                f.error().map(|message| FieldError {
                    field: f.name.clone(),
                    message: message.to_string(),
                })
            })
            .collect()
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.dispatch(FieldEvent::Reset);
        }
    }

    /// Submit the form
    ///
    /// On failure the form is left exactly as it was and every invalid
    /// field is reported, touched or not. On success the entered values
    /// come back in field order and the form is reset.
    pub fn submit(&mut self) -> std::result::Result<Vec<(String, String)>, Vec<FieldError>> {
        if !self.is_valid() {
            return Err(self
                .fields
                .iter()
                .filter(|f| !f.is_valid())
                .map(|f| FieldError {
                    field: f.name.clone(),
                    message: f.message.clone(),
                })
                .collect());
        }
        let values = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.state.value.clone()))
            .collect();
        self.reset();
        Ok(values)
    }
}

/// Reject blank title or detail before they reach the store
pub fn validate_record_input(title: &str, detail: &str) -> Result<()> {
    let mut blank = Vec::new();
    if !is_not_empty(title) {
        blank.push("title");
    }
    if !is_not_empty(detail) {
        blank.push("detail");
    }
    if blank.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must not be empty",
            blank.join(" and ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_transitions() {
        let state = FieldState::default();
        assert_eq!(state.phase(Rule::NotEmpty), FieldPhase::Untouched);

        let state = state.reduce(FieldEvent::Input("  ".into()));
        assert!(!state.touched);
        assert_eq!(state.phase(Rule::NotEmpty), FieldPhase::Untouched);

        let state = state.reduce(FieldEvent::Blur);
        assert_eq!(state.phase(Rule::NotEmpty), FieldPhase::TouchedInvalid);

        let state = state.reduce(FieldEvent::Input("Kim".into()));
        assert!(state.touched);
        assert_eq!(state.phase(Rule::NotEmpty), FieldPhase::TouchedValid);

        let state = state.reduce(FieldEvent::Reset);
        assert_eq!(state, FieldState::default());
    }

    #[test]
    fn test_error_only_after_touch() {
        let mut field = Field::new("email", Rule::Email, "bad email");
        assert!(!field.is_valid());
        assert_eq!(field.error(), None);
        field.dispatch(FieldEvent::Blur);
        assert_eq!(field.error(), Some("bad email"));
    }

    #[test]
    fn test_email_rule() {
        for ok in ["a@b.co", "john.doe@example.com", "x_y-z@mail.example.org", "A1@B2.kr"] {
            assert!(is_email(ok), "{ok} should be accepted");
        }
        for bad in ["", "plain", "a@b", "a@b.c", "a@b.comm", ".a@b.com", "a..b@c.com", "a@b.c0m"] {
            assert!(!is_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_member_form_submit() {
        let mut form = Form::member_join();
        assert!(!form.is_valid());
        assert!(form.errors().is_empty());

        form.fill("first_name", "Gil-dong");
        form.fill("last_name", "Hong");
        form.fill("email", "not-an-email");
        let errors = form.submit().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");

        form.fill("email", "hong@example.com");
        let values = form.submit().unwrap();
        assert_eq!(values[2], ("email".to_string(), "hong@example.com".to_string()));
        assert!(form.fields().iter().all(|f| f.value().is_empty() && !f.state().touched));
    }

    #[test]
    fn test_failed_submit_leaves_form_untouched() {
        let mut form = Form::record();
        form.dispatch("detail", FieldEvent::Input("half typed".into()));
        let before: Vec<_> = form.fields().iter().map(|f| f.state().clone()).collect();

        let errors = form.submit().unwrap_err();
        let names: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["title"]);
        assert_eq!(errors[0].message, "Title must not be empty.");

        let after: Vec<_> = form.fields().iter().map(|f| f.state().clone()).collect();
        assert_eq!(before, after);
        assert!(form.errors().is_empty());
        assert_eq!(form.get("detail").unwrap().value(), "half typed");
    }

    #[test]
    fn test_validate_record_input() {
        assert!(validate_record_input("A", "a").is_ok());
        let err = validate_record_input(" ", "a").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: title must not be empty");
        let err = validate_record_input("", "\t").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: title and detail must not be empty"
        );
    }
}
