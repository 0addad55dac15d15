//! Contact form data: raw input, the validated submission, and errors.

use crate::contact::rules::{Field, FieldValue};
use crate::i18n::{Locale, TranslationStore};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Form fields exactly as the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawFormFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub language: Option<String>,
    pub consent: Option<bool>,
    /// Honeypot; hidden from humans, so only bots fill it
    pub website: Option<String>,
}

impl RawFormFields {
    /// Value of a field for the rule table.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Name => FieldValue::Text(self.name.as_deref()),
            Field::Email => FieldValue::Text(self.email.as_deref()),
            Field::Company => FieldValue::Text(self.company.as_deref()),
            Field::Phone => FieldValue::Text(self.phone.as_deref()),
            Field::Message => FieldValue::Text(self.message.as_deref()),
            Field::Language => FieldValue::Text(self.language.as_deref()),
            Field::Consent => FieldValue::Flag(self.consent),
            Field::Website => FieldValue::Text(self.website.as_deref()),
        }
    }

    /// The form as it will be stored: name, email and phone trimmed, company
    /// and message sanitized. Rules are checked against this, so an accepted
    /// submission satisfies them as stored.
    ///
    /// `language` is left as sent (codes match exactly) and the honeypot is
    /// left untouched.
    pub fn normalized(&self) -> RawFormFields {
        let trimmed = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_string());
        let sanitized = |value: &Option<String>| value.as_deref().map(sanitize_text);

        RawFormFields {
            name: trimmed(&self.name),
            email: trimmed(&self.email),
            company: sanitized(&self.company),
            phone: trimmed(&self.phone),
            message: sanitized(&self.message),
            language: self.language.clone(),
            consent: self.consent,
            website: self.website.clone(),
        }
    }
}

/// A validated submission, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactFormSubmission {
    pub name: String,
    /// Lower-cased
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub language: Locale,
    pub consent: bool,
    pub submitted_at: DateTime<Utc>,
}

/// One field's validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message_key: &'static str,
    pub message: &'static str,
}

/// Every failing field of a submission, at most one error per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field == field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|error| error.field).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field name → message in `locale`, for annotating the form.
    pub fn localized(&self, store: &TranslationStore, locale: Locale) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|error| {
                let message = store.translate(locale, error.message_key);
                (error.field.as_str().to_string(), message.to_string())
            })
            .collect()
    }
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// Recoverable; the user corrects the listed fields and resubmits.
    #[error("{} field(s) failed validation", .0.len())]
    Fields(FieldErrors),

    /// Bot submission. Report success to the sender and drop it.
    #[error("honeypot field was filled")]
    Honeypot,
}

static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Trim, strip `<` and `>`, and collapse whitespace runs to a single space.
pub fn sanitize_text(input: &str) -> String {
    let regex = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    let stripped: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    regex.replace_all(stripped.trim(), " ").into_owned()
}
