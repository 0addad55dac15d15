//! Contact form rule table.
//!
//! Each field maps to an ordered list of checks. The validator walks the
//! table uniformly; adding a field means adding a row here, not touching
//! control flow.

use crate::i18n::LocaleRegistry;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::sync::OnceLock;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const COMPANY_MAX_CHARS: usize = 100;
pub const PHONE_MIN_CHARS: usize = 10;
pub const PHONE_MAX_CHARS: usize = 15;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// Form fields, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Company,
    Phone,
    Message,
    Language,
    Consent,
    Website,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Company => "company",
            Field::Phone => "phone",
            Field::Message => "message",
            Field::Language => "language",
            Field::Consent => "consent",
            Field::Website => "website",
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A field's raw value as seen by the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Flag(Option<bool>),
}

impl<'a> FieldValue<'a> {
    /// Absent, or an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.map_or(true, str::is_empty),
            FieldValue::Flag(flag) => flag.is_none(),
        }
    }

    fn text(&self) -> &'a str {
        match self {
            FieldValue::Text(text) => text.unwrap_or_default(),
            FieldValue::Flag(_) => "",
        }
    }
}

/// Named regex patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Latin and Arabic-script letters, ZWNJ, and whitespace
    PersonName,
    /// Optional leading `+`, then digits, whitespace, `-`, `(`, `)`
    Phone,
    Email,
}

static PERSON_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

impl Pattern {
    fn regex(&self) -> &'static Regex {
        match self {
            Pattern::PersonName => PERSON_NAME_REGEX.get_or_init(|| {
                Regex::new(
                    r"^[a-zA-Z\x{0600}-\x{06FF}\x{0750}-\x{077F}\x{08A0}-\x{08FF}\x{FB50}-\x{FDFF}\x{FE70}-\x{FEFF}\x{200C}\s]+$",
                )
                .unwrap()
            }),
            Pattern::Phone => PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[0-9\s\-()]+$").unwrap()),
            Pattern::Email => EMAIL_REGEX.get_or_init(|| {
                Regex::new(
                    r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
                )
                .unwrap()
            }),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex().is_match(text)
    }
}

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Present and not only whitespace
    Required,
    MinChars(usize),
    MaxChars(usize),
    Matches(Pattern),
    /// One of the registry's locale codes
    SupportedLocale,
    MustBeTrue,
    MustBeEmpty,
}

impl Constraint {
    /// Whether `value` satisfies this constraint. Lengths count Unicode
    /// scalar values.
    pub fn accepts(&self, value: &FieldValue<'_>) -> bool {
        let text = value.text();
        match self {
            Constraint::Required => !text.trim().is_empty(),
            Constraint::MinChars(min) => text.chars().count() >= *min,
            Constraint::MaxChars(max) => text.chars().count() <= *max,
            Constraint::Matches(pattern) => pattern.is_match(text),
            Constraint::SupportedLocale => LocaleRegistry::get().is_supported(text),
            Constraint::MustBeTrue => matches!(value, FieldValue::Flag(Some(true))),
            Constraint::MustBeEmpty => value.is_blank(),
        }
    }
}

/// A constraint with the message shown when it fails.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub constraint: Constraint,
    /// Translation key for the localized message
    pub message_key: &'static str,
    /// English message, used in logs and when no store is at hand
    pub message: &'static str,
}

const fn check(constraint: Constraint, message_key: &'static str, message: &'static str) -> Check {
    Check {
        constraint,
        message_key,
        message,
    }
}

/// How a field participates in validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Required,
    /// Skipped entirely when blank
    Optional,
    /// Anti-spam trap; a failure discards the whole submission
    Honeypot,
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub kind: FieldKind,
    /// Evaluated in order; the first failure is the field's error
    pub checks: &'static [Check],
}

/// The contact form rule table.
pub const CONTACT_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        kind: FieldKind::Required,
        checks: &[
            check(Constraint::Required, "contact.errors.name.required", "Name is required"),
            check(
                Constraint::MinChars(NAME_MIN_CHARS),
                "contact.errors.name.min",
                "Name must be at least 2 characters",
            ),
            check(
                Constraint::MaxChars(NAME_MAX_CHARS),
                "contact.errors.name.max",
                "Name must be less than 100 characters",
            ),
            check(
                Constraint::Matches(Pattern::PersonName),
                "contact.errors.name.pattern",
                "Name can only contain letters and spaces",
            ),
        ],
    },
    FieldRule {
        field: Field::Email,
        kind: FieldKind::Required,
        checks: &[
            check(Constraint::Required, "contact.errors.email.required", "Email is required"),
            check(
                Constraint::MaxChars(EMAIL_MAX_CHARS),
                "contact.errors.email.max",
                "Email must be less than 254 characters",
            ),
            check(
                Constraint::Matches(Pattern::Email),
                "contact.errors.email.invalid",
                "Please enter a valid email address",
            ),
        ],
    },
    FieldRule {
        field: Field::Company,
        kind: FieldKind::Optional,
        checks: &[check(
            Constraint::MaxChars(COMPANY_MAX_CHARS),
            "contact.errors.company.max",
            "Company name must be less than 100 characters",
        )],
    },
    FieldRule {
        field: Field::Phone,
        kind: FieldKind::Optional,
        checks: &[
            check(
                Constraint::MinChars(PHONE_MIN_CHARS),
                "contact.errors.phone.min",
                "Phone number must be at least 10 characters",
            ),
            check(
                Constraint::MaxChars(PHONE_MAX_CHARS),
                "contact.errors.phone.max",
                "Phone number must be less than 15 characters",
            ),
            check(
                Constraint::Matches(Pattern::Phone),
                "contact.errors.phone.pattern",
                "Please enter a valid phone number",
            ),
        ],
    },
    FieldRule {
        field: Field::Message,
        kind: FieldKind::Required,
        checks: &[
            check(Constraint::Required, "contact.errors.message.required", "Message is required"),
            check(
                Constraint::MinChars(MESSAGE_MIN_CHARS),
                "contact.errors.message.min",
                "Message must be at least 10 characters",
            ),
            check(
                Constraint::MaxChars(MESSAGE_MAX_CHARS),
                "contact.errors.message.max",
                "Message must be less than 1000 characters",
            ),
        ],
    },
    FieldRule {
        field: Field::Language,
        kind: FieldKind::Required,
        checks: &[check(
            Constraint::SupportedLocale,
            "contact.errors.language.invalid",
            "Language is required",
        )],
    },
    FieldRule {
        field: Field::Consent,
        kind: FieldKind::Required,
        checks: &[check(
            Constraint::MustBeTrue,
            "contact.errors.consent.required",
            "You must agree to the privacy policy",
        )],
    },
    FieldRule {
        field: Field::Website,
        kind: FieldKind::Honeypot,
        checks: &[check(
            Constraint::MustBeEmpty,
            "contact.errors.website.filled",
            "This field should be empty",
        )],
    },
];
