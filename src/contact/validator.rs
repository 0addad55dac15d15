use crate::contact::form::{
    ContactError, ContactFormSubmission, FieldError, FieldErrors, RawFormFields,
};
use crate::contact::rules::{Field, FieldKind, FieldRule, CONTACT_RULES};
use crate::i18n::Locale;
use chrono::Utc;

/// Validate a contact form against [`CONTACT_RULES`].
///
/// Every field is checked and all failures are returned together, one per
/// field. A filled honeypot wins over everything else.
pub fn validate(input: &RawFormFields) -> Result<ContactFormSubmission, ContactError> {
    validate_with(CONTACT_RULES, input)
}

/// Validate against an arbitrary rule table.
///
/// Checks run on [`RawFormFields::normalized`], the same values the
/// submission is built from.
pub fn validate_with(
    rules: &[FieldRule],
    input: &RawFormFields,
) -> Result<ContactFormSubmission, ContactError> {
    let input = input.normalized();
    let mut errors = FieldErrors::new();
    let mut honeypot = false;

    for rule in rules {
        let value = input.value(rule.field);
        if rule.kind == FieldKind::Optional && value.is_blank() {
            continue;
        }

        let failed = rule
            .checks
            .iter()
            .find(|check| !check.constraint.accepts(&value));

        if let Some(check) = failed {
            if rule.kind == FieldKind::Honeypot {
                honeypot = true;
            }
            errors.push(FieldError {
                field: rule.field,
                message_key: check.message_key,
                message: check.message,
            });
        }
    }

    if honeypot {
        return Err(ContactError::Honeypot);
    }

    let language = input
        .language
        .as_deref()
        .and_then(|code| Locale::from_code(code).ok());

    match language {
        Some(language) if errors.is_empty() => Ok(build_submission(input, language)),
        Some(_) => Err(ContactError::Fields(errors)),
        None => {
            // A table without a language row still cannot yield a submission.
            if !errors.contains(Field::Language) {
                errors.push(FieldError {
                    field: Field::Language,
                    message_key: "contact.errors.language.invalid",
                    message: "Language is required",
                });
            }
            Err(ContactError::Fields(errors))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn build_submission(input: RawFormFields, language: Locale) -> ContactFormSubmission {
    ContactFormSubmission {
        name: input.name.unwrap_or_default(),
        email: input.email.unwrap_or_default().to_lowercase(),
        company: non_empty(input.company),
        phone: non_empty(input.phone),
        message: input.message.unwrap_or_default(),
        language,
        consent: true,
        submitted_at: Utc::now(),
    }
}
