//! Contact form validation.
//!
//! - `rules`: The field → constraints → message table
//! - `form`: Raw input, validated submission, and error types
//! - `validator`: Evaluates the table over a submission
//!
//! Validation is pure. Delivering an accepted submission is the job of
//! [`crate::transport`].

mod form;
pub mod rules;
mod validator;

pub use form::{
    sanitize_text, ContactError, ContactFormSubmission, FieldError, FieldErrors, RawFormFields,
};
pub use rules::{Field, CONTACT_RULES};
pub use validator::{validate, validate_with};
