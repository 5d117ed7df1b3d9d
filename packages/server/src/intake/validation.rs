//! Normalizes raw form input into a [`ContactDraft`] or a list of field errors.
//!
//! Every rule runs, so the caller sees all problems at once. Nothing here
//! touches storage or email.

use common::{ContactStatus, ServiceInterest, WEBSITE_SOURCE};

use super::{email, html};
use crate::models::contact::{ContactDraft, ContactForm, FieldError, RequestContext};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 2000;
pub const PHONE_MAX: usize = 20;
pub const COMPANY_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(ContactDraft),
    Invalid(Vec<FieldError>),
}

/// Error reported when the honeypot is filled. Deliberately says nothing about why.
pub fn rejected_submission() -> FieldError {
    FieldError::new(
        "form",
        "submission_invalid",
        "Your submission could not be processed",
    )
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

/// Optional field: blank counts as absent.
fn optional(value: &Option<String>) -> Option<&str> {
    Some(trimmed(value)).filter(|v| !v.is_empty())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate(form: &ContactForm, ctx: RequestContext) -> Validation {
    if optional(&form.website).is_some() {
        return Validation::Invalid(vec![rejected_submission()]);
    }

    let mut errors = Vec::new();

    let name = trimmed(&form.name);
    if !(NAME_MIN..=NAME_MAX).contains(&char_len(name)) {
        errors.push(FieldError::new(
            "name",
            "name_invalid",
            format!("Name must be between {NAME_MIN} and {NAME_MAX} characters"),
        ));
    }

    let email = email::normalize(trimmed(&form.email));
    if email.is_none() {
        errors.push(FieldError::new(
            "email",
            "email_invalid",
            "Please provide a valid email address",
        ));
    }

    let message = trimmed(&form.message);
    if !(MESSAGE_MIN..=MESSAGE_MAX).contains(&char_len(message)) {
        errors.push(FieldError::new(
            "message",
            "message_invalid",
            format!("Message must be between {MESSAGE_MIN} and {MESSAGE_MAX} characters"),
        ));
    }

    let phone = optional(&form.phone);
    if phone.is_some_and(|p| char_len(p) > PHONE_MAX) {
        errors.push(FieldError::new(
            "phone",
            "phone_invalid",
            format!("Phone number must be at most {PHONE_MAX} characters"),
        ));
    }

    let company = optional(&form.company);
    if company.is_some_and(|c| char_len(c) > COMPANY_MAX) {
        errors.push(FieldError::new(
            "company",
            "company_invalid",
            format!("Company name must be at most {COMPANY_MAX} characters"),
        ));
    }

    let Some(email) = email else {
        return Validation::Invalid(errors);
    };
    if !errors.is_empty() {
        return Validation::Invalid(errors);
    }

    let service_interest = ServiceInterest::coerce(trimmed(&form.service_interest));

    Validation::Valid(ContactDraft {
        name: html::escape(name),
        email,
        message: html::escape(message),
        phone: phone.map(html::escape),
        company: company.map(html::escape),
        service_interest,
        source: WEBSITE_SOURCE.to_string(),
        status: ContactStatus::New,
        priority: service_interest.lead_priority(),
        ip_address: ctx.ip_address,
        user_agent: ctx.user_agent,
        session_id: None,
        metadata: None,
    })
}
