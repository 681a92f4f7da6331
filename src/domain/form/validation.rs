//! Client-side validation of drafts
//!
//! `validate` is pure: the same field set and draft always produce the same
//! ErrorMap. Each check writes to its own key, so check order never changes
//! the outcome.

use chrono::NaiveDate;

use crate::domain::user::{validate_email, validate_password, validate_password_confirmation};

use super::draft::{Draft, ErrorMap};
use super::field::{EntityKind, FieldKind, FieldRule, FieldSet, FormMode, account_field, user_field};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Validate a draft against its field set; empty iff acceptable
pub fn validate(fields: &FieldSet, draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();
    let user_type = match fields.entity {
        EntityKind::User => draft.user_type(),
        _ => None,
    };

    for rule in fields.visible_for(user_type) {
        check_field(rule, draft, &mut errors);
    }

    match fields.entity {
        EntityKind::User => {
            check_password_pair(
                draft,
                user_field::PASSWORD,
                Some(user_field::CONFIRM_PASSWORD),
                &mut errors,
            );
        }
        EntityKind::Account => {
            if fields.mode == FormMode::Create {
                check_password_pair(draft, account_field::MASTER_PASSWORD, None, &mut errors);
            }
            check_membership_period(draft, &mut errors);
        }
        EntityKind::Livestock => {}
    }

    errors
}

fn check_field(rule: &FieldRule, draft: &Draft, errors: &mut ErrorMap) {
    if rule.required && is_missing(rule, draft) {
        errors.insert(rule.name, rule.missing_message());
        return;
    }

    match &rule.kind {
        FieldKind::Email => {
            let value = draft.text(rule.name).trim();
            if value.is_empty() {
                return;
            }
            if let Err(e) = validate_email(value) {
                errors.insert(rule.name, e.to_string());
            }
        }
        FieldKind::Date => {
            let value = draft.text(rule.name);
            if !value.trim().is_empty() && parse_date(value).is_none() {
                errors.insert(
                    rule.name,
                    format!("{} must be a valid date (YYYY-MM-DD)", rule.label),
                );
            }
        }
        FieldKind::Number { min } => {
            let Some(value) = draft.number(rule.name) else {
                return;
            };
            if value < *min {
                let message = if *min == 0 {
                    format!("{} cannot be negative", rule.label)
                } else {
                    format!("{} must be at least {}", rule.label, min)
                };
                errors.insert(rule.name, message);
            }
        }
        FieldKind::Choice { options } => {
            let value = draft.text(rule.name);
            if !value.is_empty() && !options.iter().any(|option| *option == value) {
                let message = if rule.name == user_field::USER_TYPE {
                    "You are not authorized to assign this user type".to_string()
                } else {
                    format!("{} must be one of {}", rule.label, options.join(", "))
                };
                errors.insert(rule.name, message);
            }
        }
        FieldKind::Text | FieldKind::Secret | FieldKind::Flag => {}
    }
}

fn is_missing(rule: &FieldRule, draft: &Draft) -> bool {
    match rule.kind {
        FieldKind::Flag => draft.flag(rule.name).is_none(),
        FieldKind::Number { .. } => draft.number(rule.name).is_none(),
        // secrets are compared untrimmed
        FieldKind::Secret => draft.text(rule.name).is_empty(),
        _ => draft.text(rule.name).trim().is_empty(),
    }
}

/// Length and confirmation checks, only when a password was entered
fn check_password_pair(
    draft: &Draft,
    password_field: &str,
    confirm_field: Option<&str>,
    errors: &mut ErrorMap,
) {
    let password = draft.text(password_field);
    if password.is_empty() {
        return;
    }

    if let Err(e) = validate_password(password) {
        errors.insert(password_field, e.to_string());
    }

    if let Some(confirm_field) = confirm_field {
        if let Err(e) = validate_password_confirmation(password, draft.text(confirm_field)) {
            errors.insert(confirm_field, e.to_string());
        }
    }
}

fn check_membership_period(draft: &Draft, errors: &mut ErrorMap) {
    let start = parse_date(draft.text(account_field::MEMBERSHIP_START));
    let end = parse_date(draft.text(account_field::MEMBERSHIP_END));

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.insert(
                account_field::MEMBERSHIP_END,
                "Membership end cannot be before membership start",
            );
        }
    }
}
