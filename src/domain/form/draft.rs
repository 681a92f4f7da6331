//! Form-local copy of an entity's editable fields

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::domain::identity::Role;

use super::field::{EntityKind, FieldKind, FieldSet, FormMode, user_field};

/// Errors raised while opening or editing a form
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field '{0}' cannot be changed")]
    LockedField(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("A {role} may not {mode} this {entity}")]
    NotPermitted {
        entity: EntityKind,
        mode: FormMode,
        role: Role,
    },

    #[error("Form is not accepting edits")]
    NotOpen,
}

impl FormError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Number(i64),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Reject a value whose variant does not match the field kind
    pub fn check_kind(&self, name: &str, kind: &FieldKind) -> Result<(), FormError> {
        let expected = match kind {
            FieldKind::Flag => "expected true or false",
            FieldKind::Number { .. } => "expected a whole number",
            _ => "expected text",
        };
        let fits = matches!(
            (kind, self),
            (FieldKind::Flag, Self::Flag(_))
                | (FieldKind::Number { .. }, Self::Number(_))
                | (
                    FieldKind::Text
                        | FieldKind::Email
                        | FieldKind::Secret
                        | FieldKind::Date
                        | FieldKind::Choice { .. },
                    Self::Text(_)
                )
        );

        if fits {
            Ok(())
        } else {
            Err(FormError::invalid_value(name, expected))
        }
    }

    /// Parse raw input according to the field kind
    pub fn parse(name: &str, kind: &FieldKind, raw: &str) -> Result<Self, FormError> {
        match kind {
            FieldKind::Flag => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(Self::Flag(true)),
                "false" | "no" | "0" | "off" => Ok(Self::Flag(false)),
                _ => Err(FormError::invalid_value(name, "expected true or false")),
            },
            FieldKind::Number { .. } => raw
                .trim()
                .parse::<i64>()
                .map(Self::Number)
                .map_err(|_| FormError::invalid_value(name, "expected a whole number")),
            FieldKind::Choice { options } => {
                let wanted = raw.trim().to_ascii_uppercase();
                options
                    .iter()
                    .find(|option| **option == wanted)
                    .map(|option| Self::text(*option))
                    .ok_or_else(|| {
                        FormError::invalid_value(
                            name,
                            format!("expected one of {}", options.join(", ")),
                        )
                    })
            }
            FieldKind::Text | FieldKind::Email | FieldKind::Secret | FieldKind::Date => {
                Ok(Self::text(raw))
            }
        }
    }
}

/// Namespaced key/value mapping restricted to the fields of one form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    allowed: BTreeSet<&'static str>,
    values: BTreeMap<&'static str, FieldValue>,
}

impl Draft {
    /// An empty draft accepting only the visible fields of `fields`
    pub fn for_fields(fields: &FieldSet) -> Self {
        Self {
            allowed: fields.visible().map(|rule| rule.name).collect(),
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) -> Result<(), FormError> {
        let key = self
            .allowed
            .get(name)
            .copied()
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Text value, or "" when absent or not text
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(value)) => value,
            _ => "",
        }
    }

    /// Trimmed text, `None` when blank
    pub fn optional_text(&self, name: &str) -> Option<String> {
        let value = self.text(name).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(FieldValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Selected user type of a user draft
    pub fn user_type(&self) -> Option<Role> {
        self.text(user_field::USER_TYPE).parse().ok()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Field name to human-readable validation message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl std::fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::field::{account_field, field_rules};

    #[test]
    fn test_draft_rejects_fields_outside_the_set() {
        let fields = field_rules(EntityKind::User, FormMode::Create, Role::Customer);
        let mut draft = Draft::for_fields(&fields);

        assert!(draft.insert(user_field::USERNAME, FieldValue::text("bob")).is_ok());
        assert_eq!(
            draft.insert(user_field::LICENSE_NUMBER, FieldValue::text("VET-1")),
            Err(FormError::UnknownField("licenseNumber".to_string()))
        );
        assert_eq!(
            draft.insert("nickname", FieldValue::text("b")),
            Err(FormError::UnknownField("nickname".to_string()))
        );
        assert!(draft.contains(user_field::USERNAME));
        assert!(!draft.contains(user_field::LICENSE_NUMBER));
        assert!(!draft.contains("nickname"));
    }

    #[test]
    fn test_namespaced_keys() {
        let fields = field_rules(EntityKind::Account, FormMode::Create, Role::Administrator);
        let mut draft = Draft::for_fields(&fields);

        draft
            .insert(account_field::MASTER_EMAIL, FieldValue::text("o@farm.com"))
            .unwrap();
        assert_eq!(draft.text("masterUser.email"), "o@farm.com");
    }

    #[test]
    fn test_typed_accessors() {
        let fields = field_rules(EntityKind::User, FormMode::Create, Role::Administrator);
        let mut draft = Draft::for_fields(&fields);

        draft.insert(user_field::IS_ACTIVE, FieldValue::Flag(false)).unwrap();
        draft.insert(user_field::ACCESS_LEVEL, FieldValue::Number(3)).unwrap();
        draft.insert(user_field::PHONE_NUMBER, FieldValue::text("   ")).unwrap();
        draft
            .insert(user_field::USER_TYPE, FieldValue::text("ADMINISTRATOR"))
            .unwrap();

        assert_eq!(draft.flag(user_field::IS_ACTIVE), Some(false));
        assert_eq!(draft.number(user_field::ACCESS_LEVEL), Some(3));
        assert_eq!(draft.optional_text(user_field::PHONE_NUMBER), None);
        assert_eq!(draft.text(user_field::EMAIL), "");
        assert_eq!(draft.user_type(), Some(Role::Administrator));
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(
            FieldValue::parse("isActive", &FieldKind::Flag, "no"),
            Ok(FieldValue::Flag(false))
        );
        assert_eq!(
            FieldValue::parse("accessLevel", &FieldKind::Number { min: 1 }, " 4 "),
            Ok(FieldValue::Number(4))
        );
        assert!(FieldValue::parse("accessLevel", &FieldKind::Number { min: 1 }, "four").is_err());

        let choice = FieldKind::Choice {
            options: vec!["CUSTOMER", "VETERINARIAN"],
        };
        assert_eq!(
            FieldValue::parse("userType", &choice, "veterinarian"),
            Ok(FieldValue::text("VETERINARIAN"))
        );
        assert!(FieldValue::parse("userType", &choice, "ADMINISTRATOR").is_err());
    }

    #[test]
    fn test_error_map_display_is_ordered() {
        let errors: ErrorMap = [("username", "Username is required"), ("email", "Email is required")]
            .into_iter()
            .collect();

        assert_eq!(
            errors.to_string(),
            "email: Email is required; username: Username is required"
        );
        assert_eq!(errors.len(), 2);
    }
}
