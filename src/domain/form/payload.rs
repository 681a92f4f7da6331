//! Request bodies built from validated drafts
//!
//! User payloads are a tagged union keyed by `userType`; each variant has its
//! own builder and carries only the fields of that type.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::account::AccountStatus;
use crate::domain::identity::Role;

use super::draft::{Draft, FormError};
use super::field::{EntityKind, FieldSet, FormMode, account_field, livestock_field, user_field};
use super::validation::parse_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
}

impl CustomerDetails {
    fn from_draft(draft: &Draft) -> Self {
        Self {
            customer_number: draft.optional_text(user_field::CUSTOMER_NUMBER),
            emergency_contact: draft.optional_text(user_field::EMERGENCY_CONTACT),
            emergency_phone: draft.optional_text(user_field::EMERGENCY_PHONE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<i64>,
}

impl AdministratorDetails {
    fn from_draft(draft: &Draft) -> Self {
        Self {
            department: draft.optional_text(user_field::DEPARTMENT),
            access_level: draft.number(user_field::ACCESS_LEVEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinarianDetails {
    pub license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<i64>,
}

impl VeterinarianDetails {
    fn from_draft(draft: &Draft) -> Self {
        Self {
            license_number: draft.text(user_field::LICENSE_NUMBER).trim().to_string(),
            specialization: draft.optional_text(user_field::SPECIALIZATION),
            clinic_name: draft.optional_text(user_field::CLINIC_NAME),
            clinic_address: draft.optional_text(user_field::CLINIC_ADDRESS),
            years_experience: draft.number(user_field::YEARS_EXPERIENCE),
        }
    }
}

/// Type-specific part of a user payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "userType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserDetails {
    Customer(CustomerDetails),
    Administrator(AdministratorDetails),
    Veterinarian(VeterinarianDetails),
}

impl UserDetails {
    pub fn user_type(&self) -> Role {
        match self {
            Self::Customer(_) => Role::Customer,
            Self::Administrator(_) => Role::Administrator,
            Self::Veterinarian(_) => Role::Veterinarian,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub details: UserDetails,
}

impl UserPayload {
    pub fn from_draft(draft: &Draft) -> Result<Self, FormError> {
        let user_type = draft.user_type().ok_or_else(|| {
            FormError::invalid_value(user_field::USER_TYPE, "a user type must be selected")
        })?;

        let details = match user_type {
            Role::Customer => UserDetails::Customer(CustomerDetails::from_draft(draft)),
            Role::Administrator => {
                UserDetails::Administrator(AdministratorDetails::from_draft(draft))
            }
            Role::Veterinarian => UserDetails::Veterinarian(VeterinarianDetails::from_draft(draft)),
        };

        // a blank password in EDIT mode means "unchanged"
        let password = Some(draft.text(user_field::PASSWORD))
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            username: draft.text(user_field::USERNAME).trim().to_string(),
            email: draft.text(user_field::EMAIL).trim().to_string(),
            first_name: draft.text(user_field::FIRST_NAME).trim().to_string(),
            last_name: draft.text(user_field::LAST_NAME).trim().to_string(),
            phone_number: draft.optional_text(user_field::PHONE_NUMBER),
            password,
            is_active: draft.flag(user_field::IS_ACTIVE),
            details,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterUserPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    pub farm_name: String,
    pub status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_user: Option<MasterUserPayload>,
}

impl AccountPayload {
    pub fn from_draft(draft: &Draft, mode: FormMode) -> Result<Self, FormError> {
        let status = draft
            .text(account_field::STATUS)
            .parse::<AccountStatus>()
            .map_err(|e| FormError::invalid_value(account_field::STATUS, e))?;

        let master_user = (mode == FormMode::Create).then(|| MasterUserPayload {
            username: draft.text(account_field::MASTER_USERNAME).trim().to_string(),
            email: draft.text(account_field::MASTER_EMAIL).trim().to_string(),
            password: draft.text(account_field::MASTER_PASSWORD).to_string(),
            first_name: draft.text(account_field::MASTER_FIRST_NAME).trim().to_string(),
            last_name: draft.text(account_field::MASTER_LAST_NAME).trim().to_string(),
            phone_number: draft.optional_text(account_field::MASTER_PHONE_NUMBER),
        });

        Ok(Self {
            farm_name: draft.text(account_field::FARM_NAME).trim().to_string(),
            status,
            membership_start: optional_date(draft, account_field::MEMBERSHIP_START)?,
            membership_end: optional_date(draft, account_field::MEMBERSHIP_END)?,
            master_user,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockPayload {
    pub tag_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livestock_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    pub date_of_birth: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LivestockPayload {
    pub fn from_draft(draft: &Draft) -> Result<Self, FormError> {
        let date_of_birth = optional_date(draft, livestock_field::DATE_OF_BIRTH)?.ok_or_else(
            || FormError::invalid_value(livestock_field::DATE_OF_BIRTH, "a date is required"),
        )?;

        Ok(Self {
            tag_id: draft.text(livestock_field::TAG_ID).trim().to_string(),
            name: draft.text(livestock_field::NAME).trim().to_string(),
            livestock_type: draft.optional_text(livestock_field::LIVESTOCK_TYPE),
            breed: draft.optional_text(livestock_field::BREED),
            date_of_birth,
            description: draft.optional_text(livestock_field::DESCRIPTION),
        })
    }
}

fn optional_date(draft: &Draft, field: &str) -> Result<Option<NaiveDate>, FormError> {
    match draft.optional_text(field) {
        None => Ok(None),
        Some(value) => parse_date(&value)
            .map(Some)
            .ok_or_else(|| FormError::invalid_value(field, "expected YYYY-MM-DD")),
    }
}

/// Minimal request body for a validated draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    User(UserPayload),
    Account(AccountPayload),
    Livestock(LivestockPayload),
}

pub fn build_payload(fields: &FieldSet, draft: &Draft) -> Result<Payload, FormError> {
    match fields.entity {
        EntityKind::User => UserPayload::from_draft(draft).map(Payload::User),
        EntityKind::Account => AccountPayload::from_draft(draft, fields.mode).map(Payload::Account),
        EntityKind::Livestock => LivestockPayload::from_draft(draft).map(Payload::Livestock),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::form::draft::FieldValue;
    use crate::domain::form::field::field_rules;

    fn user_draft(role: Role, mode: FormMode, values: &[(&str, FieldValue)]) -> (FieldSet, Draft) {
        let fields = field_rules(EntityKind::User, mode, role);
        let mut draft = Draft::for_fields(&fields);
        for (name, value) in values {
            draft.insert(name, value.clone()).unwrap();
        }
        (fields, draft)
    }

    #[test]
    fn test_customer_payload_omits_blank_optionals() {
        let (fields, draft) = user_draft(
            Role::Customer,
            FormMode::Create,
            &[
                (user_field::USERNAME, FieldValue::text(" bob ")),
                (user_field::EMAIL, FieldValue::text("bob@farm.com")),
                (user_field::FIRST_NAME, FieldValue::text("Bob")),
                (user_field::LAST_NAME, FieldValue::text("Stone")),
                (user_field::PHONE_NUMBER, FieldValue::text("")),
                (user_field::USER_TYPE, FieldValue::text("CUSTOMER")),
                (user_field::PASSWORD, FieldValue::text("secret1")),
                (user_field::CONFIRM_PASSWORD, FieldValue::text("secret1")),
                (user_field::EMERGENCY_CONTACT, FieldValue::text("Jane")),
            ],
        );

        let payload = build_payload(&fields, &draft).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "username": "bob",
                "email": "bob@farm.com",
                "firstName": "Bob",
                "lastName": "Stone",
                "password": "secret1",
                "userType": "CUSTOMER",
                "emergencyContact": "Jane"
            })
        );
    }

    #[test]
    fn test_edit_without_password_omits_it() {
        let (_, draft) = user_draft(
            Role::Administrator,
            FormMode::Edit,
            &[
                (user_field::USERNAME, FieldValue::text("ann")),
                (user_field::USER_TYPE, FieldValue::text("ADMINISTRATOR")),
                (user_field::PASSWORD, FieldValue::text("")),
                (user_field::IS_ACTIVE, FieldValue::Flag(true)),
                (user_field::ACCESS_LEVEL, FieldValue::Number(2)),
                (user_field::CUSTOMER_NUMBER, FieldValue::text("C-1")),
            ],
        );

        let payload = UserPayload::from_draft(&draft).unwrap();
        assert!(payload.password.is_none());
        assert_eq!(payload.is_active, Some(true));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["userType"], "ADMINISTRATOR");
        assert_eq!(value["accessLevel"], 2);
        assert!(value.get("password").is_none());
        assert!(value.get("customerNumber").is_none());
    }

    #[test]
    fn test_veterinarian_variant_carries_only_vet_fields() {
        let (_, draft) = user_draft(
            Role::Administrator,
            FormMode::Create,
            &[
                (user_field::USER_TYPE, FieldValue::text("VETERINARIAN")),
                (user_field::LICENSE_NUMBER, FieldValue::text("VET-991")),
                (user_field::YEARS_EXPERIENCE, FieldValue::Number(12)),
                (user_field::DEPARTMENT, FieldValue::text("Ops")),
            ],
        );

        let payload = UserPayload::from_draft(&draft).unwrap();
        assert_eq!(payload.details.user_type(), Role::Veterinarian);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["licenseNumber"], "VET-991");
        assert_eq!(value["yearsExperience"], 12);
        assert!(value.get("department").is_none());
    }

    #[test]
    fn test_account_payload_master_user_only_on_create() {
        let fields = field_rules(EntityKind::Account, FormMode::Create, Role::Administrator);
        let mut draft = Draft::for_fields(&fields);
        for (name, value) in [
            (account_field::FARM_NAME, "Green Acres"),
            (account_field::STATUS, "TRIAL"),
            (account_field::MEMBERSHIP_START, "2024-01-01"),
            (account_field::MEMBERSHIP_END, ""),
            (account_field::MASTER_USERNAME, "owner"),
            (account_field::MASTER_EMAIL, "owner@farm.com"),
            (account_field::MASTER_PASSWORD, "secret1"),
            (account_field::MASTER_FIRST_NAME, "Olive"),
            (account_field::MASTER_LAST_NAME, "Owens"),
        ] {
            draft.insert(name, FieldValue::text(value)).unwrap();
        }

        let create = AccountPayload::from_draft(&draft, FormMode::Create).unwrap();
        let value = serde_json::to_value(&create).unwrap();
        assert_eq!(value["status"], "TRIAL");
        assert_eq!(value["membershipStart"], "2024-01-01");
        assert!(value.get("membershipEnd").is_none());
        assert_eq!(value["masterUser"]["username"], "owner");

        let edit = AccountPayload::from_draft(&draft, FormMode::Edit).unwrap();
        assert!(edit.master_user.is_none());
    }

    #[test]
    fn test_livestock_payload() {
        let fields = field_rules(EntityKind::Livestock, FormMode::Create, Role::Customer);
        let mut draft = Draft::for_fields(&fields);
        for (name, value) in [
            (livestock_field::TAG_ID, "COW-001"),
            (livestock_field::NAME, "Bessie"),
            (livestock_field::LIVESTOCK_TYPE, "Cattle"),
            (livestock_field::BREED, ""),
            (livestock_field::DATE_OF_BIRTH, "2020-03-15"),
        ] {
            draft.insert(name, FieldValue::text(value)).unwrap();
        }

        let Payload::Livestock(payload) = build_payload(&fields, &draft).unwrap() else {
            panic!("expected a livestock payload");
        };
        assert_eq!(payload.breed, None);
        assert_eq!(payload.date_of_birth, NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        assert_eq!(
            serde_json::to_value(&payload).unwrap()["dateOfBirth"],
            "2020-03-15"
        );
    }
}
