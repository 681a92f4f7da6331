//! Lifecycle of an open create/edit form
//!
//! CLOSED -> OPEN -> VALIDATING -> SUBMITTING -> CLOSED on success, or back
//! to OPEN with errors. Cancel returns to CLOSED from any phase.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::account::Account;
use crate::domain::api::AdminApi;
use crate::domain::error::ApiError;
use crate::domain::identity::Role;
use crate::domain::livestock::Livestock;
use crate::domain::user::User;

use super::draft::{Draft, ErrorMap, FieldValue, FormError};
use super::field::{
    EntityKind, FieldKind, FieldRule, FieldSet, FormMode, account_field, can_edit_user, can_open,
    field_rules, livestock_field, user_field,
};
use super::messages::submit_error_message;
use super::payload::{Payload, build_payload};
use super::validation::{DATE_FORMAT, validate};

/// ErrorMap key holding the server-side failure message
pub const SUBMIT_ERROR_KEY: &str = "submit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    Closed,
    Open,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Invalid(ErrorMap),

    #[error("A submit is already in progress")]
    AlreadySubmitting,

    #[error("Form is closed")]
    NotOpen,

    #[error("Response arrived after the form was closed")]
    Stale,

    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Existing entity an EDIT form starts from
#[derive(Debug, Clone, Copy)]
pub enum EditTarget<'a> {
    User(&'a User),
    Account(&'a Account),
    Livestock(&'a Livestock),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SavedEntity {
    User(User),
    Account(Account),
    Livestock(Livestock),
}

/// Identifies one submit attempt of one opening of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
}

/// Request produced by `begin_submit`, ready to be sent
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    pub ticket: SubmitTicket,
    pub entity: EntityKind,
    pub target_id: Option<i64>,
    pub payload: Payload,
}

impl PendingSubmit {
    /// Dispatch to the create or update endpoint of the entity
    pub async fn send(&self, api: &dyn AdminApi) -> Result<SavedEntity, ApiError> {
        match (&self.payload, self.target_id) {
            (Payload::User(p), None) => api.create_user(p).await.map(SavedEntity::User),
            (Payload::User(p), Some(id)) => api.update_user(id, p).await.map(SavedEntity::User),
            (Payload::Account(p), None) => api.create_account(p).await.map(SavedEntity::Account),
            (Payload::Account(p), Some(id)) => {
                api.update_account(id, p).await.map(SavedEntity::Account)
            }
            (Payload::Livestock(p), None) => {
                api.create_livestock(p).await.map(SavedEntity::Livestock)
            }
            (Payload::Livestock(p), Some(id)) => {
                api.update_livestock(id, p).await.map(SavedEntity::Livestock)
            }
        }
    }
}

/// An open create/edit form: field descriptor, draft and errors
#[derive(Debug, Clone)]
pub struct EntityForm {
    fields: FieldSet,
    target_id: Option<i64>,
    draft: Draft,
    errors: ErrorMap,
    phase: FormPhase,
    generation: u64,
}

impl EntityForm {
    /// Open a CREATE form initialised with the role-specific defaults
    pub fn open_create(entity: EntityKind, actor: Role) -> Result<Self, FormError> {
        let mut form = Self::open(entity, FormMode::Create, actor, None)?;

        let defaults: Vec<(&'static str, FieldValue)> = form
            .fields
            .visible()
            .map(|rule| (rule.name, default_value(rule)))
            .collect();
        for (name, value) in defaults {
            form.draft.insert(name, value)?;
        }

        Ok(form)
    }

    /// Open an EDIT form pre-populated from `target`; secrets stay blank
    pub fn open_edit(target: EditTarget<'_>, actor: Role) -> Result<Self, FormError> {
        let (entity, id) = match target {
            EditTarget::User(user) => (EntityKind::User, user.id),
            EditTarget::Account(account) => (EntityKind::Account, account.id),
            EditTarget::Livestock(livestock) => (EntityKind::Livestock, livestock.id),
        };

        if let EditTarget::User(user) = target {
            if !can_edit_user(actor, user.user_type) {
                return Err(FormError::NotPermitted {
                    entity,
                    mode: FormMode::Edit,
                    role: actor,
                });
            }
        }

        let mut form = Self::open(entity, FormMode::Edit, actor, Some(id))?;
        let values = match target {
            EditTarget::User(user) => user_values(user),
            EditTarget::Account(account) => account_values(account),
            EditTarget::Livestock(livestock) => livestock_values(livestock),
        };

        let defaults: Vec<(&'static str, FieldValue)> = form
            .fields
            .visible()
            .map(|rule| (rule.name, default_value(rule)))
            .collect();
        for (name, default) in defaults {
            let value = values
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value.clone())
                .unwrap_or(default);
            form.draft.insert(name, value)?;
        }

        Ok(form)
    }

    fn open(
        entity: EntityKind,
        mode: FormMode,
        actor: Role,
        target_id: Option<i64>,
    ) -> Result<Self, FormError> {
        if !can_open(entity, mode, actor) {
            return Err(FormError::NotPermitted {
                entity,
                mode,
                role: actor,
            });
        }

        let fields = field_rules(entity, mode, actor);
        let draft = Draft::for_fields(&fields);
        debug!(entity = %entity, mode = %mode, actor = %actor, "Form opened");

        Ok(Self {
            fields,
            target_id,
            draft,
            errors: ErrorMap::new(),
            phase: FormPhase::Open,
            generation: 0,
        })
    }

    pub fn entity(&self) -> EntityKind {
        self.fields.entity
    }

    pub fn mode(&self) -> FormMode {
        self.fields.mode
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn target_id(&self) -> Option<i64> {
        self.target_id
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    /// Fields to render for the current user-type selection
    pub fn visible_fields(&self) -> Vec<&FieldRule> {
        let user_type = match self.entity() {
            EntityKind::User => self.draft.user_type(),
            _ => None,
        };
        self.fields.visible_for(user_type).collect()
    }

    /// Change one field; clears that field's error
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), FormError> {
        if self.phase != FormPhase::Open {
            return Err(FormError::NotOpen);
        }

        let rule = self
            .fields
            .get(name)
            .filter(|rule| rule.visible)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        if !rule.editable {
            return Err(FormError::LockedField(name.to_string()));
        }

        value.check_kind(name, &rule.kind)?;

        if let (FieldKind::Choice { options }, FieldValue::Text(text)) = (&rule.kind, &value) {
            if !options.iter().any(|option| *option == text.as_str()) {
                return Err(FormError::invalid_value(
                    name,
                    format!("expected one of {}", options.join(", ")),
                ));
            }
        }

        self.draft.insert(name, value)?;
        self.errors.remove(name);
        Ok(())
    }

    /// Parse raw text input for a field, then `set` it
    pub fn set_raw(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let kind = self
            .fields
            .get(name)
            .filter(|rule| rule.visible)
            .map(|rule| rule.kind.clone())
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        let value = FieldValue::parse(name, &kind, raw)?;
        self.set(name, value)
    }

    /// Pure validation of the current draft
    pub fn validate(&self) -> ErrorMap {
        validate(&self.fields, &self.draft)
    }

    /// Validate, build the payload and enter SUBMITTING
    ///
    /// Fails without side effects beyond the ErrorMap when the draft is
    /// invalid; a second call while a submit is pending is refused.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, SubmitError> {
        match self.phase {
            FormPhase::Closed => return Err(SubmitError::NotOpen),
            FormPhase::Validating | FormPhase::Submitting => {
                return Err(SubmitError::AlreadySubmitting);
            }
            FormPhase::Open => {}
        }

        self.phase = FormPhase::Validating;
        let errors = self.validate();
        if !errors.is_empty() {
            debug!(entity = %self.entity(), errors = errors.len(), "Form validation failed");
            self.errors = errors.clone();
            self.phase = FormPhase::Open;
            return Err(SubmitError::Invalid(errors));
        }

        let payload = match build_payload(&self.fields, &self.draft) {
            Ok(payload) => payload,
            Err(e) => {
                let field = match &e {
                    FormError::InvalidValue { field, .. } => field.clone(),
                    _ => SUBMIT_ERROR_KEY.to_string(),
                };
                let errors: ErrorMap = [(field, e.to_string())].into_iter().collect();
                self.errors = errors.clone();
                self.phase = FormPhase::Open;
                return Err(SubmitError::Invalid(errors));
            }
        };

        self.errors.clear();
        self.phase = FormPhase::Submitting;

        Ok(PendingSubmit {
            ticket: SubmitTicket {
                generation: self.generation,
            },
            entity: self.entity(),
            target_id: self.target_id,
            payload,
        })
    }

    /// Apply the outcome of a submit started with `begin_submit`
    ///
    /// An outcome whose ticket no longer matches (the form was cancelled in
    /// the meantime) is ignored and reported as `Stale`.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<SavedEntity, ApiError>,
    ) -> Result<SavedEntity, SubmitError> {
        if self.phase != FormPhase::Submitting || ticket.generation != self.generation {
            debug!(entity = %self.entity(), "Ignoring late submit result");
            return Err(SubmitError::Stale);
        }

        match outcome {
            Ok(saved) => {
                self.close();
                Ok(saved)
            }
            Err(error) => {
                let message = submit_error_message(self.entity(), &error);
                warn!(
                    entity = %self.entity(),
                    status = error.status,
                    "Submit rejected: {}", error.message
                );
                self.errors.insert(SUBMIT_ERROR_KEY, message.clone());
                self.phase = FormPhase::Open;
                Err(SubmitError::Rejected {
                    status: error.status,
                    message,
                })
            }
        }
    }

    /// Validate and, when acceptable, save through the API
    pub async fn submit(&mut self, api: &dyn AdminApi) -> Result<SavedEntity, SubmitError> {
        let pending = self.begin_submit()?;
        let outcome = pending.send(api).await;
        self.complete_submit(pending.ticket, outcome)
    }

    /// Discard the draft and return to CLOSED
    pub fn cancel(&mut self) {
        debug!(entity = %self.entity(), "Form cancelled");
        self.close();
    }

    fn close(&mut self) {
        self.draft.clear();
        self.errors.clear();
        self.phase = FormPhase::Closed;
        self.generation += 1;
    }
}

fn default_value(rule: &FieldRule) -> FieldValue {
    match &rule.kind {
        FieldKind::Flag => FieldValue::Flag(true),
        FieldKind::Number { min } => FieldValue::Number(*min),
        FieldKind::Choice { options } => {
            FieldValue::text(options.first().copied().unwrap_or_default())
        }
        _ => FieldValue::text(""),
    }
}

fn text(value: &str) -> FieldValue {
    FieldValue::text(value)
}

fn optional(value: &Option<String>) -> FieldValue {
    FieldValue::text(value.as_deref().unwrap_or_default())
}

fn user_values(user: &User) -> Vec<(&'static str, FieldValue)> {
    use user_field::*;

    let mut values = vec![
        (USERNAME, text(&user.username)),
        (EMAIL, text(&user.email)),
        (PASSWORD, text("")),
        (CONFIRM_PASSWORD, text("")),
        (FIRST_NAME, text(&user.first_name)),
        (LAST_NAME, text(&user.last_name)),
        (PHONE_NUMBER, optional(&user.phone_number)),
        (USER_TYPE, text(user.user_type.as_str())),
        (IS_ACTIVE, FieldValue::Flag(user.is_active)),
        (CUSTOMER_NUMBER, optional(&user.customer_number)),
        (EMERGENCY_CONTACT, optional(&user.emergency_contact)),
        (EMERGENCY_PHONE, optional(&user.emergency_phone)),
        (DEPARTMENT, optional(&user.department)),
        (LICENSE_NUMBER, optional(&user.license_number)),
        (SPECIALIZATION, optional(&user.specialization)),
        (CLINIC_NAME, optional(&user.clinic_name)),
        (CLINIC_ADDRESS, optional(&user.clinic_address)),
    ];
    if let Some(level) = user.access_level {
        values.push((ACCESS_LEVEL, FieldValue::Number(level)));
    }
    if let Some(years) = user.years_experience {
        values.push((YEARS_EXPERIENCE, FieldValue::Number(years)));
    }
    values
}

fn account_values(account: &Account) -> Vec<(&'static str, FieldValue)> {
    use account_field::*;

    let date = |d: Option<chrono::NaiveDate>| {
        FieldValue::text(d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default())
    };

    vec![
        (FARM_NAME, text(&account.farm_name)),
        (STATUS, text(account.status.as_str())),
        (MEMBERSHIP_START, date(account.membership_start)),
        (MEMBERSHIP_END, date(account.membership_end)),
    ]
}

fn livestock_values(livestock: &Livestock) -> Vec<(&'static str, FieldValue)> {
    use livestock_field::*;

    vec![
        (TAG_ID, text(&livestock.tag_id)),
        (NAME, text(&livestock.name)),
        (LIVESTOCK_TYPE, text(livestock.type_name().unwrap_or_default())),
        (BREED, text(livestock.breed_name().unwrap_or_default())),
        (
            DATE_OF_BIRTH,
            FieldValue::text(
                livestock
                    .date_of_birth
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            ),
        ),
        (DESCRIPTION, optional(&livestock.description)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::MockAdminApi;

    fn customer_user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 5,
            "username": "bob",
            "email": "bob@farm.com",
            "firstName": "Bob",
            "lastName": "Stone",
            "phoneNumber": "555-0100",
            "userType": "CUSTOMER",
            "isActive": true,
            "customerNumber": "C-77",
            "emergencyContact": "Jane Stone"
        }))
        .unwrap()
    }

    fn fill_valid_user(form: &mut EntityForm) {
        form.set(user_field::USERNAME, FieldValue::text("carol")).unwrap();
        form.set(user_field::EMAIL, FieldValue::text("carol@farm.com")).unwrap();
        form.set(user_field::FIRST_NAME, FieldValue::text("Carol")).unwrap();
        form.set(user_field::LAST_NAME, FieldValue::text("King")).unwrap();
        form.set(user_field::PASSWORD, FieldValue::text("secret1")).unwrap();
        form.set(user_field::CONFIRM_PASSWORD, FieldValue::text("secret1")).unwrap();
    }

    #[test]
    fn test_non_admin_create_preselects_locked_customer() {
        let mut form = EntityForm::open_create(EntityKind::User, Role::Customer).unwrap();

        assert_eq!(form.phase(), FormPhase::Open);
        assert_eq!(form.fields().options(user_field::USER_TYPE), &["CUSTOMER"]);
        assert_eq!(form.draft().text(user_field::USER_TYPE), "CUSTOMER");
        assert_eq!(
            form.set(user_field::USER_TYPE, FieldValue::text("CUSTOMER")),
            Err(FormError::LockedField("userType".to_string()))
        );
    }

    #[test]
    fn test_admin_create_defaults() {
        let form = EntityForm::open_create(EntityKind::User, Role::Administrator).unwrap();

        assert_eq!(form.draft().text(user_field::USER_TYPE), "CUSTOMER");
        assert_eq!(form.draft().flag(user_field::IS_ACTIVE), Some(true));
        assert_eq!(form.draft().number(user_field::ACCESS_LEVEL), Some(1));
        assert_eq!(form.draft().number(user_field::YEARS_EXPERIENCE), Some(0));
    }

    #[test]
    fn test_edit_prepopulates_everything_but_secrets() {
        let user = customer_user();
        let form = EntityForm::open_edit(EditTarget::User(&user), Role::Customer).unwrap();
        let draft = form.draft();

        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.target_id(), Some(5));
        assert_eq!(draft.text(user_field::USERNAME), "bob");
        assert_eq!(draft.text(user_field::EMAIL), "bob@farm.com");
        assert_eq!(draft.text(user_field::FIRST_NAME), "Bob");
        assert_eq!(draft.text(user_field::LAST_NAME), "Stone");
        assert_eq!(draft.text(user_field::PHONE_NUMBER), "555-0100");
        assert_eq!(draft.text(user_field::CUSTOMER_NUMBER), "C-77");
        assert_eq!(draft.text(user_field::EMERGENCY_CONTACT), "Jane Stone");
        assert_eq!(draft.text(user_field::PASSWORD), "");
        assert_eq!(draft.text(user_field::CONFIRM_PASSWORD), "");
        // hidden from non-administrators
        assert!(!draft.contains(user_field::IS_ACTIVE));
        assert!(!draft.contains(user_field::LICENSE_NUMBER));
    }

    #[test]
    fn test_non_admin_cannot_edit_veterinarian() {
        let mut user = customer_user();
        user.user_type = Role::Veterinarian;

        assert!(matches!(
            EntityForm::open_edit(EditTarget::User(&user), Role::Customer),
            Err(FormError::NotPermitted { .. })
        ));
        assert!(EntityForm::open_edit(EditTarget::User(&user), Role::Administrator).is_ok());
    }

    #[test]
    fn test_non_admin_cannot_create_account() {
        assert!(matches!(
            EntityForm::open_create(EntityKind::Account, Role::Veterinarian),
            Err(FormError::NotPermitted { .. })
        ));
    }

    #[test]
    fn test_set_clears_field_error() {
        let mut form = EntityForm::open_create(EntityKind::User, Role::Customer).unwrap();
        let _ = form.begin_submit();
        assert!(form.errors().contains(user_field::USERNAME));

        form.set(user_field::USERNAME, FieldValue::text("carol")).unwrap();
        assert!(!form.errors().contains(user_field::USERNAME));
        assert!(form.errors().contains(user_field::EMAIL));
    }

    #[test]
    fn test_set_rejects_value_of_wrong_kind() {
        let mut form = EntityForm::open_create(EntityKind::User, Role::Administrator).unwrap();
        form.set_raw(user_field::USER_TYPE, "veterinarian").unwrap();

        assert!(matches!(
            form.set(user_field::USERNAME, FieldValue::Flag(true)),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.set(user_field::IS_ACTIVE, FieldValue::text("yes")),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.set(user_field::YEARS_EXPERIENCE, FieldValue::text("7")),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.set(user_field::USER_TYPE, FieldValue::Number(1)),
            Err(FormError::InvalidValue { .. })
        ));

        form.set(user_field::IS_ACTIVE, FieldValue::Flag(false)).unwrap();
        form.set(user_field::YEARS_EXPERIENCE, FieldValue::Number(7)).unwrap();
        assert_eq!(form.draft().flag(user_field::IS_ACTIVE), Some(false));
        assert_eq!(form.draft().number(user_field::YEARS_EXPERIENCE), Some(7));
    }

    #[test]
    fn test_set_raw_parses_by_kind() {
        let mut form = EntityForm::open_create(EntityKind::User, Role::Administrator).unwrap();

        form.set_raw(user_field::USER_TYPE, "veterinarian").unwrap();
        form.set_raw(user_field::YEARS_EXPERIENCE, "7").unwrap();
        form.set_raw(user_field::IS_ACTIVE, "false").unwrap();

        assert_eq!(form.draft().user_type(), Some(Role::Veterinarian));
        assert_eq!(form.draft().number(user_field::YEARS_EXPERIENCE), Some(7));
        assert_eq!(form.draft().flag(user_field::IS_ACTIVE), Some(false));
        assert!(
            form.visible_fields()
                .iter()
                .any(|rule| rule.name == user_field::LICENSE_NUMBER)
        );
        assert!(form.set_raw("nickname", "x").is_err());
    }

    #[tokio::test]
    async fn test_invalid_submit_never_calls_api() {
        let api = MockAdminApi::new();
        let mut form = EntityForm::open_edit(EditTarget::User(&customer_user()), Role::Customer)
            .unwrap();
        form.set(user_field::USERNAME, FieldValue::text("")).unwrap();

        let result = form.submit(&api).await;

        let expected: ErrorMap = [("username", "Username is required")].into_iter().collect();
        assert_eq!(result, Err(SubmitError::Invalid(expected.clone())));
        assert_eq!(form.errors(), &expected);
        assert_eq!(form.phase(), FormPhase::Open);
    }

    #[tokio::test]
    async fn test_successful_create_closes_form() {
        let mut api = MockAdminApi::new();
        api.expect_create_user()
            .withf(|payload| {
                payload.username == "carol"
                    && payload.password.as_deref() == Some("secret1")
                    && payload.details.user_type() == Role::Customer
            })
            .times(1)
            .returning(|payload| {
                Ok(serde_json::from_value(serde_json::json!({
                    "id": 11,
                    "username": payload.username,
                    "userType": "CUSTOMER"
                }))
                .unwrap())
            });

        let mut form = EntityForm::open_create(EntityKind::User, Role::Customer).unwrap();
        fill_valid_user(&mut form);

        let saved = form.submit(&api).await.unwrap();

        let SavedEntity::User(user) = saved else {
            panic!("expected a user");
        };
        assert_eq!(user.id, 11);
        assert_eq!(form.phase(), FormPhase::Closed);
        assert!(form.draft().is_empty());
    }

    #[tokio::test]
    async fn test_edit_submits_update_without_password() {
        let mut api = MockAdminApi::new();
        api.expect_update_user()
            .withf(|id, payload| *id == 5 && payload.password.is_none())
            .times(1)
            .returning(|_, _| {
                Ok(serde_json::from_value(
                    serde_json::json!({"id": 5, "username": "bobby"}),
                )
                .unwrap())
            });

        let mut form = EntityForm::open_edit(EditTarget::User(&customer_user()), Role::Customer)
            .unwrap();
        form.set(user_field::USERNAME, FieldValue::text("bobby")).unwrap();

        assert!(form.submit(&api).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_form_open_with_mapped_message() {
        let mut api = MockAdminApi::new();
        api.expect_create_user()
            .times(1)
            .returning(|_| Err(ApiError::new(409, "Account has reached maximum user limit")));

        let mut form = EntityForm::open_create(EntityKind::User, Role::Customer).unwrap();
        fill_valid_user(&mut form);

        let result = form.submit(&api).await;

        assert!(matches!(result, Err(SubmitError::Rejected { status: 409, .. })));
        assert_eq!(form.phase(), FormPhase::Open);
        assert_eq!(
            form.errors().get(SUBMIT_ERROR_KEY),
            Some(crate::domain::form::USER_LIMIT_MESSAGE)
        );
        assert_eq!(form.draft().text(user_field::USERNAME), "carol");
    }

    #[test]
    fn test_second_submit_while_pending_is_refused() {
        let mut form = EntityForm::open_create(EntityKind::User, Role::Customer).unwrap();
        fill_valid_user(&mut form);

        let pending = form.begin_submit().unwrap();
        assert_eq!(form.phase(), FormPhase::Submitting);
        assert_eq!(form.begin_submit().unwrap_err(), SubmitError::AlreadySubmitting);
        assert_eq!(
            form.set(user_field::USERNAME, FieldValue::text("x")),
            Err(FormError::NotOpen)
        );
        assert!(matches!(pending.payload, Payload::User(_)));
    }

    #[test]
    fn test_late_result_after_cancel_is_ignored() {
        let mut form = EntityForm::open_create(EntityKind::User, Role::Customer).unwrap();
        fill_valid_user(&mut form);

        let pending = form.begin_submit().unwrap();
        form.cancel();
        assert_eq!(form.phase(), FormPhase::Closed);
        assert!(form.draft().is_empty());

        let late = form.complete_submit(pending.ticket, Err(ApiError::generic(500)));
        assert_eq!(late, Err(SubmitError::Stale));
        assert!(form.errors().is_empty());
        assert_eq!(form.phase(), FormPhase::Closed);
    }

    #[test]
    fn test_closed_form_refuses_submit() {
        let mut form = EntityForm::open_create(EntityKind::Livestock, Role::Customer).unwrap();
        form.cancel();

        assert_eq!(form.begin_submit().unwrap_err(), SubmitError::NotOpen);
        assert!(!form.is_open());
    }

    #[test]
    fn test_livestock_edit_prefill() {
        let livestock: Livestock = serde_json::from_value(serde_json::json!({
            "id": 1,
            "tagId": "COW-001",
            "name": "Bessie",
            "livestockType": {"livestockType": "Cattle"},
            "breed": {"breedName": "Holstein"},
            "dateOfBirth": "2020-03-15"
        }))
        .unwrap();

        let mut form =
            EntityForm::open_edit(EditTarget::Livestock(&livestock), Role::Customer).unwrap();

        assert_eq!(form.draft().text(livestock_field::BREED), "Holstein");
        assert_eq!(form.draft().text(livestock_field::DATE_OF_BIRTH), "2020-03-15");
        assert_eq!(
            form.set(livestock_field::TAG_ID, FieldValue::text("COW-002")),
            Err(FormError::LockedField("tagId".to_string()))
        );
    }

    #[tokio::test]
    async fn test_account_edit_updates() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "id": 4,
            "farmName": "Green Acres",
            "status": "ACTIVE",
            "membershipStart": "2024-01-01"
        }))
        .unwrap();

        let mut api = MockAdminApi::new();
        api.expect_update_account()
            .withf(|id, payload| {
                *id == 4 && payload.farm_name == "Greener Acres" && payload.master_user.is_none()
            })
            .times(1)
            .returning(|id, payload| {
                Ok(Account {
                    id,
                    farm_name: payload.farm_name.clone(),
                    status: payload.status,
                    membership_start: payload.membership_start,
                    membership_end: payload.membership_end,
                    master_user: None,
                })
            });

        let mut form =
            EntityForm::open_edit(EditTarget::Account(&account), Role::Customer).unwrap();
        assert_eq!(form.draft().text(account_field::MEMBERSHIP_START), "2024-01-01");
        assert!(form.set(account_field::STATUS, FieldValue::text("TRIAL")).is_err());
        form.set(account_field::FARM_NAME, FieldValue::text("Greener Acres")).unwrap();

        let saved = form.submit(&api).await.unwrap();
        assert!(matches!(saved, SavedEntity::Account(a) if a.farm_name == "Greener Acres"));
    }
}
