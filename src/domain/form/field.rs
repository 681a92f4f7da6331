//! Role-gated field descriptors
//!
//! `field_rules` is a pure function of (entity, mode, actor role). Consumers
//! branch on the returned flags instead of comparing role strings.

use serde::Serialize;

use crate::domain::account::AccountStatus;
use crate::domain::identity::Role;

/// Entity a form edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Account,
    Livestock,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Account => "account",
            Self::Livestock => "livestock",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(Self::User),
            "account" | "accounts" => Ok(Self::Account),
            "livestock" => Ok(Self::Livestock),
            other => Err(format!("Unknown entity: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

impl std::fmt::Display for FormMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Edit => f.write_str("edit"),
        }
    }
}

impl std::str::FromStr for FormMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            other => Err(format!("Unknown form mode: {}", other)),
        }
    }
}

/// Input kind of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Secret,
    Flag,
    Number { min: i64 },
    Date,
    Choice { options: Vec<&'static str> },
}

/// Which user types a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "userType", rename_all = "camelCase")]
pub enum FieldScope {
    Always,
    UserType(Role),
}

impl FieldScope {
    pub fn applies_to(&self, user_type: Option<Role>) -> bool {
        match self {
            Self::Always => true,
            Self::UserType(role) => user_type == Some(*role),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub scope: FieldScope,
    pub visible: bool,
    pub required: bool,
    pub editable: bool,
    #[serde(skip)]
    pub required_message: Option<&'static str>,
}

impl FieldRule {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            scope: FieldScope::Always,
            visible: true,
            required: false,
            editable: true,
            required_message: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn required_if(mut self, condition: bool) -> Self {
        self.required = condition;
        self
    }

    fn with_required_message(mut self, message: &'static str) -> Self {
        self.required_message = Some(message);
        self
    }

    fn visible_if(mut self, condition: bool) -> Self {
        self.visible = condition;
        self
    }

    fn editable_if(mut self, condition: bool) -> Self {
        self.editable = condition;
        self
    }

    fn scoped(mut self, user_type: Role) -> Self {
        self.scope = FieldScope::UserType(user_type);
        self
    }

    pub fn missing_message(&self) -> String {
        self.required_message
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} is required", self.label))
    }
}

/// Field names of the user form
pub mod user_field {
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const USER_TYPE: &str = "userType";
    pub const IS_ACTIVE: &str = "isActive";
    pub const CUSTOMER_NUMBER: &str = "customerNumber";
    pub const EMERGENCY_CONTACT: &str = "emergencyContact";
    pub const EMERGENCY_PHONE: &str = "emergencyPhone";
    pub const DEPARTMENT: &str = "department";
    pub const ACCESS_LEVEL: &str = "accessLevel";
    pub const LICENSE_NUMBER: &str = "licenseNumber";
    pub const SPECIALIZATION: &str = "specialization";
    pub const CLINIC_NAME: &str = "clinicName";
    pub const CLINIC_ADDRESS: &str = "clinicAddress";
    pub const YEARS_EXPERIENCE: &str = "yearsExperience";
}

/// Field names of the account form; master-user fields are namespaced
pub mod account_field {
    pub const FARM_NAME: &str = "farmName";
    pub const STATUS: &str = "status";
    pub const MEMBERSHIP_START: &str = "membershipStart";
    pub const MEMBERSHIP_END: &str = "membershipEnd";
    pub const MASTER_USERNAME: &str = "masterUser.username";
    pub const MASTER_EMAIL: &str = "masterUser.email";
    pub const MASTER_PASSWORD: &str = "masterUser.password";
    pub const MASTER_FIRST_NAME: &str = "masterUser.firstName";
    pub const MASTER_LAST_NAME: &str = "masterUser.lastName";
    pub const MASTER_PHONE_NUMBER: &str = "masterUser.phoneNumber";
}

pub mod livestock_field {
    pub const TAG_ID: &str = "tagId";
    pub const NAME: &str = "name";
    pub const LIVESTOCK_TYPE: &str = "livestockType";
    pub const BREED: &str = "breed";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";
    pub const DESCRIPTION: &str = "description";
}

/// Descriptor of every field a form knows about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSet {
    pub entity: EntityKind,
    pub mode: FormMode,
    pub actor: Role,
    pub fields: Vec<FieldRule>,
}

impl FieldSet {
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Whether a draft may hold this field
    pub fn allows(&self, name: &str) -> bool {
        self.get(name).is_some_and(|rule| rule.visible)
    }

    pub fn visible(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.iter().filter(|rule| rule.visible)
    }

    /// Visible fields that apply to the selected user type
    pub fn visible_for(&self, user_type: Option<Role>) -> impl Iterator<Item = &FieldRule> {
        self.visible()
            .filter(move |rule| rule.scope.applies_to(user_type))
    }

    /// Options of a choice field
    pub fn options(&self, name: &str) -> &[&'static str] {
        match self.get(name).map(|rule| &rule.kind) {
            Some(FieldKind::Choice { options }) => options,
            _ => &[],
        }
    }
}

/// Whether `role` may open a form of this entity and mode at all
pub fn can_open(entity: EntityKind, mode: FormMode, role: Role) -> bool {
    !matches!(
        (entity, mode),
        (EntityKind::Account, FormMode::Create) if !role.is_administrator()
    )
}

/// Whether `role` may open the EDIT form of a user of `target_type`
///
/// Non-administrators may only edit the user types they may assign.
pub fn can_edit_user(role: Role, target_type: Role) -> bool {
    role.assignable_user_types().contains(&target_type)
}

/// Compute the field descriptor for (entity, mode, actor role)
pub fn field_rules(entity: EntityKind, mode: FormMode, role: Role) -> FieldSet {
    let fields = match entity {
        EntityKind::User => user_rules(mode, role),
        EntityKind::Account => account_rules(mode, role),
        EntityKind::Livestock => livestock_rules(mode),
    };

    FieldSet {
        entity,
        mode,
        actor: role,
        fields,
    }
}

fn user_rules(mode: FormMode, role: Role) -> Vec<FieldRule> {
    use user_field::*;

    let assignable = role.assignable_user_types();
    let offers = |user_type: Role| assignable.contains(&user_type);
    let creating = mode == FormMode::Create;

    vec![
        FieldRule::new(USERNAME, "Username", FieldKind::Text).required(),
        FieldRule::new(EMAIL, "Email", FieldKind::Email).required(),
        FieldRule::new(PASSWORD, "Password", FieldKind::Secret)
            .required_if(creating)
            .with_required_message("Password is required for new users"),
        FieldRule::new(CONFIRM_PASSWORD, "Confirm password", FieldKind::Secret),
        FieldRule::new(FIRST_NAME, "First name", FieldKind::Text).required(),
        FieldRule::new(LAST_NAME, "Last name", FieldKind::Text).required(),
        FieldRule::new(PHONE_NUMBER, "Phone number", FieldKind::Text),
        FieldRule::new(
            USER_TYPE,
            "User type",
            FieldKind::Choice {
                options: assignable.iter().map(Role::as_str).collect(),
            },
        )
        .required()
        .editable_if(assignable.len() > 1),
        FieldRule::new(IS_ACTIVE, "Active", FieldKind::Flag).visible_if(role.is_administrator()),
        // Customer
        FieldRule::new(CUSTOMER_NUMBER, "Customer number", FieldKind::Text)
            .scoped(Role::Customer)
            .visible_if(offers(Role::Customer)),
        FieldRule::new(EMERGENCY_CONTACT, "Emergency contact", FieldKind::Text)
            .scoped(Role::Customer)
            .visible_if(offers(Role::Customer)),
        FieldRule::new(EMERGENCY_PHONE, "Emergency phone", FieldKind::Text)
            .scoped(Role::Customer)
            .visible_if(offers(Role::Customer)),
        // Administrator
        FieldRule::new(DEPARTMENT, "Department", FieldKind::Text)
            .scoped(Role::Administrator)
            .visible_if(offers(Role::Administrator)),
        FieldRule::new(ACCESS_LEVEL, "Access level", FieldKind::Number { min: 1 })
            .scoped(Role::Administrator)
            .visible_if(offers(Role::Administrator)),
        // Veterinarian
        FieldRule::new(LICENSE_NUMBER, "License number", FieldKind::Text)
            .scoped(Role::Veterinarian)
            .visible_if(offers(Role::Veterinarian))
            .required()
            .with_required_message("License number is required for veterinarians"),
        FieldRule::new(SPECIALIZATION, "Specialization", FieldKind::Text)
            .scoped(Role::Veterinarian)
            .visible_if(offers(Role::Veterinarian)),
        FieldRule::new(CLINIC_NAME, "Clinic name", FieldKind::Text)
            .scoped(Role::Veterinarian)
            .visible_if(offers(Role::Veterinarian)),
        FieldRule::new(CLINIC_ADDRESS, "Clinic address", FieldKind::Text)
            .scoped(Role::Veterinarian)
            .visible_if(offers(Role::Veterinarian)),
        FieldRule::new(YEARS_EXPERIENCE, "Years of experience", FieldKind::Number { min: 0 })
            .scoped(Role::Veterinarian)
            .visible_if(offers(Role::Veterinarian)),
    ]
}

fn account_rules(mode: FormMode, role: Role) -> Vec<FieldRule> {
    use account_field::*;

    let admin = role.is_administrator();
    let creating = mode == FormMode::Create;

    vec![
        FieldRule::new(FARM_NAME, "Farm name", FieldKind::Text).required(),
        FieldRule::new(
            STATUS,
            "Status",
            FieldKind::Choice {
                options: AccountStatus::ALL.iter().map(AccountStatus::as_str).collect(),
            },
        )
        .required()
        .editable_if(admin),
        FieldRule::new(MEMBERSHIP_START, "Membership start", FieldKind::Date).editable_if(admin),
        FieldRule::new(MEMBERSHIP_END, "Membership end", FieldKind::Date).editable_if(admin),
        FieldRule::new(MASTER_USERNAME, "Username", FieldKind::Text)
            .visible_if(creating)
            .required(),
        FieldRule::new(MASTER_EMAIL, "Email", FieldKind::Email)
            .visible_if(creating)
            .required(),
        FieldRule::new(MASTER_PASSWORD, "Password", FieldKind::Secret)
            .visible_if(creating)
            .required(),
        FieldRule::new(MASTER_FIRST_NAME, "First name", FieldKind::Text)
            .visible_if(creating)
            .required(),
        FieldRule::new(MASTER_LAST_NAME, "Last name", FieldKind::Text)
            .visible_if(creating)
            .required(),
        FieldRule::new(MASTER_PHONE_NUMBER, "Phone number", FieldKind::Text).visible_if(creating),
    ]
}

fn livestock_rules(mode: FormMode) -> Vec<FieldRule> {
    use livestock_field::*;

    vec![
        FieldRule::new(TAG_ID, "Tag ID", FieldKind::Text)
            .required()
            .editable_if(mode == FormMode::Create),
        FieldRule::new(NAME, "Name", FieldKind::Text).required(),
        FieldRule::new(LIVESTOCK_TYPE, "Livestock type", FieldKind::Text),
        FieldRule::new(BREED, "Breed", FieldKind::Text),
        FieldRule::new(DATE_OF_BIRTH, "Date of birth", FieldKind::Date).required(),
        FieldRule::new(DESCRIPTION, "Description", FieldKind::Text),
    ]
}
