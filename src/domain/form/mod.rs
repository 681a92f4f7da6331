//! Role-gated form engine
//!
//! Field descriptors per (entity, mode, actor role), the draft a form edits,
//! validation into an ErrorMap, payload assembly and the submit lifecycle.

mod draft;
mod field;
mod messages;
mod payload;
mod state;
mod validation;

pub use draft::{Draft, ErrorMap, FieldValue, FormError};
pub use field::{
    EntityKind, FieldKind, FieldRule, FieldScope, FieldSet, FormMode, account_field, can_edit_user,
    can_open, field_rules, livestock_field, user_field,
};
pub use messages::{
    DUPLICATE_EMAIL_MESSAGE, DUPLICATE_USERNAME_MESSAGE, FORBIDDEN_MESSAGE,
    SESSION_EXPIRED_MESSAGE, UNREACHABLE_MESSAGE, USER_LIMIT_MESSAGE, fallback_message,
    submit_error_message,
};
pub use payload::{
    AccountPayload, AdministratorDetails, CustomerDetails, LivestockPayload, MasterUserPayload,
    Payload, UserDetails, UserPayload, VeterinarianDetails, build_payload,
};
pub use state::{
    EditTarget, EntityForm, FormPhase, PendingSubmit, SUBMIT_ERROR_KEY, SavedEntity, SubmitError,
    SubmitTicket,
};
pub use validation::{DATE_FORMAT, parse_date, validate};
