//! User domain
//!
//! User records, deletion checks, list filtering and the field checks the
//! user and account forms share.

mod entity;
mod filter;
mod validation;

pub use entity::{AssociatedData, DeletionCheck, PermanentDeletion, User};
pub use filter::{StatusFilter, UserFilter};
pub use validation::{
    MIN_PASSWORD_LENGTH, UserValidationError, validate_email, validate_password,
    validate_password_confirmation, validate_permanent_deletion,
};
