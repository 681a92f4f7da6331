//! Session domain
//!
//! The session slot, its fixed storage keys, and the durable storage port.

mod entity;
mod storage;

pub use entity::{IDENTITY_KEY, Session, TOKEN_KEY, basic_token};
pub use storage::SessionStorage;
