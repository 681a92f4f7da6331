//! Account domain

mod entity;

pub use entity::{Account, AccountStatus, MasterUser};
