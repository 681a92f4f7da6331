//! Identity domain

mod entity;

pub use entity::{AccountRef, Identity, Role};
