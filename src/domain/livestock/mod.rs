//! Livestock domain

mod entity;

pub use entity::{Breed, Livestock, LivestockType, filter_livestock};
