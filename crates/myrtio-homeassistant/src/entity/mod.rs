//! Entity domain types
//!
//! This module contains domain DTOs for Home Assistant entities.

pub mod switch;

pub use switch::{SwitchEntity, SwitchTopics};
