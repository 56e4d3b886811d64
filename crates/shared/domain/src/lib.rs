//! # Domain Models
//!
//! Pure types shared by every layer: configuration, the registration data model, weekday sets
//! and the feature-slice registry. Dependencies are limited to `serde`, `bitflags` and `chrono`;
//! no I/O, networking, or business rules live here.

pub mod config;
pub mod constants;
pub mod model;
pub mod registry;
pub mod weekdays;
