//! # Domain Models
//!
//! Pure types shared by every OGS crate, with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, networking, or heavy logic. Just data and simple helpers.

pub mod config;
pub mod constants;
pub mod registry;
pub mod schedule;
