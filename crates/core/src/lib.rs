//! Domain logic for the monthly attendance grid.
//!
//! This crate has zero internal deps so it can be used by the repository
//! layer, the HTTP server and any future CLI tooling alike. Persistence is
//! reached only through the [`store::AttendanceStore`] trait.

pub mod calendar;
pub mod error;
pub mod exceptions;
pub mod grid;
pub mod month;
pub mod notes;
pub mod people;
pub mod record;
pub mod roles;
pub mod status;
pub mod store;
pub mod totals;
pub mod types;
