//! Database row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the table
//! row, the DTOs used for inserts, and conversion into the `core` domain type.

pub mod attendance_record;
pub mod person;
