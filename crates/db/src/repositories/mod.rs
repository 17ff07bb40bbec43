//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod attendance_record_repo;
pub mod person_repo;

pub use attendance_record_repo::AttendanceRecordRepo;
pub use person_repo::PersonRepo;
