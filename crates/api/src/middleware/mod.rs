//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Any caller with a valid token and a known role.
//! - [`rbac::RequirePeopleAdmin`] -- Requires a role that may manage people.

pub mod auth;
pub mod rbac;
