//! Token validation. Tokens are issued by the external identity provider.

pub mod jwt;
