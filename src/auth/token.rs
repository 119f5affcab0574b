//! Token material returned by provider exchanges.

pub mod secret;
pub mod set;
