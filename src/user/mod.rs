//! User directory and acting-user authorization.
//!
//! Users are owned by an external identity system. This module only
//! resolves identifiers to display names and roles, and carries the
//! explicit [`domain::Actor`] threaded into every mutating service call.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
