//! Recycle bin for soft-deleted entities.
//!
//! Each entry marks one entity as deleted and carries a point-in-time JSON
//! snapshot of it. Removing the entry restores the entity; purging removes
//! the entry together with the underlying record.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
