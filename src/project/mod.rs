//! Projects and their derived status.
//!
//! A project's status is recomputed from its live task set by
//! [`services::ProjectStatusAggregator`], which is the only component that
//! writes the derived `InProgress`/`Completed` values. `Dropped` is set only
//! through [`services::ProjectService::drop_project`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
