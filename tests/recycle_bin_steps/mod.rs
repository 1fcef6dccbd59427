//! Step definitions for recycle-bin behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
