//! Adapter implementations of the recycle-bin repository port.

pub mod memory;
pub mod postgres;
