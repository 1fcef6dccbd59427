//! Unit tests for the recycle-bin module.
