//! Application services for the recycle bin.

mod service;

pub use service::{
    RecycleBinListing, RecycleBinService, RecycleBinServiceError, RecycleBinServiceResult,
};
