//! Remote sources: the rubrica listing and detail documents served over HTTP.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpSource, SyncError};
