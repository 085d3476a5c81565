//! Storage layer: the cached bulk collection, per-record detail fetches and
//! the on-disk data layout.

mod fetcher;
mod fs;
mod loader;

pub use fetcher::RecordFetcher;
pub use fs::FsSource;
pub use loader::{RecordStore, StoreStatus};
