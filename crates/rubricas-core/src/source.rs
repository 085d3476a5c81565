//! Contracts for the two read-only data sources.
//!
//! Sources hand back raw payload bytes; decoding into [`Rubrica`](crate::Rubrica)
//! happens in the store so every source reports malformed payloads the same way.

use async_trait::async_trait;

use crate::CatalogError;

/// The bulk listing: one JSON array holding every rubrica.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn fetch_collection(&self) -> Result<Vec<u8>, CatalogError>;
}

/// Per-record detail documents, one JSON object per `codigo`.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_record(&self, codigo: &str) -> Result<Vec<u8>, CatalogError>;
}

/// Characters that would change which resource a code resolves to once it is
/// spliced into a file path or URL.
const RESERVED: [char; 6] = ['/', '\\', '#', '?', '%', '\0'];

/// Reject codes that are blank or would escape the detail location.
pub fn validate_code(codigo: &str) -> Result<(), CatalogError> {
    if codigo.trim().is_empty() {
        return Err(CatalogError::InvalidArgument(
            "rubrica code not provided".into(),
        ));
    }
    if codigo.contains(RESERVED) || codigo.contains("..") {
        return Err(CatalogError::InvalidArgument(format!(
            "rubrica code {codigo:?} contains a reserved character"
        )));
    }
    Ok(())
}
