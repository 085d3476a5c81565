use async_trait::async_trait;
use rubricas_core::{CatalogError, Rubrica};
use rubricas_store::RecordStore;

/// Where the controller gets result lists from.
#[async_trait]
pub trait RecordCatalog: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<Rubrica>, CatalogError>;
    async fn get_all(&self) -> Result<Vec<Rubrica>, CatalogError>;
}

#[async_trait]
impl RecordCatalog for RecordStore {
    async fn search(&self, term: &str) -> Result<Vec<Rubrica>, CatalogError> {
        RecordStore::search(self, term).await
    }

    async fn get_all(&self) -> Result<Vec<Rubrica>, CatalogError> {
        RecordStore::get_all(self).await
    }
}
