//! Local data directory source.
//!
//! Layout:
//! - `<root>/listagem-rubricas.json`: the bulk listing
//! - `<root>/rubricas/<codigo>.json`: one detail document per code

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rubricas_core::{CatalogError, CollectionSource, DetailSource, validate_code};
use tracing::debug;

const LISTING_FILE: &str = "listagem-rubricas.json";
const DETAIL_DIR: &str = "rubricas";

/// Reads the listing and detail documents from a data directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn listing_path(&self) -> PathBuf {
        self.root.join(LISTING_FILE)
    }

    pub fn record_path(&self, codigo: &str) -> PathBuf {
        self.root.join(DETAIL_DIR).join(format!("{codigo}.json"))
    }
}

#[async_trait]
impl CollectionSource for FsSource {
    async fn fetch_collection(&self) -> Result<Vec<u8>, CatalogError> {
        read(&self.listing_path()).await
    }
}

#[async_trait]
impl DetailSource for FsSource {
    async fn fetch_record(&self, codigo: &str) -> Result<Vec<u8>, CatalogError> {
        validate_code(codigo)?;
        read(&self.record_path(codigo)).await
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, CatalogError> {
    debug!(path = %path.display(), "reading data file");
    tokio::fs::read(path).await.map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => CatalogError::NotFound(path.display().to_string()),
        _ => CatalogError::Transport(format!("{}: {err}", path.display())),
    })
}
