//! The cached rubrica collection.
//!
//! The bulk listing is fetched at most once per process. Concurrent callers
//! that arrive while a load is in flight all await the same shared future,
//! so the source sees exactly one request and every caller sees the same
//! outcome. A failed load settles the cache to an empty collection; it is
//! only retried through [`RecordStore::reload`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use rubricas_core::{CatalogError, CollectionSource, Rubrica};
use tracing::{debug, info, warn};

type Collection = Arc<Vec<Rubrica>>;
type PendingLoad = Shared<BoxFuture<'static, Result<Collection, CatalogError>>>;

enum LoadState {
    Idle,
    Loading(PendingLoad),
    Loaded {
        collection: Collection,
        loaded_at: DateTime<Utc>,
    },
    /// The load failed; callers now see an empty collection.
    Failed {
        error: CatalogError,
        failed_at: DateTime<Utc>,
    },
}

/// Observable state of the collection cache.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreStatus {
    NotLoaded,
    Loading,
    Loaded {
        count: usize,
        loaded_at: DateTime<Utc>,
    },
    Failed {
        error: CatalogError,
        failed_at: DateTime<Utc>,
    },
}

/// Owner of the in-memory rubrica collection.
pub struct RecordStore {
    source: Arc<dyn CollectionSource>,
    state: Arc<Mutex<LoadState>>,
}

impl RecordStore {
    pub fn new(source: Arc<dyn CollectionSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(LoadState::Idle)),
        }
    }

    /// Load the collection, or return the cached one.
    ///
    /// Only the callers awaiting the load that failed receive the error;
    /// later calls get the cached empty collection.
    pub async fn load_collection(&self) -> Result<Collection, CatalogError> {
        let pending = {
            let mut state = lock(&self.state);
            match &*state {
                LoadState::Loaded { collection, .. } => {
                    debug!(count = collection.len(), "collection cache hit");
                    return Ok(Arc::clone(collection));
                }
                LoadState::Failed { .. } => {
                    debug!("collection load failed earlier, serving empty collection");
                    return Ok(Arc::new(Vec::new()));
                }
                LoadState::Loading(pending) => {
                    debug!("collection load already in flight, joining it");
                    pending.clone()
                }
                LoadState::Idle => {
                    let pending = fetch_collection(Arc::clone(&self.source), Arc::clone(&self.state))
                        .boxed()
                        .shared();
                    *state = LoadState::Loading(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// A copy of the whole collection, loading it first if needed.
    pub async fn get_all(&self) -> Result<Vec<Rubrica>, CatalogError> {
        let collection = self.load_collection().await?;
        if collection.is_empty() {
            warn!("no rubricas available");
        }
        Ok(collection.as_ref().clone())
    }

    /// Run a search over the collection, loading it first if needed.
    pub async fn search(&self, term: &str) -> Result<Vec<Rubrica>, CatalogError> {
        let collection = self.load_collection().await?;
        let results = rubricas_core::search(term, &collection);
        info!(term = term.trim(), count = results.len(), "search returned results");
        Ok(results)
    }

    /// Forget a settled load so the next call fetches again.
    ///
    /// An in-flight load is left alone.
    pub fn reload(&self) {
        let mut state = lock(&self.state);
        if !matches!(*state, LoadState::Loading(_)) {
            info!("collection cache cleared");
            *state = LoadState::Idle;
        }
    }

    pub fn status(&self) -> StoreStatus {
        match &*lock(&self.state) {
            LoadState::Idle => StoreStatus::NotLoaded,
            LoadState::Loading(_) => StoreStatus::Loading,
            LoadState::Loaded {
                collection,
                loaded_at,
            } => StoreStatus::Loaded {
                count: collection.len(),
                loaded_at: *loaded_at,
            },
            LoadState::Failed { error, failed_at } => StoreStatus::Failed {
                error: error.clone(),
                failed_at: *failed_at,
            },
        }
    }
}

/// The single underlying fetch; settles the cache before resolving.
async fn fetch_collection(
    source: Arc<dyn CollectionSource>,
    state: Arc<Mutex<LoadState>>,
) -> Result<Collection, CatalogError> {
    info!("loading rubrica collection");
    let outcome = match source.fetch_collection().await {
        Ok(bytes) => serde_json::from_slice::<Vec<Rubrica>>(&bytes).map_err(CatalogError::from),
        Err(err) => Err(err),
    };

    let now = Utc::now();
    let mut state = lock(&state);
    match outcome {
        Ok(records) => {
            info!(count = records.len(), "rubrica collection loaded");
            let collection = Arc::new(records);
            *state = LoadState::Loaded {
                collection: Arc::clone(&collection),
                loaded_at: now,
            };
            Ok(collection)
        }
        Err(error) => {
            warn!(error = %error, "failed to load rubrica collection");
            *state = LoadState::Failed {
                error: error.clone(),
                failed_at: now,
            };
            Err(error)
        }
    }
}

fn lock(state: &Mutex<LoadState>) -> MutexGuard<'_, LoadState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        payload: Result<Vec<u8>, CatalogError>,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn ok(json: String) -> Arc<Self> {
            Arc::new(Self {
                payload: Ok(json.into_bytes()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(error: CatalogError) -> Arc<Self> {
            Arc::new(Self {
                payload: Err(error),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CollectionSource for CountingSource {
        async fn fetch_collection(&self) -> Result<Vec<u8>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Stay pending for a few polls so concurrent callers overlap.
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            self.payload.clone()
        }
    }

    fn listing(n: usize) -> String {
        let items: Vec<String> = (0..n)
            .map(|i| {
                format!(r#"{{"codigo":"{i:04}","nome":"Rubrica {i}","descricao":"Descrição {i}"}}"#)
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[tokio::test]
    async fn concurrent_loads_fetch_once() {
        let source = CountingSource::ok(listing(500));
        let store = RecordStore::new(source.clone());

        let results = futures::future::join_all((0..8).map(|_| store.load_collection())).await;

        assert_eq!(source.calls(), 1);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.len(), 500);
        for r in &results {
            assert_eq!(r.as_ref().unwrap(), first);
        }
    }

    #[tokio::test]
    async fn loaded_collection_is_served_from_cache() {
        let source = CountingSource::ok(listing(3));
        let store = RecordStore::new(source.clone());

        store.load_collection().await.unwrap();
        store.load_collection().await.unwrap();
        store.search("rubrica").await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(matches!(store.status(), StoreStatus::Loaded { count: 3, .. }));
    }

    #[tokio::test]
    async fn concurrent_callers_share_the_failure() {
        let source = CountingSource::failing(CatalogError::Transport("connection reset".into()));
        let store = RecordStore::new(source.clone());

        let results = futures::future::join_all((0..4).map(|_| store.load_collection())).await;

        assert_eq!(source.calls(), 1);
        for r in results {
            assert_eq!(
                r.unwrap_err(),
                CatalogError::Transport("connection reset".into())
            );
        }
    }

    #[tokio::test]
    async fn failed_load_is_cached_as_empty_without_retry() {
        let source = CountingSource::failing(CatalogError::NotFound("listagem".into()));
        let store = RecordStore::new(source.clone());

        assert!(store.load_collection().await.is_err());
        let after = store.load_collection().await.unwrap();
        assert!(after.is_empty());
        assert!(store.get_all().await.unwrap().is_empty());
        assert!(store.search("x").await.unwrap().is_empty());
        assert_eq!(source.calls(), 1);
        assert!(matches!(store.status(), StoreStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn reload_retries_after_failure() {
        let source = CountingSource::failing(CatalogError::Transport("timeout".into()));
        let store = RecordStore::new(source.clone());

        assert!(store.load_collection().await.is_err());
        store.reload();
        assert_eq!(store.status(), StoreStatus::NotLoaded);
        assert!(store.load_collection().await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn malformed_payload_is_reported() {
        let source = CountingSource::ok(r#"{"codigo":"001"}"#.into());
        let store = RecordStore::new(source);

        let err = store.load_collection().await.unwrap_err();
        assert!(matches!(err, CatalogError::MalformedData(_)));
    }

    #[tokio::test]
    async fn get_all_returns_a_detached_copy() {
        let store = RecordStore::new(CountingSource::ok(listing(2)));

        let mut copy = store.get_all().await.unwrap();
        copy.clear();

        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_goes_through_the_cache() {
        let source = CountingSource::ok(
            r#"[
                {"codigo":"001","nome":"Salário Base","descricao":"Pagamento mensal"},
                {"codigo":"002","nome":"Hora Extra","descricao":"Adicional por hora"}
            ]"#
            .into(),
        );
        let store = RecordStore::new(source.clone());

        let results = store.search("  HORA ").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].codigo, "002");
        assert_eq!(store.search("").await.unwrap().len(), 2);
        assert_eq!(source.calls(), 1);
    }

    /// Holds the listing back until released.
    struct GatedSource {
        release: tokio::sync::Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CollectionSource for GatedSource {
        async fn fetch_collection(&self) -> Result<Vec<u8>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(listing(4).into_bytes())
        }
    }

    #[tokio::test]
    async fn reload_leaves_an_in_flight_load_alone() {
        let source = Arc::new(GatedSource {
            release: tokio::sync::Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(RecordStore::new(source.clone()));

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.load_collection().await }
        });
        for _ in 0..10 {
            if store.status() == StoreStatus::Loading {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(store.status(), StoreStatus::Loading);

        store.reload();
        assert_eq!(store.status(), StoreStatus::Loading);

        source.release.notify_one();
        let collection = pending.await.unwrap().unwrap();
        assert_eq!(collection.len(), 4);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(store.status(), StoreStatus::Loaded { count: 4, .. }));
        store.load_collection().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fresh_store_is_not_loaded() {
        let store = RecordStore::new(CountingSource::ok("[]".into()));
        assert_eq!(store.status(), StoreStatus::NotLoaded);
    }
}
