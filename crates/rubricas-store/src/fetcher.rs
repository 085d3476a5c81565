use std::sync::Arc;

use rubricas_core::{CatalogError, DetailSource, Rubrica, validate_code};
use tracing::{info, warn};

/// Resolves single rubricas by code from the detail source.
///
/// Independent of the bulk collection and never cached: every call goes to
/// the source, and the detail document is returned as-is.
#[derive(Clone)]
pub struct RecordFetcher {
    source: Arc<dyn DetailSource>,
}

impl RecordFetcher {
    pub fn new(source: Arc<dyn DetailSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_by_code(&self, codigo: &str) -> Result<Rubrica, CatalogError> {
        validate_code(codigo)?;

        info!(codigo, "fetching rubrica detail");
        let bytes = self.source.fetch_record(codigo).await.inspect_err(|err| {
            warn!(codigo, error = %err, "rubrica detail fetch failed");
        })?;

        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        if !value.is_object() {
            return Err(CatalogError::MalformedData(format!(
                "detail for {codigo} is not a JSON object"
            )));
        }
        let rubrica: Rubrica = serde_json::from_value(value)?;
        info!(codigo, "rubrica detail loaded");
        Ok(rubrica)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MapSource {
        docs: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl MapSource {
        fn with(docs: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                docs: docs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DetailSource for MapSource {
        async fn fetch_record(&self, codigo: &str) -> Result<Vec<u8>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.docs
                .get(codigo)
                .map(|doc| doc.clone().into_bytes())
                .ok_or_else(|| CatalogError::NotFound(format!("rubricas/{codigo}.json")))
        }
    }

    #[tokio::test]
    async fn fetches_and_parses_detail() {
        let source = MapSource::with(&[(
            "001",
            r#"{"codigo":"001","nome":"Salário Base","descricao":"Pagamento mensal","dsr":true}"#,
        )]);
        let fetcher = RecordFetcher::new(source);

        let r = fetcher.fetch_by_code("001").await.unwrap();
        assert_eq!(r.nome(), Some("Salário Base"));
        assert_eq!(r.dsr, Some(true));
    }

    #[tokio::test]
    async fn empty_code_is_invalid_without_touching_source() {
        let source = MapSource::with(&[]);
        let fetcher = RecordFetcher::new(source.clone());

        for code in ["", "   "] {
            let err = fetcher.fetch_by_code(code).await.unwrap_err();
            assert!(matches!(err, CatalogError::InvalidArgument(_)));
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_code_is_not_found() {
        let fetcher = RecordFetcher::new(MapSource::with(&[]));
        let err = fetcher.fetch_by_code("001").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn unparseable_payload_is_malformed() {
        let fetcher = RecordFetcher::new(MapSource::with(&[
            ("bad", "{ not json"),
            ("list", r#"[{"codigo":"list"}]"#),
            ("null", "null"),
        ]));
        for code in ["bad", "list", "null"] {
            let err = fetcher.fetch_by_code(code).await.unwrap_err();
            assert!(matches!(err, CatalogError::MalformedData(_)), "{code}: {err}");
        }
    }

    #[tokio::test]
    async fn every_call_refetches() {
        let source = MapSource::with(&[("7", r#"{"codigo":"7"}"#)]);
        let fetcher = RecordFetcher::new(source.clone());

        fetcher.fetch_by_code("7").await.unwrap();
        fetcher.fetch_by_code("7").await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
