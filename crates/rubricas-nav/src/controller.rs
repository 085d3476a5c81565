//! List ↔ detail navigation.
//!
//! Every method takes `&self` so a new gesture can be dispatched while an
//! earlier fetch is still pending. Shared state sits behind mutexes that are
//! never held across an `.await`. Responses are applied in completion order:
//! a slow search that finishes after a newer one overwrites it. Superseded
//! responses are logged, not dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rubricas_core::{ALL_RECORDS_TERM, CatalogError, DisplayPolicy, Rubrica, is_all_records};
use rubricas_store::RecordFetcher;
use tracing::{debug, info, warn};

use crate::{Action, ListPage, Presenter, RecordCatalog};

const MISSING_NOME: &str = "Nome não disponível";
const MISSING_DESCRICAO: &str = "Descrição não disponível";

/// Which panel is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Idle,
    List { term: String },
    Detail { codigo: String, term: String },
}

/// The last list shown, replayed by [`NavigationController::go_back`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSession {
    pub last_results: Vec<Rubrica>,
    pub last_term: String,
}

pub struct NavigationController {
    catalog: Arc<dyn RecordCatalog>,
    fetcher: RecordFetcher,
    presenter: Arc<dyn Presenter>,
    policy: DisplayPolicy,
    session: Mutex<SearchSession>,
    view: Mutex<View>,
    /// Sequence number of the most recently started request.
    latest_request: AtomicU64,
}

impl NavigationController {
    pub fn new(
        catalog: Arc<dyn RecordCatalog>,
        fetcher: RecordFetcher,
        presenter: Arc<dyn Presenter>,
        policy: DisplayPolicy,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            presenter,
            policy,
            session: Mutex::new(SearchSession::default()),
            view: Mutex::new(View::Idle),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> View {
        lock(&self.view).clone()
    }

    pub fn session(&self) -> SearchSession {
        lock(&self.session).clone()
    }

    pub async fn dispatch(&self, action: Action) -> Result<(), CatalogError> {
        debug!(?action, "dispatching");
        match action {
            Action::Search(term) => self.submit_search(&term).await,
            Action::ShowAll => self.submit_search(ALL_RECORDS_TERM).await,
            Action::Select(codigo) => return self.select_record(&codigo).await,
            Action::Back => self.go_back().await,
            Action::Close => self.close(),
        }
        Ok(())
    }

    /// Run a search and show its results.
    ///
    /// A blank term or the all-records term lists everything. If the
    /// collection cannot be loaded the list is shown empty under the same
    /// term and the failure is passed to the presenter.
    pub async fn submit_search(&self, term: &str) {
        let request = self.begin_request();
        let term = term.trim();
        let (outcome, display_term) = if term.is_empty() || is_all_records(term) {
            info!("listing all rubricas");
            (self.catalog.get_all().await, ALL_RECORDS_TERM)
        } else {
            info!(term, "searching rubricas");
            (self.catalog.search(term).await, term)
        };
        self.note_superseded(request, "search");

        match outcome {
            Ok(results) => self.show_results(results, display_term.to_string()),
            Err(err) => {
                warn!(term = display_term, error = %err, "search failed");
                self.presenter.notify_failure(&err);
                self.render_list(&[], display_term);
                *lock(&self.view) = View::List {
                    term: display_term.to_string(),
                };
            }
        }
    }

    /// Fetch one record and show its detail.
    ///
    /// On failure nothing changes on screen apart from the failure notice,
    /// and the error is returned.
    pub async fn select_record(&self, codigo: &str) -> Result<(), CatalogError> {
        let request = self.begin_request();
        let term = self.origin_term();

        let record = match self.fetcher.fetch_by_code(codigo).await {
            Ok(record) => record,
            Err(err) => {
                warn!(codigo, error = %err, "could not open rubrica");
                self.presenter.notify_failure(&err);
                return Err(err);
            }
        };
        self.note_superseded(request, "detail");

        let record = fill_placeholders(record, codigo);
        self.presenter.render_detail(&record, &term);
        self.presenter.show();
        *lock(&self.view) = View::Detail {
            codigo: record.codigo,
            term,
        };
        Ok(())
    }

    /// Return to the last result list without searching again.
    ///
    /// Falls back to re-running the last term when no results are cached.
    pub async fn go_back(&self) {
        let (cached, last_term) = {
            let session = lock(&self.session);
            let cached = (!session.last_results.is_empty()).then(|| session.last_results.clone());
            (cached, session.last_term.clone())
        };
        match cached {
            Some(results) => {
                info!(term = %last_term, count = results.len(), "back to cached results");
                self.show_results(results, last_term);
            }
            None => {
                info!(term = %last_term, "no cached results, searching again");
                self.submit_search(&last_term).await;
            }
        }
    }

    pub fn close(&self) {
        self.presenter.hide();
        *lock(&self.view) = View::Idle;
    }

    fn show_results(&self, results: Vec<Rubrica>, term: String) {
        self.render_list(&results, &term);
        *lock(&self.view) = View::List { term: term.clone() };
        *lock(&self.session) = SearchSession {
            last_results: results,
            last_term: term,
        };
    }

    fn render_list(&self, results: &[Rubrica], term: &str) {
        self.presenter
            .render_list(&ListPage::new(term, results, self.policy));
        self.presenter.show();
    }

    /// The search a detail view returns to.
    ///
    /// Read from the session, which [`go_back`](Self::go_back) replays, so a
    /// list left on screen by a failed search is not offered as the target.
    fn origin_term(&self) -> String {
        let term = lock(&self.session).last_term.clone();
        if term.is_empty() {
            ALL_RECORDS_TERM.to_string()
        } else {
            term
        }
    }

    fn begin_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn note_superseded(&self, request: u64, kind: &str) {
        let latest = self.latest_request.load(Ordering::SeqCst);
        if latest != request {
            warn!(request, latest, kind, "applying response of a superseded request");
        }
    }
}

/// Detail documents missing their headline fields still render.
fn fill_placeholders(mut record: Rubrica, requested: &str) -> Rubrica {
    if record.codigo().is_none() {
        record.codigo = requested.to_string();
    }
    if record.nome().is_none() {
        record.nome = Some(MISSING_NOME.to_string());
    }
    if record.descricao().is_none() {
        record.descricao = Some(MISSING_DESCRICAO.to_string());
    }
    record
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
