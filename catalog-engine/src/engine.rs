//! Pagination state machine.
//!
//! The engine owns `PaginationState` and is the only thing that mutates it.
//! Every intent (filter, sort, search, navigation, refresh) issues a pipeline
//! tagged with a sequence number; a finished pipeline commits only if no
//! later one was issued in the meantime, so results land in request order
//! regardless of completion order.
//!
//! ```text
//! Idle ──intent──▶ Loading ──ok──▶ Ready
//!                     │               │
//!                     └──err──▶ Error ┘ (any intent re-enters Loading)
//! ```

use crate::assembler::{decode_product, fetch_page};
use crate::config::EngineConfig;
use crate::count::{count_matching, total_pages};
use crate::cursor::resolve_cursor;
use crate::error::{EngineError, EngineResult};
use crate::spec::{QuerySpec, Sort};
use crate::state::{PaginationState, QueryParams, Status};
use catalog_store::DocumentStore;
use catalog_types::{Product, ProductId};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Whether a pipeline must re-count or may reuse the last count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    Recount,
    Reuse,
}

/// Last committed count. Only reusable while the query spec is unchanged.
#[derive(Debug, Clone)]
struct CountSnapshot {
    spec: QuerySpec,
    total_count: u64,
    total_pages: u32,
}

#[derive(Debug, Default)]
struct Session {
    params: QueryParams,
    counted: Option<CountSnapshot>,
}

/// Everything a pipeline needs, captured at issue time.
struct Ticket {
    seq: u64,
    spec: QuerySpec,
    page: u32,
    search_term: String,
    counted: Option<CountSnapshot>,
}

struct PageOutcome {
    page: u32,
    count: CountSnapshot,
    results: Vec<Product>,
}

/// A search term waiting out the debounce interval.
struct PendingSearch {
    generation: u64,
    term: String,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct Debounce {
    /// Bumped on every new, cancelled or flushed term.
    generation: u64,
    pending: Option<PendingSearch>,
}

struct Shared {
    store: Arc<dyn DocumentStore>,
    config: EngineConfig,
    page_size: NonZeroUsize,
    session: Mutex<Session>,
    /// Sequence number of the latest issued pipeline.
    sequence: AtomicU64,
    state: watch::Sender<PaginationState>,
    debounce: Mutex<Debounce>,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn debounce_state(&self) -> MutexGuard<'_, Debounce> {
        self.debounce.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spec_for(&self, params: &QueryParams) -> QuerySpec {
        QuerySpec::build(
            params.category.as_deref(),
            params.sort.field,
            params.sort.direction,
            self.page_size,
        )
        .in_collection(self.config.collection.as_str())
    }

    /// Stops the debounce task and hands back the term it was holding.
    fn take_pending_search(&self) -> Option<String> {
        let mut debounce = self.debounce_state();
        debounce.generation += 1;
        debounce.pending.take().map(|pending| {
            pending.task.abort();
            pending.term
        })
    }

    fn cancel_pending_search(&self) {
        if let Some(term) = self.take_pending_search() {
            debug!(term = %term, "pending search cancelled");
        }
    }

    /// Applies a parameter change and, if it was accepted, issues a pipeline
    /// and enters `Loading`.
    fn issue(&self, plan: Plan, change: impl FnOnce(&mut Session) -> bool) -> Option<Ticket> {
        let mut session = self.session();
        if !change(&mut *session) {
            return None;
        }

        let spec = self.spec_for(&session.params);
        let counted = match plan {
            Plan::Recount => None,
            Plan::Reuse => session.counted.clone().filter(|c| c.spec == spec),
        };
        let page = session.params.current_page.max(1);
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        self.state.send_modify(|s| {
            s.current_page = page;
            s.status = Status::Loading;
            s.error_detail = None;
        });
        debug!(seq, page, recount = counted.is_none(), "pipeline issued");

        Some(Ticket {
            seq,
            spec,
            page,
            search_term: session.params.search_term.clone(),
            counted,
        })
    }

    /// Count (unless reusable) → cursor → page fetch.
    async fn execute(&self, ticket: &Ticket) -> EngineResult<PageOutcome> {
        let store = self.store.as_ref();
        let spec = &ticket.spec;
        let mut page = ticket.page;
        let mut counted = ticket.counted.clone();
        let mut retried = false;

        loop {
            let count = match counted.take() {
                Some(count) => count,
                None => {
                    let total_count = count_matching(store, spec).await?;
                    let count = CountSnapshot {
                        spec: spec.clone(),
                        total_count,
                        total_pages: total_pages(total_count, self.page_size),
                    };
                    if page > count.total_pages {
                        info!(
                            page,
                            total_pages = count.total_pages,
                            "result set shrank, returning to page 1"
                        );
                        page = 1;
                    }
                    count
                }
            };

            let cursor = match resolve_cursor(store, spec, page).await {
                Ok(cursor) => cursor,
                Err(EngineError::PageOutOfRange { .. }) if !retried => {
                    warn!(seq = ticket.seq, page, "page no longer reachable, retrying from page 1");
                    retried = true;
                    page = 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            let results = fetch_page(store, spec, cursor.as_ref(), &ticket.search_term).await?;
            return Ok(PageOutcome {
                page,
                count,
                results,
            });
        }
    }

    /// Publishes a pipeline's outcome if it is still the latest one.
    fn commit(&self, seq: u64, outcome: EngineResult<PageOutcome>) {
        let mut session = self.session();
        let latest = self.sequence.load(Ordering::SeqCst);
        if seq != latest {
            debug!(seq, latest, "discarding superseded pipeline");
            return;
        }

        match outcome {
            Ok(outcome) => {
                let total_count = outcome.count.total_count;
                let total_pages = outcome.count.total_pages;
                session.params.current_page = outcome.page;
                session.counted = Some(outcome.count);
                debug!(
                    seq,
                    page = outcome.page,
                    total_pages,
                    shown = outcome.results.len(),
                    "pipeline committed"
                );
                self.state.send_modify(|s| {
                    s.current_page = outcome.page;
                    s.total_pages = total_pages;
                    s.total_count = total_count;
                    s.status = Status::Ready;
                    s.error_detail = None;
                    s.results = outcome.results;
                });
            }
            Err(err) => {
                warn!(seq, error = %err, "catalog query failed");
                self.state.send_modify(|s| {
                    s.status = Status::Error;
                    s.error_detail = Some(err.user_message());
                    s.results.clear();
                });
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let debounce = self
            .debounce
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = debounce.pending.take() {
            pending.task.abort();
        }
    }
}

/// The catalog query engine.
///
/// Cheap to clone; clones share one state machine. Intents that trigger a
/// fetch are `async` and resolve once their pipeline has committed or been
/// superseded; observers read [`CatalogEngine::snapshot`] or follow
/// [`CatalogEngine::subscribe`].
#[derive(Clone)]
pub struct CatalogEngine {
    shared: Arc<Shared>,
}

impl CatalogEngine {
    /// Creates an engine over `store`. The engine starts `Idle`; call
    /// [`CatalogEngine::refresh`] for the first load.
    pub fn new(store: Arc<dyn DocumentStore>, config: EngineConfig) -> EngineResult<Self> {
        let page_size = config.validate()?;
        let (state, _) = watch::channel(PaginationState::default());

        info!(
            backend = store.backend_name(),
            page_size = page_size.get(),
            collection = %config.collection,
            "catalog engine created"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                store,
                config,
                page_size,
                session: Mutex::new(Session::default()),
                sequence: AtomicU64::new(0),
                state,
                debounce: Mutex::new(Debounce::default()),
            }),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    pub fn page_size(&self) -> usize {
        self.shared.page_size.get()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> PaginationState {
        self.shared.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PaginationState> {
        self.shared.state.subscribe()
    }

    /// Current query parameters.
    pub fn params(&self) -> QueryParams {
        self.shared.session().params.clone()
    }

    /// The query spec the current parameters translate to.
    pub fn query_spec(&self) -> QuerySpec {
        let session = self.shared.session();
        self.shared.spec_for(&session.params)
    }

    // ── Intents ──────────────────────────────────────────────────

    /// Re-runs the full pipeline (count included) for the current parameters.
    pub async fn refresh(&self) {
        self.dispatch(Plan::Recount, |_| true).await;
    }

    /// Filters by category (`None` or empty for all products) and returns to
    /// page 1.
    pub async fn set_filter(&self, category: Option<String>) {
        let category = category.filter(|c| !c.is_empty());
        self.dispatch(Plan::Recount, move |session| {
            session.params.category = category;
            session.params.current_page = 1;
            true
        })
        .await;
    }

    /// Changes the sort order and returns to page 1.
    pub async fn set_sort(&self, sort: Sort) {
        self.dispatch(Plan::Recount, move |session| {
            session.params.sort = sort;
            session.params.current_page = 1;
            true
        })
        .await;
    }

    /// Records a search term. The term is applied (page reset to 1, page
    /// re-fetched) only once no further term arrives within the debounce
    /// interval. Must be called from within a tokio runtime.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        let delay = self.shared.config.debounce();
        let weak = Arc::downgrade(&self.shared);

        // Generation bump and task swap happen under one lock.
        let mut debounce = self.shared.debounce_state();
        debounce.generation += 1;
        let generation = debounce.generation;
        if let Some(previous) = debounce.pending.take() {
            previous.task.abort();
        }

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let settled = shared
                .debounce_state()
                .pending
                .take_if(|pending| pending.generation == generation);
            let Some(pending) = settled else {
                return;
            };
            debug!(term = %pending.term, "search term settled");
            CatalogEngine { shared }
                .apply_search_term(pending.term)
                .await;
        });
        debounce.pending = Some(PendingSearch {
            generation,
            term,
            task,
        });
    }

    /// Applies the pending search term right away instead of waiting out the
    /// debounce interval. Returns `false` if no term was pending.
    pub async fn flush_pending_search(&self) -> bool {
        let Some(term) = self.shared.take_pending_search() else {
            return false;
        };
        debug!(term = %term, "pending search flushed");
        self.apply_search_term(term).await;
        true
    }

    async fn apply_search_term(&self, term: String) {
        self.dispatch(Plan::Reuse, move |session| {
            session.params.search_term = term;
            session.params.current_page = 1;
            true
        })
        .await;
    }

    /// Moves one page forward. Returns `false` (no-op) on the last page.
    pub async fn go_to_next_page(&self) -> bool {
        self.navigate(|page| page.checked_add(1)).await
    }

    /// Moves one page back. Returns `false` (no-op) on page 1.
    pub async fn go_to_previous_page(&self) -> bool {
        self.navigate(|page| page.checked_sub(1)).await
    }

    /// Jumps to `page`. Returns `false` (no-op) outside `[1, total_pages]`.
    pub async fn go_to_page(&self, page: u32) -> bool {
        self.navigate(move |_| Some(page)).await
    }

    /// Resets filter, sort and search, and reloads page 1.
    pub async fn clear_all(&self) {
        self.shared.cancel_pending_search();
        self.dispatch(Plan::Recount, |session| {
            session.params = QueryParams::default();
            true
        })
        .await;
    }

    /// Cancels the pending search and suppresses any in-flight pipeline.
    ///
    /// A suppressed pipeline never commits, so the published state may stay
    /// at `Status::Loading`; subscribers should stop waiting after calling
    /// this. Use [`CatalogEngine::flush_pending_search`] first to keep a
    /// pending term.
    pub fn shutdown(&self) {
        self.shared.cancel_pending_search();
        self.shared.sequence.fetch_add(1, Ordering::SeqCst);
        info!("catalog engine shut down");
    }

    /// Looks up a single product by id.
    pub async fn product(&self, id: &ProductId) -> EngineResult<Option<Product>> {
        let doc = self
            .shared
            .store
            .get(&self.shared.config.collection, id.as_str())
            .await
            .map_err(EngineError::Fetch)?;
        doc.as_ref().map(decode_product).transpose()
    }

    // ── Pipeline plumbing ────────────────────────────────────────

    /// Page navigation: bounded by the last count for the current spec, and
    /// skips the count query.
    async fn navigate(&self, target: impl FnOnce(u32) -> Option<u32>) -> bool {
        let shared = &self.shared;
        self.dispatch(Plan::Reuse, |session| {
            let spec = shared.spec_for(&session.params);
            let known_pages = session
                .counted
                .as_ref()
                .filter(|c| c.spec == spec)
                .map_or(1, |c| c.total_pages);
            let current = session.params.current_page;
            match target(current) {
                Some(page) if page != current && (1..=known_pages).contains(&page) => {
                    session.params.current_page = page;
                    true
                }
                _ => {
                    debug!(current, known_pages, "navigation rejected");
                    false
                }
            }
        })
        .await
    }

    async fn dispatch(&self, plan: Plan, change: impl FnOnce(&mut Session) -> bool) -> bool {
        let Some(ticket) = self.shared.issue(plan, change) else {
            return false;
        };
        let outcome = self.shared.execute(&ticket).await;
        self.shared.commit(ticket.seq, outcome);
        true
    }
}
