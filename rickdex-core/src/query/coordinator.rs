//! The query coordinator: a handle plus a single actor task.
//!
//! The actor owns the committed search term, the page index and the status
//! filter; handles only send commands. Inside the actor three event sources
//! are multiplexed:
//!
//! - commands from handles (`set_search_term`, `set_page`, `set_status`,
//!   shutdown)
//! - the debounce deadline for the pending search term
//! - completions posted back by spawned fetch tasks
//!
//! Fetch tasks never touch coordinator state. Each one carries the
//! generation of the channel it was started on, and the actor drops any
//! completion whose generation is no longer current.

use std::fmt;
use std::sync::Arc;

use rickdex_config::QueryConfig;
use rickdex_model::{CharacterQuery, CharacterStatus, PageIndex, PageResult};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::events::{FetchFailure, FetchOrigin, PageUpdate, QueryOutcome};
use super::slot::LatestSlot;
use super::stream::ResultStream;
use crate::api::CharacterApi;
use crate::error::{CoreError, FetchError, Result};
use crate::selection::SearchTermSink;

#[derive(Debug)]
enum Command {
    SetSearchTerm(String),
    SetPage(PageIndex),
    SetStatus(Option<CharacterStatus>),
    Shutdown,
}

struct Completion {
    origin: FetchOrigin,
    generation: u64,
    query: CharacterQuery,
    result: std::result::Result<PageResult, FetchError>,
}

/// Cloneable handle to a running coordinator.
///
/// The coordinator stops when [`shutdown`](Self::shutdown) is called or when
/// every handle has been dropped; in-flight requests are abandoned either
/// way.
#[derive(Clone)]
pub struct QueryCoordinator {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::WeakSender<QueryOutcome>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl fmt::Debug for QueryCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCoordinator")
            .field("running", &self.is_running())
            .field(
                "subscribers",
                &self
                    .events
                    .upgrade()
                    .map_or(0, |sender| sender.receiver_count()),
            )
            .finish()
    }
}

impl QueryCoordinator {
    /// Start a coordinator on the current tokio runtime.
    ///
    /// Subscribe with [`results`](Self::results) before awaiting anything
    /// if the start-up fetch must be observed.
    pub fn spawn(api: Arc<dyn CharacterApi>, config: &QueryConfig) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (completions, completion_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.result_buffer.max(1));
        let weak_events = events.downgrade();

        let actor = QueryActor {
            api,
            events,
            completions,
            debouncer: Debouncer::with_initial(config.debounce, String::new()),
            status: None,
            page: PageIndex::FIRST,
            term_slot: LatestSlot::new(FetchOrigin::Term),
            page_slot: LatestSlot::new(FetchOrigin::Page),
        };

        info!(
            debounce_ms = config.debounce.as_millis() as u64,
            fetch_on_start = config.fetch_on_start,
            "query coordinator started"
        );
        let task = tokio::spawn(actor.run(
            command_rx,
            completion_rx,
            config.fetch_on_start,
        ));

        Self {
            commands,
            events: weak_events,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    /// Record a new search term. The fetch fires once input has been quiet
    /// for the configured debounce, and only if the term differs from the
    /// last one fetched.
    pub fn set_search_term(&self, term: impl Into<String>) -> Result<()> {
        self.send(Command::SetSearchTerm(term.into()))
    }

    /// Fetch `index` immediately using the last fetched term.
    ///
    /// Not deduplicated and not clamped to the known page count.
    pub fn set_page(&self, index: PageIndex) -> Result<()> {
        self.send(Command::SetPage(index))
    }

    /// Change the server-side status filter and fetch page 0 immediately.
    pub fn set_status(&self, status: Option<CharacterStatus>) -> Result<()> {
        self.send(Command::SetStatus(status))
    }

    /// Subscribe to outcomes published from now on.
    pub fn results(&self) -> ResultStream {
        match self.events.upgrade() {
            Some(sender) => ResultStream::new(sender.subscribe()),
            None => ResultStream::closed(),
        }
    }

    /// False once the coordinator task has exited.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Stop the actor and wait for it to exit. Idempotent.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
        let task = self.task.lock().await.take();
        if let Some(task) = task
            && let Err(err) = task.await
            && err.is_panic()
        {
            warn!(error = %err, "query coordinator task panicked");
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| CoreError::CoordinatorClosed)
    }
}

impl SearchTermSink for QueryCoordinator {
    fn set_search_term(&self, term: String) -> Result<()> {
        QueryCoordinator::set_search_term(self, term)
    }
}

struct QueryActor {
    api: Arc<dyn CharacterApi>,
    events: broadcast::Sender<QueryOutcome>,
    completions: mpsc::UnboundedSender<Completion>,
    debouncer: Debouncer<String>,
    status: Option<CharacterStatus>,
    page: PageIndex,
    term_slot: LatestSlot,
    page_slot: LatestSlot,
}

impl QueryActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
        fetch_on_start: bool,
    ) {
        if fetch_on_start {
            self.fetch_page();
        }

        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(done) = completions.recv() => self.deliver(done),
                () = wait_until(deadline) => self.flush_term(),
            }
        }

        debug!(
            term_in_flight = self.term_slot.is_busy(),
            page_in_flight = self.page_slot.is_busy(),
            "abandoning in-flight requests"
        );
        self.term_slot.abort();
        self.page_slot.abort();
        info!("query coordinator stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SetSearchTerm(term) => {
                debug!(term = %term, "search term changed");
                self.debouncer.push(term, Instant::now());
            }
            Command::SetPage(index) => {
                self.page = index;
                self.fetch_page();
            }
            Command::SetStatus(status) => {
                self.status = status;
                self.page = PageIndex::FIRST;
                self.fetch_page();
            }
            // Handled by the run loop.
            Command::Shutdown => {}
        }
    }

    /// Term last sent to the API by the term channel.
    fn committed_term(&self) -> String {
        self.debouncer.last_emitted().cloned().unwrap_or_default()
    }

    fn flush_term(&mut self) {
        let Some(term) = self.debouncer.poll(Instant::now()) else {
            debug!("search term unchanged; no fetch");
            return;
        };
        self.page = PageIndex::FIRST;
        let query =
            CharacterQuery::new(term, self.page).with_status(self.status);
        self.dispatch(FetchOrigin::Term, query);
    }

    fn fetch_page(&mut self) {
        let query = CharacterQuery::new(self.committed_term(), self.page)
            .with_status(self.status);
        self.dispatch(FetchOrigin::Page, query);
    }

    fn slot_mut(&mut self, origin: FetchOrigin) -> &mut LatestSlot {
        match origin {
            FetchOrigin::Term => &mut self.term_slot,
            FetchOrigin::Page => &mut self.page_slot,
        }
    }

    fn dispatch(&mut self, origin: FetchOrigin, query: CharacterQuery) {
        let generation = self.slot_mut(origin).begin();
        debug!(
            %origin,
            generation,
            name = %query.name,
            page = query.page.to_wire(),
            "dispatching fetch"
        );

        let api = Arc::clone(&self.api);
        let completions = self.completions.clone();
        let handle = tokio::spawn(async move {
            let result = api.fetch_characters(&query).await;
            let _ = completions.send(Completion {
                origin,
                generation,
                query,
                result,
            });
        });
        self.slot_mut(origin).attach(handle);
    }

    fn deliver(&mut self, done: Completion) {
        let slot = self.slot_mut(done.origin);
        if !slot.is_current(done.generation) {
            debug!(
                origin = %done.origin,
                generation = done.generation,
                "discarding stale response"
            );
            return;
        }
        slot.settle(done.generation);

        let outcome = match done.result {
            Ok(page) => {
                debug!(
                    origin = %done.origin,
                    total = page.total_count,
                    records = page.len(),
                    "fetch completed"
                );
                QueryOutcome::Loaded(PageUpdate {
                    origin: done.origin,
                    query: done.query,
                    result: Arc::new(page),
                })
            }
            Err(error) => {
                warn!(
                    origin = %done.origin,
                    name = %done.query.name,
                    page = done.query.page.to_wire(),
                    %error,
                    "fetch failed"
                );
                QueryOutcome::Failed(FetchFailure {
                    origin: done.origin,
                    query: done.query,
                    error,
                })
            }
        };

        if self.events.send(outcome).is_err() {
            debug!("no result subscribers");
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use tokio::time::{sleep, timeout};
    use url::Url;

    use super::*;
    use crate::api::routes::character_url;
    use crate::api::service::MockCharacterApi;
    use crate::testing::{GatedApi, RecordingApi};

    const DEBOUNCE: Duration = Duration::from_millis(400);

    fn config() -> QueryConfig {
        QueryConfig {
            debounce: DEBOUNCE,
            fetch_on_start: false,
            result_buffer: 16,
        }
    }

    async fn next(results: &mut ResultStream) -> QueryOutcome {
        timeout(Duration::from_secs(5), results.next())
            .await
            .expect("outcome before timeout")
            .expect("stream still open")
    }

    async fn assert_quiet(results: &mut ResultStream) {
        let extra = timeout(Duration::from_secs(5), results.next()).await;
        assert!(extra.is_err(), "unexpected outcome: {extra:?}");
    }

    fn loaded_name(outcome: &QueryOutcome) -> &str {
        match outcome {
            QueryOutcome::Loaded(update) => &update.result.records[0].name,
            QueryOutcome::Failed(failure) => {
                panic!("expected a page, got {:?}", failure.error)
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_fetch_for_last_term() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("a").unwrap();
        sleep(Duration::from_millis(100)).await;
        coordinator.set_search_term("ab").unwrap();
        sleep(Duration::from_millis(100)).await;
        coordinator.set_search_term("abc").unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(
            api.calls(),
            vec![CharacterQuery::new("abc", PageIndex::FIRST)]
        );
        let outcome = next(&mut results).await;
        assert_eq!(outcome.origin(), FetchOrigin::Term);
        assert_eq!(outcome.query().page.to_wire(), 1);
        assert_eq!(loaded_name(&outcome), "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_the_quiet_period() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());

        coordinator.set_search_term("rick").unwrap();
        sleep(DEBOUNCE - Duration::from_millis(1)).await;
        assert!(api.calls().is_empty());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn identical_term_is_not_refetched() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("x").unwrap();
        sleep(Duration::from_millis(500)).await;
        next(&mut results).await;

        coordinator.set_search_term("x").unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(api.calls().len(), 1);
        assert_quiet(&mut results).await;
    }

    #[tokio::test(start_paused = true)]
    async fn empty_default_term_is_not_fetched() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("").unwrap();
        sleep(Duration::from_secs(1)).await;

        assert!(api.calls().is_empty());
        assert_quiet(&mut results).await;
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_back_to_empty_within_window_is_not_fetched() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("a").unwrap();
        sleep(Duration::from_millis(100)).await;
        coordinator.set_search_term("").unwrap();
        sleep(Duration::from_secs(1)).await;

        assert!(api.calls().is_empty());
        assert_quiet(&mut results).await;
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_term_response_is_discarded() {
        let api = GatedApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("a").unwrap();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(api.call_count(), 1);

        coordinator.set_search_term("b").unwrap();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(api.call_count(), 2);

        // Resolve out of order: the stale request first.
        api.resolve_echo(0);
        assert!(api.resolve_echo(1));

        let outcome = next(&mut results).await;
        assert_eq!(loaded_name(&outcome), "b");
        assert_quiet(&mut results).await;
    }

    #[tokio::test(start_paused = true)]
    async fn set_page_fetches_immediately_with_one_based_wire_page() {
        let mut api = MockCharacterApi::new();
        api.expect_fetch_characters()
            .withf(|query: &CharacterQuery| {
                query.name.is_empty()
                    && query.status.is_none()
                    && query.page == PageIndex::new(2)
            })
            .times(1)
            .returning(|_| Ok(PageResult::empty()));

        let coordinator = QueryCoordinator::spawn(Arc::new(api), &config());
        let mut results = coordinator.results();
        let started = Instant::now();

        coordinator.set_page(PageIndex::new(2)).unwrap();
        let outcome = next(&mut results).await;

        assert!(started.elapsed() < DEBOUNCE);
        assert_eq!(outcome.origin(), FetchOrigin::Page);
        let base = Url::parse("https://rickandmortyapi.com/api/").unwrap();
        let url = character_url(&base, outcome.query()).unwrap();
        assert!(url.as_str().ends_with("page=3"), "{url}");
    }

    #[tokio::test(start_paused = true)]
    async fn same_page_twice_fetches_twice() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_page(PageIndex::FIRST).unwrap();
        next(&mut results).await;
        coordinator.set_page(PageIndex::FIRST).unwrap();
        next(&mut results).await;

        assert_eq!(
            api.calls(),
            vec![
                CharacterQuery::new("", PageIndex::FIRST),
                CharacterQuery::new("", PageIndex::FIRST),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn page_channel_keeps_only_newest_request() {
        let api = GatedApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_page(PageIndex::new(1)).unwrap();
        sleep(Duration::from_millis(1)).await;
        coordinator.set_page(PageIndex::new(1)).unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(api.call_count(), 2);

        api.resolve_echo(0);
        assert!(api.resolve_echo(1));

        let outcome = next(&mut results).await;
        assert_eq!(outcome.query().page, PageIndex::new(1));
        assert_quiet(&mut results).await;
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_reported_and_channel_recovers() {
        let api = RecordingApi::with(|query| {
            if query.name == "boom" {
                Err(FetchError::Status {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                })
            } else {
                Ok(crate::testing::page_for(query))
            }
        });
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("boom").unwrap();
        sleep(Duration::from_millis(500)).await;
        let failed = next(&mut results).await;
        assert!(failed.is_failure());
        assert_eq!(failed.error().and_then(FetchError::status), Some(500));

        coordinator.set_search_term("y").unwrap();
        sleep(Duration::from_millis(500)).await;
        let loaded = next(&mut results).await;
        assert_eq!(loaded_name(&loaded), "y");

        coordinator.set_page(PageIndex::new(1)).unwrap();
        let paged = next(&mut results).await;
        assert_eq!(paged.query().name, "y");
    }

    #[tokio::test(start_paused = true)]
    async fn page_fetch_uses_last_fetched_term_not_pending_input() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("rick").unwrap();
        sleep(Duration::from_millis(500)).await;
        next(&mut results).await;

        coordinator.set_search_term("mor").unwrap();
        coordinator.set_page(PageIndex::new(3)).unwrap();
        let paged = next(&mut results).await;
        assert_eq!(paged.query(), &CharacterQuery::new("rick", PageIndex::new(3)));

        sleep(Duration::from_millis(500)).await;
        let termed = next(&mut results).await;
        assert_eq!(termed.query(), &CharacterQuery::new("mor", PageIndex::FIRST));
    }

    #[tokio::test(start_paused = true)]
    async fn status_change_refetches_first_page_with_current_term() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("smith").unwrap();
        sleep(Duration::from_millis(500)).await;
        next(&mut results).await;
        coordinator.set_page(PageIndex::new(4)).unwrap();
        next(&mut results).await;

        coordinator
            .set_status(Some(CharacterStatus::Dead))
            .unwrap();
        let outcome = next(&mut results).await;
        assert_eq!(
            outcome.query(),
            &CharacterQuery::new("smith", PageIndex::FIRST)
                .with_status(Some(CharacterStatus::Dead))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn term_and_page_channels_do_not_cancel_each_other() {
        let api = GatedApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_search_term("a").unwrap();
        sleep(Duration::from_millis(500)).await;
        coordinator.set_page(PageIndex::new(1)).unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(api.call_count(), 2);

        assert!(api.resolve_echo(1));
        assert!(api.resolve_echo(0));

        let mut origins = vec![
            next(&mut results).await.origin(),
            next(&mut results).await.origin(),
        ];
        origins.sort_by_key(|origin| *origin == FetchOrigin::Page);
        assert_eq!(origins, vec![FetchOrigin::Term, FetchOrigin::Page]);
    }

    #[tokio::test(start_paused = true)]
    async fn start_up_fetch_loads_unfiltered_first_page() {
        let api = GatedApi::new();
        let config = QueryConfig {
            fetch_on_start: true,
            ..config()
        };
        let coordinator = QueryCoordinator::spawn(api.clone(), &config);
        let mut results = coordinator.results();

        sleep(Duration::from_millis(1)).await;
        assert_eq!(api.queries(), vec![CharacterQuery::default()]);
        api.resolve_echo(0);

        let outcome = next(&mut results).await;
        assert_eq!(outcome.origin(), FetchOrigin::Page);
        assert_eq!(outcome.query().page.to_wire(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn each_subscriber_sees_outcomes_independently() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut first = coordinator.results();

        coordinator.set_page(PageIndex::FIRST).unwrap();
        next(&mut first).await;
        drop(first);

        let mut second = coordinator.results();
        coordinator.set_page(PageIndex::new(1)).unwrap();
        let outcome = next(&mut second).await;
        assert_eq!(outcome.query().page, PageIndex::new(1));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_streams_and_rejects_commands() {
        let api = GatedApi::new();
        let coordinator = QueryCoordinator::spawn(api.clone(), &config());
        let mut results = coordinator.results();

        coordinator.set_page(PageIndex::FIRST).unwrap();
        sleep(Duration::from_millis(1)).await;
        coordinator.shutdown().await;

        assert!(!coordinator.is_running());
        assert!(results.next().await.is_none());
        assert!(coordinator.results().next().await.is_none());
        assert!(matches!(
            coordinator.set_page(PageIndex::FIRST),
            Err(CoreError::CoordinatorClosed)
        ));
        // In-flight request was abandoned with the actor.
        sleep(Duration::from_millis(1)).await;
        assert!(!api.resolve_echo(0));
    }

    #[tokio::test(start_paused = true)]
    async fn debug_reports_live_subscribers() {
        let api = RecordingApi::new();
        let coordinator = QueryCoordinator::spawn(api, &config());
        let _first = coordinator.results();
        let _second = coordinator.results();

        let text = format!("{coordinator:?}");
        assert!(text.contains("running: true"), "{text}");
        assert!(text.contains("subscribers: 2"), "{text}");

        coordinator.shutdown().await;
        let text = format!("{coordinator:?}");
        assert!(text.contains("running: false"), "{text}");
        assert!(text.contains("subscribers: 0"), "{text}");
    }
}
