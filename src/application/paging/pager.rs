//! Pager: per-key load state machine
//!
//! Each page key moves `Idle → Loading → Loaded | Errored`. A key that is
//! loading or loaded is never requested again until [`Pager::refresh`]
//! invalidates everything. Results that arrive after a refresh are dropped.
//! A load that is cancelled mid-flight puts its key back to `Idle`, and
//! callers that asked for a key already in flight wait for that load.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, warn};

use super::source::PageSource;
use crate::shared::{LoadError, Page, PagingState};

#[derive(Debug, Clone)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded {
        prev_key: Option<u32>,
        next_key: Option<u32>,
    },
    Errored(Arc<LoadError>),
}

/// What a load request ended up doing
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The page was fetched and stored
    Loaded(u32),
    /// Already loaded, either before the call or by a load this call waited on
    AlreadyLoaded(u32),
    /// No further page in the requested direction
    EndReached,
    /// A refresh happened while loading; the result was discarded
    Stale(u32),
    Failed(Arc<LoadError>),
}

struct PagerInner<T> {
    pages: BTreeMap<u32, Page<T>>,
    states: HashMap<u32, LoadState>,
    /// Closed when the load for the key finishes or is dropped
    in_flight: HashMap<u32, watch::Receiver<()>>,
    anchor: Option<usize>,
    generation: u64,
}

/// Held by the one caller fetching a key. Dropping it releases the key.
struct LoadingGuard<'a, T> {
    inner: &'a Mutex<PagerInner<T>>,
    key: u32,
    generation: u64,
    _done: watch::Sender<()>,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.generation != self.generation {
            return;
        }
        inner.in_flight.remove(&self.key);
        if matches!(inner.states.get(&self.key), Some(LoadState::Loading)) {
            debug!("Load of page {} cancelled", self.key);
            inner.states.remove(&self.key);
        }
    }
}

enum Claim<'a, T> {
    Fetch(LoadingGuard<'a, T>),
    Wait(watch::Receiver<()>),
}

pub struct Pager<S: PageSource> {
    source: S,
    page_size: u32,
    inner: Mutex<PagerInner<S::Item>>,
}

impl<S: PageSource> Pager<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            inner: Mutex::new(PagerInner {
                pages: BTreeMap::new(),
                states: HashMap::new(),
                in_flight: HashMap::new(),
                anchor: None,
                generation: 0,
            }),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn lock(&self) -> MutexGuard<'_, PagerInner<S::Item>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self, key: u32) -> LoadState {
        self.lock()
            .states
            .get(&key)
            .cloned()
            .unwrap_or(LoadState::Idle)
    }

    /// Loaded pages in key order
    pub fn pages(&self) -> Vec<Page<S::Item>> {
        self.lock().pages.values().cloned().collect()
    }

    /// All loaded items in key order
    pub fn items(&self) -> Vec<S::Item> {
        self.lock()
            .pages
            .values()
            .flat_map(|p| p.data.iter().cloned())
            .collect()
    }

    /// Record the last-viewed item position
    pub fn set_anchor(&self, position: usize) {
        self.lock().anchor = Some(position);
    }

    /// Mark `key` as loading, or hand back the in-flight load to wait on
    fn claim(&self, key: u32, waited: bool) -> Result<Claim<'_, S::Item>, LoadOutcome> {
        let mut inner = self.lock();
        match inner.states.get(&key) {
            Some(LoadState::Loaded { .. }) => return Err(LoadOutcome::AlreadyLoaded(key)),
            Some(LoadState::Errored(e)) if waited => return Err(LoadOutcome::Failed(e.clone())),
            Some(LoadState::Loading) => {
                if let Some(done) = inner.in_flight.get(&key) {
                    return Ok(Claim::Wait(done.clone()));
                }
            }
            _ => {}
        }

        let (done, rx) = watch::channel(());
        inner.states.insert(key, LoadState::Loading);
        inner.in_flight.insert(key, rx);
        Ok(Claim::Fetch(LoadingGuard {
            inner: &self.inner,
            key,
            generation: inner.generation,
            _done: done,
        }))
    }

    /// Load page `key` unless it is already loaded. A key already loading
    /// is not fetched twice: the caller waits for that load instead.
    pub async fn load(&self, key: u32) -> LoadOutcome {
        let mut waited = false;
        let guard = loop {
            match self.claim(key, waited) {
                Err(outcome) => return outcome,
                Ok(Claim::Fetch(guard)) => break guard,
                Ok(Claim::Wait(mut done)) => {
                    debug!("Page {} already loading, waiting", key);
                    // errors once the loading side drops its sender
                    let _ = done.changed().await;
                    waited = true;
                }
            }
        };

        debug!("Loading page {} (size {})", key, self.page_size);
        let result = self.source.load(key, self.page_size).await;

        let outcome = {
            let mut inner = self.lock();
            if inner.generation != guard.generation {
                debug!("Dropping page {} loaded before refresh", key);
                LoadOutcome::Stale(key)
            } else {
                match result {
                    Ok(page) => {
                        inner.states.insert(
                            key,
                            LoadState::Loaded {
                                prev_key: page.prev_key,
                                next_key: page.next_key,
                            },
                        );
                        inner.pages.insert(key, page);
                        LoadOutcome::Loaded(key)
                    }
                    Err(e) => {
                        warn!("Page {} failed: {}", key, e);
                        let e = Arc::new(e);
                        inner.states.insert(key, LoadState::Errored(e.clone()));
                        LoadOutcome::Failed(e)
                    }
                }
            }
        };
        drop(guard);
        outcome
    }

    /// "Need more" at the end of the list
    pub async fn load_next(&self) -> LoadOutcome {
        let key = {
            let inner = self.lock();
            match inner.pages.values().next_back() {
                None => Some(1),
                Some(last) => last.next_key,
            }
        };
        match key {
            Some(key) => self.load(key).await,
            None => LoadOutcome::EndReached,
        }
    }

    /// "Need more" at the start of the list
    pub async fn load_previous(&self) -> LoadOutcome {
        let key = self.lock().pages.values().next().and_then(|first| first.prev_key);
        match key {
            Some(key) => self.load(key).await,
            None => LoadOutcome::EndReached,
        }
    }

    /// Invalidate everything and reload around the anchor (page 1 if none)
    pub async fn refresh(&self) -> LoadOutcome {
        let key = {
            let mut inner = self.lock();
            let pages: Vec<Page<S::Item>> = inner.pages.values().cloned().collect();
            let state = PagingState::new(&pages, inner.anchor);
            let key = self.source.refresh_key(&state).unwrap_or(1);

            inner.pages.clear();
            inner.states.clear();
            inner.in_flight.clear();
            inner.anchor = None;
            inner.generation += 1;
            key
        };
        debug!("Refreshing from page {}", key);
        self.load(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ClientError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// `total` numbered items; pages listed in `failing` return 500
    struct NumberSource {
        total: u32,
        failing: Vec<u32>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl NumberSource {
        fn new(total: u32) -> Self {
            Self {
                total,
                failing: Vec::new(),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn slow(total: u32, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(total)
            }
        }
    }

    #[async_trait]
    impl PageSource for NumberSource {
        type Item = u32;

        async fn load(&self, page: u32, page_size: u32) -> Result<Page<u32>, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.contains(&page) {
                return Err(LoadError {
                    page,
                    source: ClientError::Status {
                        status: 500,
                        body: String::new(),
                    },
                });
            }
            let start = (page - 1) * page_size;
            let end = (start + page_size).min(self.total);
            let data = (start..end.max(start)).collect();
            Ok(Page::new(data, page, page_size, self.total as u64))
        }
    }

    #[tokio::test]
    async fn loads_until_end() {
        let pager = Pager::new(NumberSource::new(25), 10);

        assert!(matches!(pager.load_next().await, LoadOutcome::Loaded(1)));
        assert!(matches!(pager.load_next().await, LoadOutcome::Loaded(2)));
        assert!(matches!(pager.load_next().await, LoadOutcome::Loaded(3)));
        assert!(matches!(pager.load_next().await, LoadOutcome::EndReached));

        assert_eq!(pager.items(), (0..25).collect::<Vec<_>>());
        assert!(matches!(
            pager.state(3),
            LoadState::Loaded { prev_key: Some(2), next_key: None }
        ));
    }

    #[tokio::test]
    async fn loaded_key_is_not_fetched_again() {
        let pager = Pager::new(NumberSource::new(25), 10);
        pager.load(1).await;
        assert!(matches!(pager.load(1).await, LoadOutcome::AlreadyLoaded(1)));
        assert_eq!(pager.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_recorded_and_retriable() {
        let mut source = NumberSource::new(25);
        source.failing.push(2);
        let pager = Pager::new(source, 10);

        pager.load(1).await;
        let outcome = pager.load(2).await;
        match outcome {
            LoadOutcome::Failed(e) => assert_eq!(e.source.status(), Some(500)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(pager.state(2), LoadState::Errored(_)));

        // a consumer-driven retry goes back to the source
        assert!(matches!(pager.load(2).await, LoadOutcome::Failed(_)));
        assert_eq!(pager.source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn refresh_reloads_anchor_page() {
        let pager = Pager::new(NumberSource::new(25), 10);
        pager.load_next().await;
        pager.load_next().await;
        pager.set_anchor(14);

        assert!(matches!(pager.refresh().await, LoadOutcome::Loaded(2)));
        assert_eq!(pager.pages().len(), 1);
        assert!(matches!(pager.state(1), LoadState::Idle));

        assert!(matches!(pager.load_previous().await, LoadOutcome::Loaded(1)));
        assert!(matches!(pager.load_previous().await, LoadOutcome::EndReached));
    }

    #[tokio::test]
    async fn refresh_without_anchor_starts_over() {
        let pager = Pager::new(NumberSource::new(25), 10);
        pager.load_next().await;
        assert!(matches!(pager.refresh().await, LoadOutcome::Loaded(1)));
    }

    #[tokio::test]
    async fn empty_backend_ends_immediately() {
        let pager = Pager::new(NumberSource::new(0), 10);
        assert!(matches!(pager.load_next().await, LoadOutcome::Loaded(1)));
        assert!(pager.items().is_empty());
        assert!(matches!(pager.load_next().await, LoadOutcome::EndReached));
    }

    #[tokio::test]
    async fn cancelled_load_releases_key() {
        let pager = Arc::new(Pager::new(NumberSource::slow(25, Duration::from_millis(100)), 10));
        let task = tokio::spawn({
            let pager = pager.clone();
            async move { pager.load(1).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(matches!(pager.state(1), LoadState::Loading));

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(matches!(pager.state(1), LoadState::Idle));

        assert!(matches!(pager.load(1).await, LoadOutcome::Loaded(1)));
        assert_eq!(pager.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_caller_waits_for_in_flight_page() {
        let pager = Arc::new(Pager::new(NumberSource::slow(25, Duration::from_millis(50)), 10));
        let first = tokio::spawn({
            let pager = pager.clone();
            async move { pager.load_next().await }
        });
        tokio::task::yield_now().await;
        assert!(matches!(pager.state(1), LoadState::Loading));

        let second = tokio::time::timeout(Duration::from_secs(2), pager.load_next())
            .await
            .expect("waiting caller must not spin");
        assert!(matches!(second, LoadOutcome::AlreadyLoaded(1)));
        assert!(matches!(first.await.unwrap(), LoadOutcome::Loaded(1)));
        assert_eq!(pager.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drain_alongside_background_load_finishes() {
        let pager = Arc::new(Pager::new(NumberSource::slow(25, Duration::from_millis(20)), 10));
        let background = tokio::spawn({
            let pager = pager.clone();
            async move { pager.load_next().await }
        });
        tokio::task::yield_now().await;

        let drain = async {
            while !matches!(pager.load_next().await, LoadOutcome::EndReached) {}
        };
        tokio::time::timeout(Duration::from_secs(2), drain)
            .await
            .expect("drain must finish");
        background.await.unwrap();
        assert_eq!(pager.items(), (0..25).collect::<Vec<_>>());
        assert_eq!(pager.source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn waiter_takes_over_after_cancel() {
        let pager = Arc::new(Pager::new(NumberSource::slow(25, Duration::from_millis(100)), 10));
        let first = tokio::spawn({
            let pager = pager.clone();
            async move { pager.load(1).await }
        });
        tokio::task::yield_now().await;
        let second = tokio::spawn({
            let pager = pager.clone();
            async move { pager.load(1).await }
        });
        tokio::task::yield_now().await;

        first.abort();
        assert!(matches!(second.await.unwrap(), LoadOutcome::Loaded(1)));
        assert_eq!(pager.source.calls.load(Ordering::SeqCst), 2);
    }
}
