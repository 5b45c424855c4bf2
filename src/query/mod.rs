//! Cached, keyed queries over the client's read endpoints.
//!
//! A [`Query`] pairs a [`QueryKey`] with a fetch function. Results live in a
//! shared [`QueryCache`] (a `moka` cache) so identical requests, made from
//! anywhere, hit the API once.
//!
//! # Keys
//!
//! A key is `[resource, request, network]`. The request part is the JSON
//! serialization of the request value, so two equal requests built separately
//! share an entry and the same request against mainnet and devnet does not.
//!
//! # Polling
//!
//! Some resources are created asynchronously. A [`PollPolicy`] classifies
//! fetched data as [`Phase::Pending`] or [`Phase::Terminal`];
//! [`Query::watch`] refetches on the policy's interval while pending.
//!
//! ```text
//!            fetch ok, pending          fetch ok, terminal
//! Loading ─────────────────────► Pending ───────────────────► Terminal (stop)
//!                                 ▲   │
//!                                 └───┘ sleep(interval), refetch
//!                 any error ─────────────────────────────────► Errored (stop)
//! ```

pub mod hooks;

use std::{any::Any, fmt, future::Future, sync::Arc, time::Duration};

use futures::{FutureExt, future::BoxFuture};
use serde::Serialize;
use tokio::{sync::watch, time::sleep};

pub use hooks::Queries;

use crate::{Error, Network, Result};

/// Identity of a cached result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Resource name, e.g. `"nft"` or `"projectStats"`.
    pub resource: &'static str,
    /// JSON serialization of the request.
    pub request: String,
    pub network: Network,
}

impl QueryKey {
    pub fn new<R: Serialize + ?Sized>(resource: &'static str, request: &R, network: Network) -> Self {
        // request types are plain data; serializing them cannot fail
        let request = serde_json::to_string(request).unwrap_or_default();
        Self {
            resource,
            request,
            network,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[\"{}\",{},\"{}\"]",
            self.resource, self.request, self.network
        )
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Store shared by every query built from the same [`Queries`].
///
/// Only successful results are cached; errors are handed back and the next
/// fetch calls the API again.
#[derive(Clone)]
pub struct QueryCache {
    entries: moka::future::Cache<QueryKey, Entry>,
}

impl QueryCache {
    /// Default lifetime of a cached result.
    pub const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_secs(5 * 60);

    const MAX_ENTRIES: u64 = 10_000;

    pub fn new() -> Self {
        Self::with_time_to_live(Self::DEFAULT_TIME_TO_LIVE)
    }

    /// Cache whose entries expire `time_to_live` after insertion.
    pub fn with_time_to_live(time_to_live: Duration) -> Self {
        let entries = moka::future::Cache::builder()
            .max_capacity(Self::MAX_ENTRIES)
            .time_to_live(time_to_live)
            .build();
        Self { entries }
    }

    /// Cached value for `key`, if present and of type `T`.
    pub async fn get<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.entries.get(key).await?.downcast().ok()
    }

    pub async fn invalidate(&self, key: &QueryKey) {
        self.entries.invalidate(key).await;
    }

    /// Drops every entry of one resource, e.g. `"nfts"` after a mint.
    pub async fn invalidate_resource(&self, resource: &str) {
        let keys: Vec<_> = self
            .entries
            .iter()
            .filter(|(key, _)| key.resource == resource)
            .map(|(key, _)| key)
            .collect();
        for key in keys {
            self.entries.invalidate(&*key).await;
        }
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

/// Snapshot of a query: the data, whether a fetch is in flight, and the error
/// of the last fetch.
#[derive(Debug)]
pub struct QueryState<T> {
    pub data: Option<Arc<T>>,
    pub loading: bool,
    pub error: Option<Arc<Error>>,
}

impl<T> QueryState<T> {
    fn loading() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    /// State of a disabled query: nothing fetched, nothing pending.
    fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    fn settled(result: Result<Arc<T>, Arc<Error>>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                loading: false,
                error: None,
            },
            Err(error) => Self {
                data: None,
                loading: false,
                error: Some(error),
            },
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

/// Whether fetched data may still change on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    Pending,
    Terminal,
}

/// Refetch `interval` while `phase` classifies the data as pending.
pub struct PollPolicy<T> {
    pub interval: Duration,
    pub phase: fn(&T) -> Phase,
}

impl<T> PollPolicy<T> {
    pub const fn new(interval: Duration, phase: fn(&T) -> Phase) -> Self {
        Self { interval, phase }
    }

    /// Interval to wait before the next fetch, or `None` once polling is over.
    fn next_tick(&self, state: &QueryState<T>) -> Option<Duration> {
        if state.error.is_some() {
            return None;
        }
        let data = state.data.as_deref()?;
        (self.phase)(data).is_pending().then_some(self.interval)
    }
}

impl<T> Clone for PollPolicy<T> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            phase: self.phase,
        }
    }
}

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// One cached read.
///
/// Fetching never retries: a failed fetch settles with the error.
pub struct Query<T> {
    key: QueryKey,
    cache: QueryCache,
    fetch: Fetcher<T>,
    poll: Option<PollPolicy<T>>,
    enabled: bool,
}

impl<T: Send + Sync + 'static> Query<T> {
    pub fn new<F, Fut>(key: QueryKey, cache: QueryCache, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            key,
            cache,
            fetch: Arc::new(move || fetch().boxed()),
            poll: None,
            enabled: true,
        }
    }

    /// Polls while the data is pending; see [`Query::watch`].
    pub fn with_poll(self, poll: PollPolicy<T>) -> Self {
        Self {
            poll: Some(poll),
            ..self
        }
    }

    /// A disabled query never calls its fetch function.
    pub fn enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cached result, fetching it on a miss.
    pub async fn fetch(&self) -> QueryState<T> {
        if !self.enabled {
            return QueryState::idle();
        }
        QueryState::settled(self.load().await)
    }

    /// Drops the cached result and fetches again.
    pub async fn refetch(&self) -> QueryState<T> {
        if !self.enabled {
            return QueryState::idle();
        }
        self.cache.invalidate(&self.key).await;
        self.fetch().await
    }

    async fn load(&self) -> Result<Arc<T>, Arc<Error>> {
        let fetch = self.fetch.clone();
        let key = &self.key;
        let entry = self
            .cache
            .entries
            .try_get_with(key.clone(), async move {
                log::debug!("fetching {key}");
                let data = fetch().await?;
                Ok::<_, Error>(Arc::new(data) as Entry)
            })
            .await?;

        entry.downcast().map_err(|_| {
            Arc::new(Error::CacheType {
                resource: key.resource,
            })
        })
    }

    /// Runs the query in the background and streams its states.
    ///
    /// The receiver starts at a loading state and sees every settled fetch.
    /// With a poll policy the query refetches while the data is pending. The
    /// task ends after a terminal result, an error, or once every receiver is
    /// dropped.
    pub fn watch(self) -> watch::Receiver<QueryState<T>> {
        let (tx, rx) = watch::channel(QueryState::loading());

        tokio::spawn(async move {
            let mut state = self.fetch().await;
            loop {
                let next = self.poll.as_ref().and_then(|poll| poll.next_tick(&state));
                if tx.send(state).is_err() {
                    return;
                }
                let Some(interval) = next else {
                    return;
                };

                sleep(interval).await;
                log::debug!("polling {}", self.key);
                state = self.refetch().await;
            }
        });

        rx
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("enabled", &self.enabled)
            .field("poll", &self.poll.as_ref().map(|poll| poll.interval))
            .finish()
    }
}
