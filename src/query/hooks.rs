//! One query constructor per read endpoint.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use underdog_sdk::{client::types::NftParams, query::Queries};
//!
//! # async fn example() -> underdog_sdk::Result<()> {
//! let queries = Queries::new(Arc::new(underdog_sdk::devnet("my-api-key")?));
//!
//! // both calls share one cache entry
//! let nft = queries.nft(NftParams::new(1, 5)).fetch().await;
//! let again = queries.nft(NftParams::new(1, 5)).fetch().await;
//! assert_eq!(nft.data, again.data);
//! # Ok(())
//! # }
//! ```

use std::{future::Future, sync::Arc, time::Duration};

use serde::Serialize;

use super::{Phase, PollPolicy, Query, QueryCache, QueryKey};
use crate::{
    Client, Result,
    client::types::{
        ApiKey, ApiRequest, ClaimLink, Collection, Domain, DomainParams, Member, MintAddressParams,
        Nft, NftParams, Org, OrgParams, PageQuery, Paginated, Project, ProjectParams, ProjectStats,
        ProjectType, RequestParams, SearchQuery, Snapshot, SnapshotParams, Transaction,
        TransactionParams, Tree, Wallet, Webhook, WebhookParams,
    },
};

/// Poll interval of [`Queries::project`] while the project is being created.
pub const PROJECT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Poll interval of [`Queries::snapshot`] until its export is ready.
pub const SNAPSHOT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Request part of a [`QueryKey`].
#[derive(Debug, Clone, Serialize)]
struct Request<P, Q = ()> {
    params: P,
    query: Q,
}

/// Builds [`Query`] values bound to one client and one cache.
#[derive(Debug, Clone)]
pub struct Queries {
    client: Arc<Client>,
    cache: QueryCache,
}

impl Queries {
    pub fn new(client: Arc<Client>) -> Self {
        Self::with_cache(client, QueryCache::new())
    }

    /// Shares `cache` with other [`Queries`], e.g. one per network.
    pub fn with_cache(client: Arc<Client>, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Drops every cached result of `resource`, e.g. `"nfts"` after a mint.
    pub async fn invalidate(&self, resource: &str) {
        self.cache.invalidate_resource(resource).await;
    }

    fn query<R, T, F, Fut>(&self, resource: &'static str, request: R, fetch: F) -> Query<T>
    where
        R: Serialize + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
        F: Fn(Arc<Client>, R) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let key = QueryKey::new(resource, &request, self.client.network());
        let client = self.client.clone();
        Query::new(key, self.cache.clone(), move || {
            fetch(client.clone(), request.clone())
        })
    }

    // nfts

    pub fn nft(&self, params: NftParams) -> Query<Nft> {
        let request = Request { params, query: () };
        self.query("nft", request, |client, request| async move {
            client.get_nft(&request.params).await
        })
    }

    pub fn nfts(&self, params: ProjectParams, query: PageQuery) -> Query<Paginated<Nft>> {
        self.query("nfts", Request { params, query }, |client, request| async move {
            client.get_nfts(&request.params, &request.query).await
        })
    }

    pub fn nft_by_mint_address(&self, params: MintAddressParams) -> Query<Nft> {
        let request = Request { params, query: () };
        self.query("nftByMintAddress", request, |client, request| async move {
            client.get_nft_by_mint_address(&request.params).await
        })
    }

    pub fn nft_claim_link(&self, params: NftParams) -> Query<ClaimLink> {
        let request = Request { params, query: () };
        self.query("nftClaimLink", request, |client, request| async move {
            client.get_nft_claim_link(&request.params).await
        })
    }

    pub fn search_nfts(&self, params: ProjectParams, query: SearchQuery) -> Query<Paginated<Nft>> {
        self.query("searchNfts", Request { params, query }, |client, request| async move {
            client.search_nfts(&request.params, &request.query).await
        })
    }

    // projects

    /// Watching this query polls every [`PROJECT_POLL_INTERVAL`] while the
    /// project is `processing` or `pending`.
    pub fn project(&self, params: ProjectParams, query: PageQuery) -> Query<Project> {
        let request = Request { params, query };
        self.query("project", request, |client, request| async move {
            client.get_project(&request.params, &request.query).await
        })
        .with_poll(PollPolicy::new(PROJECT_POLL_INTERVAL, |project: &Project| {
            if project.is_processing() {
                Phase::Pending
            } else {
                Phase::Terminal
            }
        }))
    }

    pub fn projects(
        &self,
        project_type: Option<ProjectType>,
        query: PageQuery,
    ) -> Query<Paginated<Project>> {
        let request = Request {
            params: project_type,
            query,
        };
        self.query("projects", request, |client, request| async move {
            client.get_projects(request.params, &request.query).await
        })
    }

    pub fn all_projects(&self, query: PageQuery) -> Query<Paginated<Project>> {
        let request = Request { params: (), query };
        self.query("allProjects", request, |client, request| async move {
            client.get_all_projects(&request.query).await
        })
    }

    pub fn project_stats(&self, params: ProjectParams) -> Query<ProjectStats> {
        let request = Request { params, query: () };
        self.query("projectStats", request, |client, request| async move {
            client.get_project_stats(&request.params).await
        })
    }

    // collections

    pub fn collection(&self, params: MintAddressParams) -> Query<Collection> {
        let request = Request { params, query: () };
        self.query("collection", request, |client, request| async move {
            client.get_collection(&request.params).await
        })
    }

    pub fn collection_nfts(
        &self,
        params: MintAddressParams,
        query: PageQuery,
    ) -> Query<Paginated<Nft>> {
        self.query("collectionNfts", Request { params, query }, |client, request| async move {
            client.get_collection_nfts(&request.params, &request.query).await
        })
    }

    // transactions and requests

    /// Disabled until a transaction id is known: with `None` the query never
    /// calls the API and its state stays idle.
    pub fn transaction(&self, transaction_id: Option<String>) -> Query<Transaction> {
        let enabled = transaction_id.is_some();
        let request = Request {
            params: transaction_id,
            query: (),
        };
        self.query("transaction", request, |client, request| async move {
            let params = TransactionParams {
                transaction_id: request.params.unwrap_or_default(),
            };
            client.get_transaction(&params).await
        })
        .enabled(enabled)
    }

    /// Like [`transaction`](Self::transaction), but watching it refetches
    /// every `interval` while the transaction is `pending` or `processing`.
    pub fn transaction_with_poll(
        &self,
        transaction_id: Option<String>,
        interval: Duration,
    ) -> Query<Transaction> {
        self.transaction(transaction_id)
            .with_poll(PollPolicy::new(interval, |transaction: &Transaction| {
                if transaction.is_pending() {
                    Phase::Pending
                } else {
                    Phase::Terminal
                }
            }))
    }

    pub fn transactions(&self, query: PageQuery) -> Query<Paginated<Transaction>> {
        let request = Request { params: (), query };
        self.query("transactions", request, |client, request| async move {
            client.get_transactions(&request.query).await
        })
    }

    pub fn request(&self, params: RequestParams) -> Query<ApiRequest> {
        let request = Request { params, query: () };
        self.query("request", request, |client, request| async move {
            client.get_request(&request.params).await
        })
    }

    pub fn requests(&self, query: PageQuery) -> Query<Paginated<ApiRequest>> {
        let request = Request { params: (), query };
        self.query("requests", request, |client, request| async move {
            client.get_requests(&request.query).await
        })
    }

    // organizations

    pub fn orgs(&self, query: PageQuery) -> Query<Paginated<Org>> {
        let request = Request { params: (), query };
        self.query("orgs", request, |client, request| async move {
            client.get_orgs(&request.query).await
        })
    }

    pub fn org(&self, params: OrgParams) -> Query<Org> {
        let request = Request { params, query: () };
        self.query("org", request, |client, request| async move {
            client.get_org(&request.params).await
        })
    }

    pub fn members(&self, params: OrgParams, query: PageQuery) -> Query<Paginated<Member>> {
        self.query("members", Request { params, query }, |client, request| async move {
            client.get_members(&request.params, &request.query).await
        })
    }

    pub fn keys(&self, params: OrgParams, query: PageQuery) -> Query<Paginated<ApiKey>> {
        self.query("keys", Request { params, query }, |client, request| async move {
            client.get_keys(&request.params, &request.query).await
        })
    }

    // webhooks

    pub fn webhooks(&self, query: PageQuery) -> Query<Paginated<Webhook>> {
        let request = Request { params: (), query };
        self.query("webhooks", request, |client, request| async move {
            client.get_webhooks(&request.query).await
        })
    }

    pub fn webhook(&self, params: WebhookParams) -> Query<Webhook> {
        let request = Request { params, query: () };
        self.query("webhook", request, |client, request| async move {
            client.get_webhook(&request.params).await
        })
    }

    // wallet, domains, snapshots, trees

    pub fn me(&self) -> Query<Wallet> {
        self.query("me", (), |client, ()| async move { client.get_me().await })
    }

    pub fn domains(&self, query: PageQuery) -> Query<Paginated<Domain>> {
        let request = Request { params: (), query };
        self.query("domains", request, |client, request| async move {
            client.get_domains(&request.query).await
        })
    }

    pub fn domain(&self, params: DomainParams) -> Query<Domain> {
        let request = Request { params, query: () };
        self.query("domain", request, |client, request| async move {
            client.get_domain(&request.params).await
        })
    }

    pub fn snapshots(&self, query: PageQuery) -> Query<Paginated<Snapshot>> {
        let request = Request { params: (), query };
        self.query("snapshots", request, |client, request| async move {
            client.get_snapshots(&request.query).await
        })
    }

    /// Watching this query polls every [`SNAPSHOT_POLL_INTERVAL`] until the
    /// snapshot has a download `url`.
    pub fn snapshot(&self, params: SnapshotParams) -> Query<Snapshot> {
        let request = Request { params, query: () };
        self.query("snapshot", request, |client, request| async move {
            client.get_snapshot(&request.params).await
        })
        .with_poll(PollPolicy::new(SNAPSHOT_POLL_INTERVAL, |snapshot: &Snapshot| {
            if snapshot.is_ready() {
                Phase::Terminal
            } else {
                Phase::Pending
            }
        }))
    }

    pub fn trees(&self, query: PageQuery) -> Query<Paginated<Tree>> {
        let request = Request { params: (), query };
        self.query("trees", request, |client, request| async move {
            client.get_trees(&request.query).await
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::{
        ClientConfig, Network,
        client::transport::mock::{MockTransport, Reply},
    };

    fn queries(transport: &MockTransport, network: Network) -> Queries {
        let config = ClientConfig::default()
            .with_network(network)
            .with_api_key("X");
        let client = Client::with_transport(config, Arc::new(transport.clone())).unwrap();
        Queries::new(Arc::new(client))
    }

    fn project(status: &str) -> Reply {
        Reply::Json(StatusCode::OK, json!({ "id": 1, "status": status }))
    }

    #[tokio::test]
    async fn test_equal_requests_share_one_fetch() {
        let transport = MockTransport::json(json!({ "id": 5, "name": "Foo #5" }));
        let queries = queries(&transport, Network::Devnet);

        let first = queries.nft(NftParams::new("p1", 5)).fetch().await;
        let second = queries.nft(NftParams::new("p1", 5)).fetch().await;

        assert_eq!(first.data, second.data);
        assert_eq!(first.data.unwrap().name().map(String::as_str), Some("Foo #5"));
        assert_eq!(transport.calls(), 1);

        // a different nft is a different key
        queries.nft(NftParams::new("p1", 6)).fetch().await;
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_keys_include_network() {
        let transport = MockTransport::json(json!({ "results": [] }));
        let devnet = queries(&transport, Network::Devnet);
        let config = ClientConfig::default()
            .with_network(Network::Mainnet)
            .with_api_key("X");
        let mainnet_client = Client::with_transport(config, Arc::new(transport.clone())).unwrap();
        let mainnet = Queries::with_cache(Arc::new(mainnet_client), devnet.cache().clone());

        let devnet_query = devnet.webhooks(PageQuery::default());
        let mainnet_query = mainnet.webhooks(PageQuery::default());
        assert_ne!(devnet_query.key(), mainnet_query.key());

        devnet_query.fetch().await;
        mainnet_query.fetch().await;
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_resource_names() {
        let transport = MockTransport::json(json!({}));
        let queries = queries(&transport, Network::Devnet);

        assert_eq!(queries.all_projects(PageQuery::default()).key().resource, "allProjects");
        assert_eq!(queries.project_stats(ProjectParams::new(1)).key().resource, "projectStats");
        assert_eq!(
            queries.nft_claim_link(NftParams::new(1, 2)).key().resource,
            "nftClaimLink"
        );
        assert_eq!(
            queries
                .search_nfts(ProjectParams::new(1), SearchQuery::default())
                .key()
                .request,
            r#"{"params":{"projectId":"1"},"query":{"search":""}}"#
        );
        assert_eq!(queries.me().key().request, "null");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_transaction_without_id_is_disabled() {
        let transport = MockTransport::json(json!({ "id": "t1", "status": "confirmed" }));
        let queries = queries(&transport, Network::Devnet);

        let query = queries.transaction(None);
        assert!(!query.is_enabled());
        assert!(query.fetch().await.is_idle());

        let mut rx = query.watch();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_idle());
        assert_eq!(transport.calls(), 0);

        let state = queries.transaction(Some("t1".into())).fetch().await;
        assert_eq!(state.data.unwrap().status().map(String::as_str), Some("confirmed"));
        assert_eq!(transport.last().url.path(), "/v2/transactions/t1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_project_polls_while_processing() {
        let transport =
            MockTransport::new([project("processing"), project("pending"), project("confirmed")]);
        let queries = queries(&transport, Network::Devnet);

        let start = Instant::now();
        let mut rx = queries.project(ProjectParams::new(1), PageQuery::default()).watch();

        let mut statuses = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if let Some(project) = state.data {
                statuses.push(project.status().cloned().unwrap());
            }
        }

        assert_eq!(statuses, ["processing", "pending", "confirmed"]);
        assert_eq!(transport.calls(), 3);
        assert_eq!(start.elapsed(), PROJECT_POLL_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_project_stops_polling_on_error() {
        let transport = MockTransport::new([
            project("processing"),
            Reply::Json(StatusCode::NOT_FOUND, json!({ "message": "gone" })),
        ]);
        let queries = queries(&transport, Network::Devnet);

        let mut rx = queries.project(ProjectParams::new(1), PageQuery::default()).watch();
        let mut last = None;
        while rx.changed().await.is_ok() {
            last = Some(rx.borrow_and_update().clone());
        }

        let last = last.unwrap();
        assert_eq!(
            last.error.unwrap().status(),
            Some(StatusCode::NOT_FOUND)
        );
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_project_forwards_page_query() {
        let transport = MockTransport::new([project("confirmed")]);
        let queries = queries(&transport, Network::Devnet);

        queries.project(ProjectParams::new(1), PageQuery::new(2, 5)).fetch().await;
        assert_eq!(transport.last().url.query(), Some("page=2&limit=5"));

        // the page is part of the key
        queries.project(ProjectParams::new(1), PageQuery::new(3, 5)).fetch().await;
        queries.project(ProjectParams::new(1), PageQuery::new(2, 5)).fetch().await;
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transaction_polls_until_settled() {
        let tx = |status: &str| Reply::Json(StatusCode::OK, json!({ "id": 7, "status": status }));
        let transport = MockTransport::new([tx("pending"), tx("processing"), tx("confirmed")]);
        let queries = queries(&transport, Network::Devnet);
        let interval = Duration::from_millis(500);

        let start = Instant::now();
        let mut rx = queries
            .transaction_with_poll(Some("7".into()), interval)
            .watch();

        let mut statuses = Vec::new();
        while rx.changed().await.is_ok() {
            if let Some(tx) = rx.borrow_and_update().data.clone() {
                statuses.push(tx.status().cloned().unwrap());
            }
        }

        assert_eq!(statuses, ["pending", "processing", "confirmed"]);
        assert_eq!(transport.calls(), 3);
        assert_eq!(start.elapsed(), interval * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polled_transaction_without_id_stays_idle() {
        let transport = MockTransport::json(json!({ "id": 7, "status": "pending" }));
        let queries = queries(&transport, Network::Devnet);

        let mut rx = queries
            .transaction_with_poll(None, Duration::from_millis(500))
            .watch();
        while rx.changed().await.is_ok() {
            assert!(rx.borrow_and_update().is_idle());
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_polls_until_url() {
        let transport = MockTransport::new([
            Reply::Json(StatusCode::OK, json!({ "id": "s1", "status": "pending" })),
            Reply::Json(
                StatusCode::OK,
                json!({ "id": "s1", "status": "done", "url": "https://files/s1.csv" }),
            ),
        ]);
        let queries = queries(&transport, Network::Devnet);

        let start = Instant::now();
        let mut rx = queries
            .snapshot(SnapshotParams {
                snapshot_id: "s1".into(),
            })
            .watch();

        let mut ready = false;
        while rx.changed().await.is_ok() {
            ready = rx.borrow_and_update().data.as_ref().is_some_and(|s| s.is_ready());
        }

        assert!(ready);
        assert_eq!(transport.calls(), 2);
        assert_eq!(start.elapsed(), SNAPSHOT_POLL_INTERVAL);
    }

    #[tokio::test]
    async fn test_invalidate_after_write() {
        let transport = MockTransport::json(json!({ "results": [] }));
        let queries = queries(&transport, Network::Devnet);
        let nfts = queries.nfts(ProjectParams::new(1), PageQuery::new(1, 10));

        nfts.fetch().await;
        nfts.fetch().await;
        assert_eq!(transport.calls(), 1);

        queries.invalidate("nfts").await;
        nfts.fetch().await;
        assert_eq!(transport.calls(), 2);
        assert_eq!(transport.last().url.query(), Some("page=1&limit=10"));
    }
}
