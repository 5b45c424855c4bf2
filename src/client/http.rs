//! HTTP client for the Underdog API.
//!
//! Every method maps to exactly one request and returns the decoded body as
//! the API sent it. Nothing is retried, cached or validated locally.
//!
//! # Examples
//!
//! ## Create a Project and Mint Into It
//!
//! ```no_run
//! use underdog_sdk::client::types::{NftInput, ProjectInput, ProjectParams};
//!
//! # async fn example() -> underdog_sdk::Result<()> {
//! let client = underdog_sdk::devnet("my-api-key")?;
//!
//! let created = client
//!     .create_project(&ProjectInput {
//!         name: Some("Foo".into()),
//!         image: Some("https://example.com/foo.png".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let project = ProjectParams::new(created.project_id().expect("project id"));
//! let minted = client
//!     .create_nft(&project, &NftInput {
//!         name: Some("Foo #1".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("transaction {:?}", minted.transaction_id());
//! # Ok(())
//! # }
//! ```
//!
//! ## Page Through NFTs
//!
//! ```no_run
//! use underdog_sdk::client::types::{PageQuery, ProjectParams};
//!
//! # async fn example() -> underdog_sdk::Result<()> {
//! let client = underdog_sdk::devnet("my-api-key")?;
//! let project = ProjectParams::new(1);
//!
//! let page = client.get_nfts(&project, &PageQuery::new(1, 50)).await?;
//! for nft in page.results {
//!     println!("{:?}: {:?}", nft.id(), nft.name());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::{
    Method,
    header::{AUTHORIZATION, HeaderMap},
};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use super::{
    ClientConfig, Network, PathGrammar, Paths, authorization_header,
    transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport},
    types::{
        ApiKey, ApiRequest, ClaimLink, Collection, Domain, DomainParams, KeyParams, Member,
        MemberParams, MintAddressParams, Mutation, Nft, NftParams, Org, OrgParams, PageQuery,
        Paginated, Project, ProjectParams, ProjectStats, ProjectType, RequestParams, SearchQuery,
        Snapshot, SnapshotParams, Transaction, TransactionParams, Tree, UploadedFile, Wallet,
        Webhook, WebhookParams,
    },
    utils::{join_url, query_pairs},
};
use crate::{Error, Result};

/// Underdog API client bound to one resolved configuration.
///
/// The base URL and headers are fixed at construction; the client is cheap to
/// share behind an [`Arc`].
///
/// # Example
///
/// ```
/// use underdog_sdk::client::{Client, ClientConfig};
///
/// // Proxy mode: no key, requests go to /api/underdog
/// let client = Client::new(ClientConfig::default()).unwrap();
/// assert_eq!(client.base_url(), "/api/underdog");
/// ```
pub struct Client {
    transport: Arc<dyn Transport>,
    base_url: String,
    endpoint: Url,
    headers: HeaderMap,
    network: Network,
    paths: Paths,
}

impl Client {
    /// Creates a client that sends requests with `reqwest`.
    ///
    /// Fails if the base URL does not parse or the API key is not a valid
    /// header value.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()?))
    }

    /// Creates a client on top of a custom [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = config.api_key.as_deref() {
            headers.insert(AUTHORIZATION, authorization_header(api_key, config.bearer)?);
        }

        Ok(Self {
            transport,
            base_url: config.resolved_base_url(),
            endpoint: config.endpoint()?,
            headers,
            network: config.resolved_network(),
            paths: Paths::new(config.version, config.grammar),
        })
    }

    /// Base URL as resolved from the configuration, possibly relative.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL every request path is appended to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Whether requests carry an `Authorization` header (server mode).
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    #[must_use]
    pub const fn paths(&self) -> &Paths {
        &self.paths
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        pairs: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        let url = join_url(&self.endpoint, path, pairs)?;
        log::debug!("{method} {url}");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers: self.headers.clone(),
                body,
            })
            .await?;

        if !response.status.is_success() {
            return Err(Error::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(response)
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .send(Method::GET, path, &query_pairs(query)?, None)
            .await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Sends a write. A 2xx answer without a body decodes to `T::default()`.
    async fn write<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_vec).transpose()?;
        let response = self.send(method, path, &[], body).await?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        self.write(Method::POST, path, Some(body)).await
    }

    /// POST without a body, for action endpoints like burn and claim.
    async fn post_empty<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        self.write::<T, ()>(Method::POST, path, None).await
    }

    /// POST whose response carries nothing of interest.
    async fn post_void<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(Method::POST, path, &[], Some(serde_json::to_vec(body)?))
            .await?;
        Ok(())
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        self.write(Method::PUT, path, Some(body)).await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        self.write(Method::PATCH, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    // Projects

    /// Creates a project.
    ///
    /// `POST /v2/projects`
    pub async fn create_project<B: Serialize + ?Sized>(&self, body: &B) -> Result<Mutation> {
        self.post(&self.paths.projects(), body).await
    }

    /// Lists projects, filtered by type when the client speaks the type-coded
    /// grammar.
    ///
    /// `GET /v2/projects` or `GET /v2/projects/{code}`
    pub async fn get_projects(
        &self,
        project_type: Option<ProjectType>,
        query: &PageQuery,
    ) -> Result<Paginated<Project>> {
        self.get(&self.paths.projects_of_type(project_type), query)
            .await
    }

    /// Lists every project of the organization.
    ///
    /// `GET /v2/projects`
    pub async fn get_all_projects(&self, query: &PageQuery) -> Result<Paginated<Project>> {
        self.get(&self.paths.projects(), query).await
    }

    /// Fetches a project. `status` reports whether it is still being created.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use underdog_sdk::client::types::{PageQuery, ProjectParams};
    ///
    /// # async fn example() -> underdog_sdk::Result<()> {
    /// let client = underdog_sdk::devnet("my-api-key")?;
    /// let project = client
    ///     .get_project(&ProjectParams::new(1), &PageQuery::default())
    ///     .await?;
    /// println!("{:?}: {:?}", project.name(), project.status());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_project(&self, params: &ProjectParams, query: &PageQuery) -> Result<Project> {
        self.get(&self.paths.project(params), query).await
    }

    /// Replaces a project's metadata.
    pub async fn update_project<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<Mutation> {
        self.put(&self.paths.project(params), body).await
    }

    /// Updates only the given project fields.
    pub async fn partial_update_project<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<Mutation> {
        self.patch(&self.paths.project(params), body).await
    }

    /// Renames a project.
    ///
    /// `PUT {project}/name`
    pub async fn update_project_name<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<Mutation> {
        self.put(&format!("{}/name", self.paths.project(params)), body)
            .await
    }

    /// `PUT {project}/symbol`
    pub async fn update_project_symbol<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<Mutation> {
        self.put(&format!("{}/symbol", self.paths.project(params)), body)
            .await
    }

    /// `GET {project}/stats`
    pub async fn get_project_stats(&self, params: &ProjectParams) -> Result<ProjectStats> {
        self.get(&format!("{}/stats", self.paths.project(params)), &())
            .await
    }

    // NFTs

    /// Mints an NFT into a project.
    ///
    /// `POST {project}/nfts`
    pub async fn create_nft<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<Mutation> {
        self.post(&self.paths.nfts(params), body).await
    }

    /// Queues many mints at once. The API acknowledges without a useful body.
    pub async fn batch_nft<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<()> {
        self.post_void(&format!("{}/batch", self.paths.nfts(params)), body)
            .await
    }

    pub async fn get_nfts(&self, params: &ProjectParams, query: &PageQuery) -> Result<Paginated<Nft>> {
        self.get(&self.paths.nfts(params), query).await
    }

    /// Searches the NFTs of a project.
    ///
    /// `GET {project}/nfts/search`
    pub async fn search_nfts(
        &self,
        params: &ProjectParams,
        query: &SearchQuery,
    ) -> Result<Paginated<Nft>> {
        self.get(&format!("{}/search", self.paths.nfts(params)), query)
            .await
    }

    /// `GET {project}/nfts/{nftId}`
    pub async fn get_nft(&self, params: &NftParams) -> Result<Nft> {
        self.get(&self.paths.nft(params), &()).await
    }

    pub async fn update_nft<B: Serialize + ?Sized>(&self, params: &NftParams, body: &B) -> Result<Mutation> {
        self.put(&self.paths.nft(params), body).await
    }

    pub async fn partial_update_nft<B: Serialize + ?Sized>(
        &self,
        params: &NftParams,
        body: &B,
    ) -> Result<Mutation> {
        self.patch(&self.paths.nft(params), body).await
    }

    /// Burns an NFT of a non-transferable project.
    ///
    /// `POST {nft}/burn`. Under [`PathGrammar::TypeCoded`] the path always
    /// carries the non-transferable code, whatever type `params` holds.
    pub async fn burn_nft(&self, params: &NftParams) -> Result<Mutation> {
        self.post_empty(&format!("{}/burn", self.paths.non_transferable_nft(params)))
            .await
    }

    /// Revokes an NFT of a non-transferable project. Same path rule as
    /// [`Client::burn_nft`].
    pub async fn revoke_nft(&self, params: &NftParams) -> Result<Mutation> {
        self.post_empty(&format!("{}/revoke", self.paths.non_transferable_nft(params)))
            .await
    }

    /// Returns the claim link of an NFT. Same path rule as [`Client::burn_nft`].
    pub async fn get_nft_claim_link(&self, params: &NftParams) -> Result<ClaimLink> {
        self.get(
            &format!("{}/claim", self.paths.non_transferable_nft(params)),
            &(),
        )
        .await
    }

    /// `GET /v2/nfts/{mintAddress}`
    pub async fn get_nft_by_mint_address(&self, params: &MintAddressParams) -> Result<Nft> {
        self.get(&self.paths.nft_by_mint(params), &()).await
    }

    pub async fn get_nft_claim_link_by_mint_address(
        &self,
        params: &MintAddressParams,
    ) -> Result<ClaimLink> {
        self.get(&format!("{}/claim", self.paths.nft_by_mint(params)), &())
            .await
    }

    /// Claims an NFT by mint address for the wallet in `body`.
    pub async fn claim_nft_by_mint_address<B: Serialize + ?Sized>(
        &self,
        params: &MintAddressParams,
        body: &B,
    ) -> Result<Mutation> {
        self.post(&format!("{}/claim", self.paths.nft_by_mint(params)), body)
            .await
    }

    /// Builds a payment transaction for an NFT.
    pub async fn pay_nft_by_mint_address<B: Serialize + ?Sized>(
        &self,
        params: &MintAddressParams,
        body: &B,
    ) -> Result<Mutation> {
        self.post(&format!("{}/pay", self.paths.nft_by_mint(params)), body)
            .await
    }

    // SFTs

    /// `POST {project}/sfts`
    pub async fn create_sft<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<Mutation> {
        self.post(&self.paths.sfts(params), body).await
    }

    pub async fn batch_sft<B: Serialize + ?Sized>(
        &self,
        params: &ProjectParams,
        body: &B,
    ) -> Result<()> {
        self.post_void(&format!("{}/batch", self.paths.sfts(params)), body)
            .await
    }

    // Collections

    pub async fn get_collections(&self, query: &PageQuery) -> Result<Paginated<Collection>> {
        self.get(&self.paths.collections(), query).await
    }

    /// `GET /v2/collections/{mintAddress}`
    pub async fn get_collection(&self, params: &MintAddressParams) -> Result<Collection> {
        self.get(&self.paths.collection(params), &()).await
    }

    pub async fn get_collection_nfts(
        &self,
        params: &MintAddressParams,
        query: &PageQuery,
    ) -> Result<Paginated<Nft>> {
        self.get(&format!("{}/nfts", self.paths.collection(params)), query)
            .await
    }

    pub async fn claim_collection_nft<B: Serialize + ?Sized>(
        &self,
        params: &MintAddressParams,
        body: &B,
    ) -> Result<Mutation> {
        self.post(&format!("{}/claim", self.paths.collection(params)), body)
            .await
    }

    pub async fn pay_collection_nft<B: Serialize + ?Sized>(
        &self,
        params: &MintAddressParams,
        body: &B,
    ) -> Result<Mutation> {
        self.post(&format!("{}/pay", self.paths.collection(params)), body)
            .await
    }

    // Transactions and requests

    pub async fn get_transactions(&self, query: &PageQuery) -> Result<Paginated<Transaction>> {
        self.get(&self.paths.transactions(), query).await
    }

    /// `GET /v2/transactions/{transactionId}`
    pub async fn get_transaction(&self, params: &TransactionParams) -> Result<Transaction> {
        self.get(&self.paths.transaction(params), &()).await
    }

    pub async fn get_requests(&self, query: &PageQuery) -> Result<Paginated<ApiRequest>> {
        self.get(&self.paths.requests(), query).await
    }

    pub async fn get_request(&self, params: &RequestParams) -> Result<ApiRequest> {
        self.get(&self.paths.request(params), &()).await
    }

    // Organizations

    pub async fn get_orgs(&self, query: &PageQuery) -> Result<Paginated<Org>> {
        self.get(&self.paths.orgs(), query).await
    }

    pub async fn get_org(&self, params: &OrgParams) -> Result<Org> {
        self.get(&self.paths.org(params), &()).await
    }

    pub async fn update_org<B: Serialize + ?Sized>(&self, params: &OrgParams, body: &B) -> Result<Org> {
        self.put(&self.paths.org(params), body).await
    }

    pub async fn get_members(&self, params: &OrgParams, query: &PageQuery) -> Result<Paginated<Member>> {
        self.get(&self.paths.members(params), query).await
    }

    /// Adds a member to an organization.
    pub async fn create_member<B: Serialize + ?Sized>(
        &self,
        params: &OrgParams,
        body: &B,
    ) -> Result<Member> {
        self.post(&self.paths.members(params), body).await
    }

    pub async fn get_member(&self, params: &MemberParams) -> Result<Member> {
        self.get(&self.paths.member(params), &()).await
    }

    pub async fn update_member<B: Serialize + ?Sized>(
        &self,
        params: &MemberParams,
        body: &B,
    ) -> Result<Member> {
        self.put(&self.paths.member(params), body).await
    }

    /// `DELETE /v2/orgs/{orgId}/members/{walletAddress}`
    pub async fn delete_member(&self, params: &MemberParams) -> Result<()> {
        self.delete(&self.paths.member(params)).await
    }

    // API keys

    pub async fn get_keys(&self, params: &OrgParams, query: &PageQuery) -> Result<Paginated<ApiKey>> {
        self.get(&self.paths.keys(params), query).await
    }

    /// Creates an API key. The secret is only ever returned by this call.
    pub async fn create_key<B: Serialize + ?Sized>(&self, params: &OrgParams, body: &B) -> Result<ApiKey> {
        self.post(&self.paths.keys(params), body).await
    }

    pub async fn update_key<B: Serialize + ?Sized>(&self, params: &KeyParams, body: &B) -> Result<ApiKey> {
        self.put(&self.paths.key(params), body).await
    }

    pub async fn delete_key(&self, params: &KeyParams) -> Result<()> {
        self.delete(&self.paths.key(params)).await
    }

    // Webhooks

    pub async fn create_webhook<B: Serialize + ?Sized>(&self, body: &B) -> Result<Webhook> {
        self.post(&self.paths.webhooks(), body).await
    }

    pub async fn get_webhooks(&self, query: &PageQuery) -> Result<Paginated<Webhook>> {
        self.get(&self.paths.webhooks(), query).await
    }

    pub async fn get_webhook(&self, params: &WebhookParams) -> Result<Webhook> {
        self.get(&self.paths.webhook(params), &()).await
    }

    pub async fn delete_webhook(&self, params: &WebhookParams) -> Result<()> {
        self.delete(&self.paths.webhook(params)).await
    }

    // Wallets

    /// Wallet of the authenticated key, `GET /v2/wallets/me`.
    pub async fn get_me(&self) -> Result<Wallet> {
        self.get(&self.paths.me(), &()).await
    }

    // Domains

    pub async fn get_domains(&self, query: &PageQuery) -> Result<Paginated<Domain>> {
        self.get(&self.paths.domains(), query).await
    }

    pub async fn create_domain<B: Serialize + ?Sized>(&self, body: &B) -> Result<Domain> {
        self.post(&self.paths.domains(), body).await
    }

    pub async fn get_domain(&self, params: &DomainParams) -> Result<Domain> {
        self.get(&self.paths.domain(params), &()).await
    }

    pub async fn update_domain<B: Serialize + ?Sized>(
        &self,
        params: &DomainParams,
        body: &B,
    ) -> Result<Domain> {
        self.put(&self.paths.domain(params), body).await
    }

    // Snapshots

    pub async fn get_snapshots(&self, query: &PageQuery) -> Result<Paginated<Snapshot>> {
        self.get(&self.paths.snapshots(), query).await
    }

    /// Starts a holder snapshot. Poll [`Client::get_snapshot`] until `url` is set.
    pub async fn create_snapshot<B: Serialize + ?Sized>(&self, body: &B) -> Result<Snapshot> {
        self.post(&self.paths.snapshots(), body).await
    }

    pub async fn get_snapshot(&self, params: &SnapshotParams) -> Result<Snapshot> {
        self.get(&self.paths.snapshot(params), &()).await
    }

    // Files and trees

    /// Requests an upload slot, `POST /v2/files`.
    pub async fn upload_file<B: Serialize + ?Sized>(&self, body: &B) -> Result<UploadedFile> {
        self.post(&self.paths.files(), body).await
    }

    pub async fn get_trees(&self, query: &PageQuery) -> Result<Paginated<Tree>> {
        self.get(&self.paths.trees(), query).await
    }

    pub async fn create_tree<B: Serialize + ?Sized>(&self, body: &B) -> Result<Tree> {
        self.post(&self.paths.trees(), body).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("network", &self.network)
            .field("grammar", &self.paths.grammar())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{StatusCode, header::CONTENT_TYPE};
    use serde_json::{Value, json};

    use super::*;
    use crate::client::{
        DEVNET_API_URL, MAINNET_API_URL,
        transport::mock::{MockTransport, Reply},
        types::{Id, NftInput, ProjectInput, WebhookInput},
    };

    fn client(config: ClientConfig, transport: &MockTransport) -> Client {
        Client::with_transport(config, Arc::new(transport.clone())).unwrap()
    }

    fn server(transport: &MockTransport) -> Client {
        client(ClientConfig::default().with_api_key("X"), transport)
    }

    fn body_json(request: &HttpRequest) -> Value {
        serde_json::from_slice(request.body.as_deref().expect("request body")).unwrap()
    }

    #[tokio::test]
    async fn test_get_nft_returns_body_as_is() {
        let body = json!({ "id": 5, "projectId": "p1", "name": "Foo #5", "animationUrl": "a.mp4" });
        let transport = MockTransport::json(body.clone());
        let client = server(&transport);

        let nft = client.get_nft(&NftParams::new("p1", 5)).await.unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            format!("{DEVNET_API_URL}/v2/projects/p1/nfts/5")
        );
        assert!(request.body.is_none());
        assert_eq!(serde_json::to_value(&nft).unwrap(), body);
    }

    #[tokio::test]
    async fn test_create_project_posts_body() {
        let transport = MockTransport::json(json!({ "projectId": 1, "transactionId": "t1" }));
        let client = server(&transport);

        let created = client
            .create_project(&json!({ "name": "Foo" }))
            .await
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.path(), "/v2/projects");
        assert_eq!(body_json(&request), json!({ "name": "Foo" }));
        assert_eq!(created.transaction_id(), Some(&Id::from("t1")));
    }

    #[tokio::test]
    async fn test_authorization_header_modes() {
        let transport = MockTransport::json(json!({}));

        server(&transport).get_me().await.unwrap();
        assert_eq!(transport.last().headers[AUTHORIZATION], "Bearer X");

        client(
            ClientConfig::default().with_api_key("X").with_bearer(false),
            &transport,
        )
        .get_me()
        .await
        .unwrap();
        assert_eq!(transport.last().headers[AUTHORIZATION], "X");

        let proxied = client(ClientConfig::default(), &transport);
        assert!(!proxied.is_authenticated());
        proxied.get_me().await.unwrap();
        let request = transport.last();
        assert!(request.headers.get(AUTHORIZATION).is_none());
        assert_eq!(
            request.url.as_str(),
            "http://localhost:3000/api/underdog/v2/wallets/me"
        );
    }

    #[tokio::test]
    async fn test_mainnet_endpoint() {
        let transport = MockTransport::json(json!({ "results": [] }));
        let client = client(
            ClientConfig::default()
                .with_api_key("X")
                .with_network(Network::Mainnet),
            &transport,
        );

        assert_eq!(client.base_url(), MAINNET_API_URL);
        client
            .get_transactions(&PageQuery::new(2, 10))
            .await
            .unwrap();
        assert_eq!(
            transport.last().url.as_str(),
            format!("{MAINNET_API_URL}/v2/transactions?page=2&limit=10")
        );
    }

    #[tokio::test]
    async fn test_search_query_is_percent_encoded() {
        let transport = MockTransport::json(json!({ "results": [] }));
        let client = server(&transport);

        client
            .search_nfts(
                &ProjectParams::new("p1"),
                &SearchQuery {
                    search: "owner=abc&x y".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let url = transport.last().url;
        assert_eq!(url.path(), "/v2/projects/p1/nfts/search");
        assert_eq!(url.query(), Some("search=owner%3Dabc%26x+y"));
    }

    #[tokio::test]
    async fn test_burn_revoke_claim_force_non_transferable_path() {
        let transport = MockTransport::json(json!({ "transactionId": "t1", "link": "l" }));
        let client = client(
            ClientConfig::default()
                .with_api_key("X")
                .with_grammar(PathGrammar::TypeCoded),
            &transport,
        );
        let nft = ProjectParams::new("p1")
            .with_type(ProjectType {
                compressed: true,
                transferable: true,
            })
            .nft(7);

        client.burn_nft(&nft).await.unwrap();
        assert_eq!(transport.last().method, Method::POST);
        assert_eq!(transport.last().url.path(), "/v2/projects/n/p1/nfts/7/burn");
        assert!(transport.last().body.is_none());

        client.revoke_nft(&nft).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/projects/n/p1/nfts/7/revoke");

        client.get_nft_claim_link(&nft).await.unwrap();
        assert_eq!(transport.last().method, Method::GET);
        assert_eq!(transport.last().url.path(), "/v2/projects/n/p1/nfts/7/claim");

        // other operations keep the caller's type
        client.get_nft(&nft).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/projects/c/p1/nfts/7");
    }

    #[tokio::test]
    async fn test_update_verbs() {
        let transport = MockTransport::json(json!({ "transactionId": "t1" }));
        let client = server(&transport);
        let nft = NftParams::new(1, 2);
        let input = NftInput {
            name: Some("Renamed".into()),
            ..Default::default()
        };

        client.update_nft(&nft, &input).await.unwrap();
        assert_eq!(transport.last().method, Method::PUT);
        assert_eq!(body_json(&transport.last()), json!({ "name": "Renamed" }));

        client.partial_update_nft(&nft, &input).await.unwrap();
        assert_eq!(transport.last().method, Method::PATCH);
        assert_eq!(transport.last().url.path(), "/v2/projects/1/nfts/2");

        client
            .partial_update_project(&ProjectParams::new(1), &ProjectInput::default())
            .await
            .unwrap();
        assert_eq!(transport.last().method, Method::PATCH);
        assert_eq!(body_json(&transport.last()), json!({}));

        client
            .update_project_name(&ProjectParams::new(1), &json!({ "name": "Bar" }))
            .await
            .unwrap();
        assert_eq!(transport.last().method, Method::PUT);
        assert_eq!(transport.last().url.path(), "/v2/projects/1/name");
        assert_eq!(body_json(&transport.last()), json!({ "name": "Bar" }));

        client
            .update_project_symbol(&ProjectParams::new(1), &json!({ "symbol": "BAR" }))
            .await
            .unwrap();
        assert_eq!(transport.last().method, Method::PUT);
        assert_eq!(transport.last().url.path(), "/v2/projects/1/symbol");
    }

    #[tokio::test]
    async fn test_delete_ignores_empty_body() {
        let transport = MockTransport::new([Reply::Empty(StatusCode::NO_CONTENT)]);
        let client = server(&transport);

        client
            .delete_webhook(&WebhookParams {
                webhook_id: "w1".into(),
            })
            .await
            .unwrap();
        client
            .delete_key(&KeyParams {
                org_id: "o1".into(),
                prefix: "abc".into(),
            })
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(requests[0].url.path(), "/v2/webhooks/w1");
        assert_eq!(requests[1].url.path(), "/v2/orgs/o1/keys/abc");
        assert!(requests.iter().all(|r| r.body.is_none()));
    }

    #[tokio::test]
    async fn test_empty_write_response_is_default() {
        let transport = MockTransport::new([Reply::Empty(StatusCode::OK)]);
        let client = server(&transport);

        let burned = client.burn_nft(&NftParams::new(1, 2)).await.unwrap();
        assert_eq!(burned, Mutation::default());
        let revoked = client.revoke_nft(&NftParams::new(1, 2)).await.unwrap();
        assert_eq!(revoked, Mutation::default());
        assert_eq!(transport.last().method, Method::POST);

        // reads still require a body
        assert!(client.get_nft(&NftParams::new(1, 2)).await.unwrap_err().is_decode());
    }

    #[tokio::test]
    async fn test_batch_is_void() {
        let transport = MockTransport::new([Reply::Empty(StatusCode::ACCEPTED)]);
        let client = server(&transport);

        client
            .batch_nft(&ProjectParams::new(3), &json!([{ "name": "a" }, { "name": "b" }]))
            .await
            .unwrap();
        assert_eq!(transport.last().url.path(), "/v2/projects/3/nfts/batch");

        client
            .batch_sft(&ProjectParams::new(3), &json!([]))
            .await
            .unwrap();
        assert_eq!(transport.last().url.path(), "/v2/projects/3/sfts/batch");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let transport = MockTransport::new([Reply::Json(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "message": "name is required" }),
        )]);
        let client = server(&transport);

        let err = client
            .create_webhook(&WebhookInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(err.json_body().unwrap()["message"], json!("name is required"));
        // exactly one attempt
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let transport = MockTransport::new([Reply::Fail("connection reset".into())]);
        let client = server(&transport);

        let err = client.get_orgs(&PageQuery::default()).await.unwrap_err();
        assert_eq!(err.body(), Some("connection reset"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_resource_endpoints() {
        let transport = MockTransport::json(json!({ "results": [] }));
        let client = server(&transport);
        let mint = MintAddressParams::new("M1");
        let org = OrgParams {
            org_id: "o1".into(),
        };
        let member = MemberParams {
            org_id: "o1".into(),
            wallet_address: "W1".into(),
        };

        client.get_collection_nfts(&mint, &PageQuery::default()).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/collections/M1/nfts");

        client.claim_collection_nft(&mint, &json!({ "claimerAddress": "W1" })).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/collections/M1/claim");

        client.pay_nft_by_mint_address(&mint, &json!({})).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/nfts/M1/pay");

        client.get_members(&org, &PageQuery::default()).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/orgs/o1/members");

        client.update_member(&member, &json!({ "role": "ADMIN" })).await.unwrap();
        assert_eq!(transport.last().method, Method::PUT);
        assert_eq!(transport.last().url.path(), "/v2/orgs/o1/members/W1");

        client.create_key(&org, &json!({ "name": "ci" })).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/orgs/o1/keys");

        client.get_domain(&DomainParams { namespace: "dog".into() }).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/domains/dog");

        client.create_snapshot(&json!({ "projectId": "1" })).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/snapshots");

        client.upload_file(&json!({ "contentType": "image/png" })).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/files");

        client.get_trees(&PageQuery::default()).await.unwrap();
        assert_eq!(transport.last().url.path(), "/v2/trees");
    }

    #[tokio::test]
    async fn test_json_content_type_is_left_to_transport() {
        // the client hands over encoded bytes; the reqwest transport adds the header
        let transport = MockTransport::json(json!({}));
        server(&transport).create_domain(&json!({ "namespace": "dog" })).await.unwrap();
        assert!(transport.last().headers.get(CONTENT_TYPE).is_none());
        assert_eq!(body_json(&transport.last()), json!({ "namespace": "dog" }));
    }
}
