//! Request and response types for the Underdog API.
//!
//! The client only reads the routing fields of request params (ids, mint
//! addresses, project type). Everything else is passed to the API untouched,
//! and response types keep every field they don't name in a flattened `rest`
//! map so a body survives a decode/encode cycle unmodified.
//!
//! # Params
//!
//! - [`ProjectParams`], [`NftParams`]: project and NFT paths
//! - [`MintAddressParams`]: NFTs and collections addressed by mint
//! - [`OrgParams`], [`MemberParams`], [`KeyParams`]: organizations
//! - [`TransactionParams`], [`RequestParams`], [`WebhookParams`],
//!   [`DomainParams`], [`SnapshotParams`]
//!
//! # Queries
//!
//! - [`PageQuery`]: `page` and `limit` for every list endpoint
//! - [`SearchQuery`]: NFT search

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

/// Unknown fields of a response body.
pub type Rest = Map<String, Value>;

/// Resource identifier as returned by the API, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    String(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::String(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id::Number(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::String(value.to_owned())
    }
}

/// Kind of project, which selects the one-letter code of the type-coded path grammar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectType {
    pub compressed: bool,
    pub transferable: bool,
}

impl ProjectType {
    /// Non-transferable, non-compressed projects. The only kind burn, revoke
    /// and claim links are defined for.
    pub const NON_TRANSFERABLE: ProjectType = ProjectType {
        compressed: false,
        transferable: false,
    };

    /// Path code: `c` for compressed, `t` for transferable, `n` otherwise.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        if self.compressed {
            "c"
        } else if self.transferable {
            "t"
        } else {
            "n"
        }
    }
}

/// Identifies a project.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParams {
    pub project_id: String,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
}

impl ProjectParams {
    pub fn new(project_id: impl fmt::Display) -> Self {
        Self {
            project_id: project_id.to_string(),
            project_type: None,
        }
    }

    /// Sets the project type, only used by the type-coded path grammar.
    pub fn with_type(self, project_type: ProjectType) -> Self {
        Self {
            project_type: Some(project_type),
            ..self
        }
    }

    /// Extends these params into the params of one NFT of the project.
    pub fn nft(&self, nft_id: impl fmt::Display) -> NftParams {
        NftParams {
            project: self.clone(),
            nft_id: nft_id.to_string(),
        }
    }
}

/// Identifies an NFT inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftParams {
    #[serde(flatten)]
    pub project: ProjectParams,
    pub nft_id: String,
}

impl NftParams {
    pub fn new(project_id: impl fmt::Display, nft_id: impl fmt::Display) -> Self {
        ProjectParams::new(project_id).nft(nft_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintAddressParams {
    pub mint_address: String,
}

impl MintAddressParams {
    pub fn new(mint_address: impl Into<String>) -> Self {
        Self {
            mint_address: mint_address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParams {
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgParams {
    pub org_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberParams {
    pub org_id: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyParams {
    pub org_id: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookParams {
    pub webhook_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainParams {
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotParams {
    pub snapshot_id: String,
}

/// Pagination for list endpoints.
#[skip_serializing_none]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

/// NFT search query.
#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    pub search: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Body for creating or updating a project.
#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub external_url: Option<String>,
    pub transferable: Option<bool>,
    pub compressed: Option<bool>,
    pub semifungible: Option<bool>,
    pub attributes: Option<Map<String, Value>>,
}

/// Body for creating or updating an NFT or SFT.
#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftInput {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub animation_url: Option<String>,
    pub external_url: Option<String>,
    pub attributes: Option<Map<String, Value>>,
    pub receiver_address: Option<String>,
    pub upsert: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookInput {
    pub url: String,
    pub description: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    pub wallet_address: Option<String>,
    pub role: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub name: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgInput {
    pub name: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInput {
    pub namespace: String,
    pub image: Option<String>,
    pub name: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInput {
    pub project_id: Option<String>,
    pub mint_address: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeInput {
    pub max_depth: Option<u32>,
    pub max_buffer_size: Option<u32>,
    pub public: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInput {
    pub content_type: Option<String>,
    pub name: Option<String>,
}

/// A response field that tells an absent key (`None`) apart from an explicit
/// `null` (`Some(None)`), so both survive re-encoding.
pub type Field<T> = Option<Option<T>>;

/// Page of results returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub results: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    pub page: Field<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    pub limit: Field<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    pub total_pages: Field<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "::serde_with::rust::double_option")]
    pub total_results: Field<u64>,
    /// Cursors and any other list metadata.
    #[serde(flatten)]
    pub rest: Rest,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn page(&self) -> Option<u64> {
        self.page.flatten()
    }

    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit.flatten()
    }

    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.total_pages.flatten()
    }

    #[must_use]
    pub fn total_results(&self) -> Option<u64> {
        self.total_results.flatten()
    }
}

/// Declares a pass-through response struct. Each named field is a [`Field`]
/// with a same-named accessor that hides the absent/null distinction, and
/// everything else lands in `rest`.
macro_rules! response {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident: $ty:ty),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(
                    default,
                    skip_serializing_if = "Option::is_none",
                    with = "::serde_with::rust::double_option"
                )]
                pub $field: Field<$ty>,
            )*
            #[serde(flatten)]
            pub rest: Rest,
        }

        impl $name {
            $(
                #[must_use]
                pub fn $field(&self) -> Option<&$ty> {
                    self.$field.as_ref().and_then(Option::as_ref)
                }
            )*
        }
    };
}

response! {
    /// A project.
    ///
    /// `status` moves from `pending`/`processing` to a terminal value once the
    /// project's on-chain collection exists.
    Project {
        id: Id,
        name: String,
        symbol: String,
        description: String,
        image: String,
        status: String,
        mint_address: String,
        transferable: bool,
        compressed: bool,
    }
}

impl Project {
    /// Whether the project is still being created on chain.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(self.status().map(String::as_str), Some("processing" | "pending"))
    }
}

response! {
    /// An NFT or SFT.
    Nft {
        id: Id,
        project_id: Id,
        name: String,
        symbol: String,
        image: String,
        status: String,
        mint_address: String,
        owner_address: String,
    }
}

response! {
    /// Aggregated project counters; the API decides the shape.
    ProjectStats {}
}

response! {
    ClaimLink {
        link: String,
    }
}

response! {
    Collection {
        mint_address: String,
        name: String,
        symbol: String,
        image: String,
    }
}

response! {
    /// Returned by every write endpoint that starts an on-chain transaction.
    Mutation {
        transaction_id: Id,
        project_id: Id,
        nft_id: Id,
        mint_address: String,
    }
}

response! {
    Transaction {
        id: Id,
        status: String,
        signature: String,
    }
}

impl Transaction {
    /// Whether the transaction has not landed yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.status().map(String::as_str), Some("pending" | "processing"))
    }
}

response! {
    /// An API request as recorded by Underdog.
    ApiRequest {
        id: Id,
        status: String,
        method: String,
        path: String,
    }
}

response! {
    Org {
        id: Id,
        name: String,
    }
}

response! {
    Member {
        wallet_address: String,
        role: String,
    }
}

response! {
    /// An API key. `key` is only present in the response that created it.
    ApiKey {
        prefix: String,
        name: String,
        key: String,
    }
}

response! {
    Webhook {
        id: Id,
        url: String,
        description: String,
    }
}

response! {
    Wallet {
        address: String,
    }
}

response! {
    Domain {
        namespace: String,
        name: String,
        image: String,
    }
}

response! {
    /// A holder snapshot. `url` appears once the export is ready.
    Snapshot {
        id: Id,
        status: String,
        url: String,
    }
}

impl Snapshot {
    /// Whether the export is available for download.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.url().is_some()
    }
}

response! {
    Tree {
        address: String,
        max_depth: u32,
        max_buffer_size: u32,
    }
}

response! {
    /// Upload slot for a file.
    UploadedFile {
        url: String,
        upload_url: String,
    }
}
