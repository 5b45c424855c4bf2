//! Resource path construction.
//!
//! Paths are pure functions of the params and never percent-decode or
//! validate ids. Two grammars exist for the project subtree and a client
//! uses exactly one of them for its whole lifetime:
//!
//! ```text
//! Current:    /v2/projects/{projectId}/nfts/{nftId}
//! TypeCoded:  /v2/projects/{c|t|n}/{projectId}/nfts/{nftId}
//! ```
//!
//! All other resources share `/v2/{resource}[/{id}][/{subresource}]`.

use super::{
    ApiVersion, PathGrammar,
    types::{
        DomainParams, KeyParams, MemberParams, MintAddressParams, NftParams, OrgParams,
        ProjectParams, ProjectType, RequestParams, SnapshotParams, TransactionParams,
        WebhookParams,
    },
};

/// Path builder bound to an API version and a project grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paths {
    version: ApiVersion,
    grammar: PathGrammar,
}

impl Paths {
    pub const fn new(version: ApiVersion, grammar: PathGrammar) -> Self {
        Self { version, grammar }
    }

    #[must_use]
    pub const fn grammar(&self) -> PathGrammar {
        self.grammar
    }

    fn root(&self, resource: &str) -> String {
        format!("/{}/{resource}", self.version)
    }

    /// `/v2/projects`
    pub fn projects(&self) -> String {
        self.root("projects")
    }

    /// Project list filtered by type. Only the type-coded grammar encodes the
    /// type in the path.
    pub fn projects_of_type(&self, project_type: Option<ProjectType>) -> String {
        match (self.grammar, project_type) {
            (PathGrammar::TypeCoded, Some(project_type)) => {
                format!("{}/{}", self.projects(), project_type.code())
            }
            _ => self.projects(),
        }
    }

    /// `/v2/projects/{projectId}` or `/v2/projects/{code}/{projectId}`.
    pub fn project(&self, params: &ProjectParams) -> String {
        match self.grammar {
            PathGrammar::Current => format!("{}/{}", self.projects(), params.project_id),
            PathGrammar::TypeCoded => format!(
                "{}/{}/{}",
                self.projects(),
                params.project_type.unwrap_or_default().code(),
                params.project_id
            ),
        }
    }

    /// `{project}/nfts`
    pub fn nfts(&self, params: &ProjectParams) -> String {
        format!("{}/nfts", self.project(params))
    }

    /// `{project}/sfts`
    pub fn sfts(&self, params: &ProjectParams) -> String {
        format!("{}/sfts", self.project(params))
    }

    /// `{project}/nfts/{nftId}`
    pub fn nft(&self, params: &NftParams) -> String {
        format!("{}/{}", self.nfts(&params.project), params.nft_id)
    }

    /// NFT path for operations only defined on non-transferable,
    /// non-compressed projects (burn, revoke, claim links).
    ///
    /// The type-coded grammar forces code `n` whatever type the caller gave;
    /// the current grammar has no type segment so this is [`Paths::nft`].
    pub fn non_transferable_nft(&self, params: &NftParams) -> String {
        let forced = NftParams {
            project: ProjectParams {
                project_id: params.project.project_id.clone(),
                project_type: Some(ProjectType::NON_TRANSFERABLE),
            },
            nft_id: params.nft_id.clone(),
        };
        self.nft(&forced)
    }

    /// `/v2/nfts/{mintAddress}`
    pub fn nft_by_mint(&self, params: &MintAddressParams) -> String {
        format!("{}/{}", self.root("nfts"), params.mint_address)
    }

    /// `/v2/collections`
    pub fn collections(&self) -> String {
        self.root("collections")
    }

    /// `/v2/collections/{mintAddress}`
    pub fn collection(&self, params: &MintAddressParams) -> String {
        format!("{}/{}", self.collections(), params.mint_address)
    }

    pub fn transactions(&self) -> String {
        self.root("transactions")
    }

    pub fn transaction(&self, params: &TransactionParams) -> String {
        format!("{}/{}", self.transactions(), params.transaction_id)
    }

    pub fn requests(&self) -> String {
        self.root("requests")
    }

    pub fn request(&self, params: &RequestParams) -> String {
        format!("{}/{}", self.requests(), params.request_id)
    }

    pub fn orgs(&self) -> String {
        self.root("orgs")
    }

    pub fn org(&self, params: &OrgParams) -> String {
        format!("{}/{}", self.orgs(), params.org_id)
    }

    /// `/v2/orgs/{orgId}/members`
    pub fn members(&self, params: &OrgParams) -> String {
        format!("{}/members", self.org(params))
    }

    /// `/v2/orgs/{orgId}/members/{walletAddress}`
    pub fn member(&self, params: &MemberParams) -> String {
        format!(
            "{}/{}/members/{}",
            self.orgs(),
            params.org_id,
            params.wallet_address
        )
    }

    /// `/v2/orgs/{orgId}/keys`
    pub fn keys(&self, params: &OrgParams) -> String {
        format!("{}/keys", self.org(params))
    }

    /// `/v2/orgs/{orgId}/keys/{prefix}`
    pub fn key(&self, params: &KeyParams) -> String {
        format!("{}/{}/keys/{}", self.orgs(), params.org_id, params.prefix)
    }

    pub fn webhooks(&self) -> String {
        self.root("webhooks")
    }

    pub fn webhook(&self, params: &WebhookParams) -> String {
        format!("{}/{}", self.webhooks(), params.webhook_id)
    }

    /// `/v2/wallets/me`
    pub fn me(&self) -> String {
        format!("{}/me", self.root("wallets"))
    }

    pub fn domains(&self) -> String {
        self.root("domains")
    }

    pub fn domain(&self, params: &DomainParams) -> String {
        format!("{}/{}", self.domains(), params.namespace)
    }

    pub fn snapshots(&self) -> String {
        self.root("snapshots")
    }

    pub fn snapshot(&self, params: &SnapshotParams) -> String {
        format!("{}/{}", self.snapshots(), params.snapshot_id)
    }

    pub fn files(&self) -> String {
        self.root("files")
    }

    pub fn trees(&self) -> String {
        self.root("trees")
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new(ApiVersion::V2, PathGrammar::Current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> Paths {
        Paths::default()
    }

    fn type_coded() -> Paths {
        Paths::new(ApiVersion::V2, PathGrammar::TypeCoded)
    }

    const TRANSFERABLE: ProjectType = ProjectType {
        compressed: false,
        transferable: true,
    };

    #[test]
    fn test_project_paths_current() {
        let paths = current();
        let project = ProjectParams::new("p1").with_type(TRANSFERABLE);

        assert_eq!(paths.projects(), "/v2/projects");
        assert_eq!(paths.projects_of_type(Some(TRANSFERABLE)), "/v2/projects");
        assert_eq!(paths.project(&project), "/v2/projects/p1");
        assert_eq!(paths.nfts(&project), "/v2/projects/p1/nfts");
        assert_eq!(paths.sfts(&project), "/v2/projects/p1/sfts");
        assert_eq!(paths.nft(&project.nft(5)), "/v2/projects/p1/nfts/5");
        assert_eq!(
            paths.non_transferable_nft(&project.nft(5)),
            "/v2/projects/p1/nfts/5"
        );
    }

    #[test]
    fn test_project_paths_type_coded() {
        let paths = type_coded();
        let compressed = ProjectParams::new(9).with_type(ProjectType {
            compressed: true,
            transferable: false,
        });

        assert_eq!(paths.project(&compressed), "/v2/projects/c/9");
        assert_eq!(paths.nft(&compressed.nft(3)), "/v2/projects/c/9/nfts/3");
        assert_eq!(paths.projects_of_type(Some(TRANSFERABLE)), "/v2/projects/t");
        assert_eq!(paths.projects_of_type(None), "/v2/projects");
        // no type given falls back to the non-transferable code
        assert_eq!(paths.project(&ProjectParams::new(9)), "/v2/projects/n/9");
    }

    #[test]
    fn test_non_transferable_path_ignores_caller_type() {
        let paths = type_coded();
        for project_type in [
            ProjectType::NON_TRANSFERABLE,
            TRANSFERABLE,
            ProjectType {
                compressed: true,
                transferable: true,
            },
        ] {
            let nft = ProjectParams::new(4).with_type(project_type).nft(8);
            assert_eq!(paths.non_transferable_nft(&nft), "/v2/projects/n/4/nfts/8");
        }
    }

    #[test]
    fn test_resource_paths() {
        let paths = current();
        let mint = MintAddressParams::new("Mint111");
        let org = OrgParams {
            org_id: "o1".into(),
        };

        assert_eq!(paths.nft_by_mint(&mint), "/v2/nfts/Mint111");
        assert_eq!(paths.collections(), "/v2/collections");
        assert_eq!(paths.collection(&mint), "/v2/collections/Mint111");
        assert_eq!(paths.transactions(), "/v2/transactions");
        assert_eq!(
            paths.transaction(&TransactionParams {
                transaction_id: "t1".into()
            }),
            "/v2/transactions/t1"
        );
        assert_eq!(
            paths.request(&RequestParams {
                request_id: "r1".into()
            }),
            "/v2/requests/r1"
        );
        assert_eq!(paths.org(&org), "/v2/orgs/o1");
        assert_eq!(paths.members(&org), "/v2/orgs/o1/members");
        assert_eq!(
            paths.member(&MemberParams {
                org_id: "o1".into(),
                wallet_address: "W1".into()
            }),
            "/v2/orgs/o1/members/W1"
        );
        assert_eq!(paths.keys(&org), "/v2/orgs/o1/keys");
        assert_eq!(
            paths.key(&KeyParams {
                org_id: "o1".into(),
                prefix: "abc".into()
            }),
            "/v2/orgs/o1/keys/abc"
        );
        assert_eq!(
            paths.webhook(&WebhookParams {
                webhook_id: "w1".into()
            }),
            "/v2/webhooks/w1"
        );
        assert_eq!(paths.me(), "/v2/wallets/me");
        assert_eq!(
            paths.domain(&DomainParams {
                namespace: "underdog".into()
            }),
            "/v2/domains/underdog"
        );
        assert_eq!(
            paths.snapshot(&SnapshotParams {
                snapshot_id: "s1".into()
            }),
            "/v2/snapshots/s1"
        );
        assert_eq!(paths.files(), "/v2/files");
        assert_eq!(paths.trees(), "/v2/trees");
    }
}
