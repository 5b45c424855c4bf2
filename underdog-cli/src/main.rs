use std::fmt::Display;
use std::io::{Write, stdout};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use enum_dispatch::enum_dispatch;
use underdog_sdk::{
    Client, ClientConfig, Network,
    client::types::{NftParams, PageQuery, ProjectParams},
    query::Queries,
};

#[derive(Parser)]
#[command(author, version, about = "Query the Underdog Protocol API")]
struct Cli {
    #[command(flatten)]
    connection: Connection,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Connection {
    #[arg(long, global = true, env = "UNDERDOG_NETWORK", default_value_t = Network::Devnet)]
    network: Network,
    #[arg(long, global = true, env = "UNDERDOG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Talk to this URL instead of the network endpoint, e.g. a running proxy.
    #[arg(long, global = true, env = "UNDERDOG_BASE_URL")]
    base_url: Option<String>,
    /// Send the raw key instead of `Bearer <key>`.
    #[arg(long, global = true)]
    raw_key: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl Connection {
    fn client(&self) -> anyhow::Result<Client> {
        let mut config = ClientConfig::default()
            .with_network(self.network)
            .with_bearer(!self.raw_key);
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        Ok(Client::new(config)?)
    }
}

#[enum_dispatch]
trait Run {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()>;
}

#[derive(Subcommand)]
#[enum_dispatch(Run)]
enum Commands {
    /// List projects
    Projects(ProjectsCmd),
    /// Show a single project
    Project(ProjectCmd),
    /// List the NFTs of a project
    Nfts(NftsCmd),
    /// Show a single NFT
    Nft(NftCmd),
    /// Show a transaction
    Transaction(TransactionCmd),
    /// List webhooks
    Webhooks(WebhooksCmd),
    /// Show the wallet the API key belongs to
    Me(MeCmd),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let level = if args.connection.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    let _ = simple_logger::init_with_level(level);

    let client = Arc::new(args.connection.client()?);
    args.command.run(client).await
}

fn or_dash(value: Option<impl Display>) -> String {
    value.map_or_else(|| "-".to_owned(), |value| value.to_string())
}

#[derive(Args)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 10)]
    limit: u32,
}

impl PageArgs {
    fn query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }
}

#[derive(Args)]
struct ProjectsCmd {
    #[command(flatten)]
    page: PageArgs,
}

impl Run for ProjectsCmd {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()> {
        let projects = client
            .get_all_projects(&self.page.query())
            .await?;
        let mut writer = tabwriter::TabWriter::new(stdout());

        writeln!(&mut writer, "id\tname\tstatus\tmint address")?;
        for project in projects.results {
            writeln!(
                &mut writer,
                "{}\t{}\t{}\t{}",
                or_dash(project.id()),
                or_dash(project.name()),
                or_dash(project.status()),
                or_dash(project.mint_address()),
            )?;
        }

        writer.flush()?;

        Ok(())
    }
}

#[derive(Args)]
struct ProjectCmd {
    project_id: String,
    #[command(flatten)]
    page: PageArgs,
    /// Keep polling while the project is processing.
    #[arg(long)]
    wait: bool,
}

impl Run for ProjectCmd {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()> {
        let params = ProjectParams::new(&self.project_id);

        if !self.wait {
            let project = client.get_project(&params, &self.page.query()).await?;
            println!("{}", serde_json::to_string_pretty(&project)?);
            return Ok(());
        }

        let mut updates = Queries::new(client)
            .project(params, self.page.query())
            .watch();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if let Some(err) = state.error {
                anyhow::bail!("{err}");
            }
            if let Some(project) = state.data {
                if project.is_processing() {
                    println!("status: {}", or_dash(project.status()));
                } else {
                    println!("{}", serde_json::to_string_pretty(&*project)?);
                }
            }
        }

        Ok(())
    }
}

#[derive(Args)]
struct NftsCmd {
    project_id: String,
    #[command(flatten)]
    page: PageArgs,
}

impl Run for NftsCmd {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()> {
        let nfts = client
            .get_nfts(
                &ProjectParams::new(&self.project_id),
                &self.page.query(),
            )
            .await?;
        let mut writer = tabwriter::TabWriter::new(stdout());

        writeln!(&mut writer, "id\tname\tstatus\towner\tmint address")?;
        for nft in nfts.results {
            writeln!(
                &mut writer,
                "{}\t{}\t{}\t{}\t{}",
                or_dash(nft.id()),
                or_dash(nft.name()),
                or_dash(nft.status()),
                or_dash(nft.owner_address()),
                or_dash(nft.mint_address()),
            )?;
        }
        if let Some(total) = nfts.total_results() {
            writeln!(&mut writer, "\t\t\t\t{total} total")?;
        }

        writer.flush()?;

        Ok(())
    }
}

#[derive(Args)]
struct NftCmd {
    project_id: String,
    nft_id: String,
}

impl Run for NftCmd {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()> {
        let nft = client
            .get_nft(&NftParams::new(&self.project_id, &self.nft_id))
            .await?;
        println!("{}", serde_json::to_string_pretty(&nft)?);
        Ok(())
    }
}

#[derive(Args)]
struct TransactionCmd {
    transaction_id: String,
    /// Refetch every second until the transaction leaves `pending`.
    #[arg(long)]
    wait: bool,
}

impl Run for TransactionCmd {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()> {
        let queries = Queries::new(client);
        let transaction_id = Some(self.transaction_id.clone());

        if !self.wait {
            let state = queries.transaction(transaction_id).fetch().await;
            if let Some(err) = state.error {
                anyhow::bail!("{err}");
            }
            let transaction = state.data.unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&*transaction)?);
            return Ok(());
        }

        let mut updates = queries
            .transaction_with_poll(transaction_id, Duration::from_secs(1))
            .watch();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if let Some(err) = state.error {
                anyhow::bail!("{err}");
            }
            if let Some(transaction) = state.data {
                if transaction.is_pending() {
                    println!("status: {}", or_dash(transaction.status()));
                } else {
                    println!("{}", serde_json::to_string_pretty(&*transaction)?);
                }
            }
        }

        Ok(())
    }
}

#[derive(Args)]
struct WebhooksCmd {
    #[command(flatten)]
    page: PageArgs,
}

impl Run for WebhooksCmd {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()> {
        let webhooks = client
            .get_webhooks(&self.page.query())
            .await?;
        let mut writer = tabwriter::TabWriter::new(stdout());

        writeln!(&mut writer, "id\turl\tdescription")?;
        for webhook in webhooks.results {
            writeln!(
                &mut writer,
                "{}\t{}\t{}",
                or_dash(webhook.id()),
                or_dash(webhook.url()),
                or_dash(webhook.description()),
            )?;
        }

        writer.flush()?;

        Ok(())
    }
}

#[derive(Args)]
struct MeCmd;

impl Run for MeCmd {
    async fn run(&self, client: Arc<Client>) -> anyhow::Result<()> {
        let wallet = client.get_me().await?;
        println!("{}", or_dash(wallet.address()));
        Ok(())
    }
}
