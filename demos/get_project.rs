//! Fetches a project and its first page of NFTs.
//!
//! ```sh
//! UNDERDOG_API_KEY=... cargo run --example get-project -- --project 1
//! ```

use clap::Parser;
use underdog_sdk::{
    Client, ClientConfig,
    client::types::{PageQuery, ProjectParams},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    project: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = simple_logger::init_with_level(log::Level::Debug);

    let args = Cli::parse();
    let client = Client::new(ClientConfig::from_env())?;
    let params = ProjectParams::new(&args.project);

    let project = client.get_project(&params, &PageQuery::default()).await?;
    println!("{:?} ({:?}): {:?}", project.name(), project.symbol(), project.status());

    let nfts = client.get_nfts(&params, &PageQuery::new(1, 10)).await?;
    for nft in nfts.results {
        println!("  #{:?} {:?} -> {:?}", nft.id(), nft.name(), nft.owner_address());
    }

    Ok(())
}
