//! Mints an NFT into a project and waits for its transaction.
//!
//! ```sh
//! UNDERDOG_API_KEY=... cargo run --example create-nft -- --project 1 --name "Foo #1" \
//!     --image https://example.com/foo.png --receiver <wallet>
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use underdog_sdk::{
    Client, ClientConfig,
    client::types::{NftInput, ProjectParams},
    query::Queries,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    project: String,
    #[arg(short, long)]
    name: String,
    #[arg(short, long)]
    image: String,
    /// Wallet receiving the NFT.
    #[arg(short, long)]
    receiver: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = simple_logger::init_with_level(log::Level::Info);

    let args = Cli::parse();
    let client = Arc::new(Client::new(ClientConfig::from_env())?);

    let minted = client
        .create_nft(
            &ProjectParams::new(&args.project),
            &NftInput {
                name: Some(args.name),
                image: Some(args.image),
                receiver_address: args.receiver,
                ..Default::default()
            },
        )
        .await?;
    println!("minting nft {:?}", minted.nft_id());

    let queries = Queries::new(client);
    queries.invalidate("nfts").await;

    let transaction_id = minted.transaction_id().map(ToString::to_string);
    if transaction_id.is_none() {
        println!("no transaction to wait for");
    }

    let mut updates = queries
        .transaction_with_poll(transaction_id, Duration::from_secs(1))
        .watch();
    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        if let Some(err) = state.error {
            anyhow::bail!("{err}");
        }
        if let Some(tx) = state.data {
            println!("transaction status: {:?}", tx.status());
        }
    }

    Ok(())
}
