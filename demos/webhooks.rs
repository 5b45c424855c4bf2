//! Registers a webhook, lists every webhook, then removes the new one.
//!
//! ```sh
//! UNDERDOG_API_KEY=... cargo run --example webhooks -- --url https://example.com/hook
//! ```

use clap::Parser;
use underdog_sdk::{
    Client, ClientConfig,
    client::types::{PageQuery, WebhookInput, WebhookParams},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    url: String,
    #[arg(short, long)]
    description: Option<String>,
    /// Leave the webhook registered.
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = simple_logger::init_with_level(log::Level::Info);

    let args = Cli::parse();
    let client = Client::new(ClientConfig::from_env())?;

    let webhook = client
        .create_webhook(&WebhookInput {
            url: args.url,
            description: args.description,
        })
        .await?;
    println!("registered {:?} -> {:?}", webhook.id(), webhook.url());

    let webhooks = client.get_webhooks(&PageQuery::default()).await?;
    for webhook in &webhooks.results {
        println!("  {:?} {:?} {:?}", webhook.id(), webhook.url(), webhook.description());
    }

    if let Some(id) = webhook.id().filter(|_| !args.keep) {
        client
            .delete_webhook(&WebhookParams {
                webhook_id: id.to_string(),
            })
            .await?;
        println!("removed webhook");
    }

    Ok(())
}
