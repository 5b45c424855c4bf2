//! Standalone forwarding server for browser clients.
//!
//! ```sh
//! UNDERDOG_API_KEY=... underdog-proxy --network mainnet --listen 0.0.0.0:3000
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use underdog_sdk::{
    Network,
    client::PROXY_BASE_PATH,
    proxy::{self, ProxyOptions},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Underdog API key injected into every forwarded request.
    #[arg(long, env = "UNDERDOG_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "UNDERDOG_NETWORK", default_value_t = Network::Devnet)]
    network: Network,
    /// Send the raw key instead of `Bearer <key>`.
    #[arg(long)]
    raw_key: bool,
    /// Forward to this URL instead of the network endpoint.
    #[arg(long, env = "UNDERDOG_BASE_URL")]
    base_url: Option<String>,
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = simple_logger::init_with_level(log::Level::Info);

    let args = Cli::parse();

    let mut options = ProxyOptions::new(args.api_key, args.network).with_bearer(!args.raw_key);
    if let Some(base_url) = args.base_url {
        options = options.with_base_url(base_url);
    }
    let target = options.target()?;
    let app = proxy::router(options)?;

    let listener = TcpListener::bind(args.listen).await?;
    log::info!(
        "forwarding http://{}{PROXY_BASE_PATH} to {target}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;

    Ok(())
}
