//! Creates a project and watches it until it leaves `processing`.
//!
//! ```sh
//! UNDERDOG_API_KEY=... cargo run --example wait-for-project -- --name Foo --symbol FOO
//! ```

use std::sync::Arc;

use clap::Parser;
use underdog_sdk::{
    Client, ClientConfig,
    client::types::{PageQuery, ProjectInput, ProjectParams},
    query::Queries,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    name: String,
    #[arg(short, long)]
    symbol: String,
    #[arg(long, default_value = "https://example.com/project.png")]
    image: String,
    #[arg(long)]
    transferable: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = simple_logger::init_with_level(log::Level::Debug);

    let args = Cli::parse();
    let client = Arc::new(Client::new(ClientConfig::from_env())?);

    let created = client
        .create_project(&ProjectInput {
            name: Some(args.name),
            symbol: Some(args.symbol),
            image: Some(args.image),
            transferable: Some(args.transferable),
            ..Default::default()
        })
        .await?;
    let Some(project_id) = created.project_id().cloned() else {
        anyhow::bail!("no project id in {:?}", created.rest);
    };
    println!("created project {project_id}");

    let mut updates = Queries::new(client)
        .project(ProjectParams::new(project_id), PageQuery::default())
        .watch();

    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        if let Some(err) = state.error {
            anyhow::bail!("{err}");
        }
        if let Some(project) = state.data {
            println!("status: {:?}", project.status());
        }
    }

    Ok(())
}
