use anyhow::{Result, bail};
use premiumize::{Client, FileSource};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: cargo run --example add_transfer -- <URL|MAGNET|FILE> [FOLDER_ID]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(source) = args.next() else {
        bail!(USAGE);
    };
    let folder_id = args.next();

    let client = Client::from_env()?;

    // Cached items can be fetched right away instead of queuing a transfer.
    if !Path::new(&source).exists() {
        if let Some(cache) = client.cache().check(&[source.as_str()]).await? {
            if cache["response"][0].as_bool() == Some(true) {
                let dl = client.transfer().direct_download(&source).await?;
                if let Some(link) = dl
                    .as_ref()
                    .and_then(|v| v["content"][0]["link"].as_str())
                {
                    let path = client.download(link, Path::new("")).await?;
                    println!("downloaded {}", path.display());
                    return Ok(());
                }
            }
        }
    }

    let reply = if Path::new(&source).exists() {
        client
            .transfer()
            .create(None, Some(FileSource::path(&source)), folder_id.as_deref())
            .await?
    } else {
        client
            .transfer()
            .create(Some(&source), None, folder_id.as_deref())
            .await?
    };

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
