use anyhow::Result;
use premiumize::Client;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configure authentication via env vars or a `.premiumizerc` file.
    let client = Client::from_env()?;

    if let Some(info) = client.account().info().await? {
        println!("account: {}", serde_json::to_string_pretty(&info)?);
    }

    if let Some(transfers) = client.transfer().list().await? {
        let count = transfers["transfers"].as_array().map(Vec::len).unwrap_or(0);
        println!("{} transfer(s)", count);
    }

    if let Some(root) = client.folder().list(None, Some(true)).await? {
        for entry in root["content"].as_array().into_iter().flatten() {
            println!(
                "{:>8}  {}",
                entry["type"].as_str().unwrap_or("?"),
                entry["name"].as_str().unwrap_or("")
            );
        }
    }

    Ok(())
}
