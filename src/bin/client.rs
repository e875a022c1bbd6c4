use cookie_session::client::Client;
use cookie_session::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let mut client = Client::new(&cfg)?;

    tracing::info!(server = %cfg.client.server_url, "Connecting to server");

    if let Err(e) = client.run().await {
        tracing::error!("Client run aborted: {:#}", e);
        return Err(e);
    }

    Ok(())
}
