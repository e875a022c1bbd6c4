use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;
use crate::http::connection::{Connection, SharedIssuer};
use crate::session::server::SessionIssuer;

/// Pause after a failed accept before trying again.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", cfg.server.listen_addr);

    let issuer = Arc::new(Mutex::new(SessionIssuer::from_entropy(cfg.session.clone())));
    serve(listener, cfg, issuer).await
}

/// Accept loop over an already bound listener.
///
/// A failing connection never stops the loop.
pub async fn serve(listener: TcpListener, cfg: &Config, issuer: SharedIssuer) -> anyhow::Result<()> {
    let mode = cfg.parser.mode();
    let max_header_bytes = cfg.server.max_header_bytes;

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "Accept failed");
                // EMFILE and friends fail again immediately
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let issuer = issuer.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, issuer, mode, max_header_bytes);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_failures_back_off() {
        assert!(ACCEPT_BACKOFF >= Duration::from_millis(10));
    }
}
