//! Listener bootstrap.

use std::io;

use tokio::net::TcpListener;
use tracing::{debug, info};

/// Ports tried after the preferred one.
pub const FALLBACK_PORTS: std::ops::RangeInclusive<u16> = 8010..=8039;

/// Hosts tried after the preferred one.
pub const FALLBACK_HOSTS: [&str; 3] = ["127.0.0.1", "localhost", "0.0.0.0"];

/// Bind candidates in the order they are tried: for each host, the
/// preferred port, then [`FALLBACK_PORTS`], then an ephemeral port.
pub fn bind_candidates(host: &str, port: u16) -> Vec<(String, u16)> {
    let mut hosts = vec![host.to_string()];
    for h in FALLBACK_HOSTS {
        if !hosts.iter().any(|existing| existing == h) {
            hosts.push(h.to_string());
        }
    }

    let mut ports = vec![port];
    ports.extend(FALLBACK_PORTS.filter(|p| *p != port));
    if port != 0 {
        ports.push(0);
    }

    hosts
        .into_iter()
        .flat_map(|h| ports.iter().map(move |p| (h.clone(), *p)))
        .collect()
}

/// Bind the first candidate address that accepts.
pub async fn bind_with_fallback(host: &str, port: u16) -> io::Result<TcpListener> {
    let mut last_err = None;

    for (h, p) in bind_candidates(host, port) {
        match TcpListener::bind((h.as_str(), p)).await {
            Ok(listener) => {
                let addr = listener.local_addr()?;
                info!(host = %h, addr = %addr, "Listening on http://{}:{}", h, addr.port());
                return Ok(listener);
            }
            Err(e) => {
                debug!(host = %h, port = p, error = %e, "Bind failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no bind candidates")
    }))
}

/// Resolve when Ctrl-C (or SIGTERM on unix) is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let c = bind_candidates("127.0.0.1", 8000);
        assert_eq!(c[0], ("127.0.0.1".to_string(), 8000));
        assert_eq!(c[1], ("127.0.0.1".to_string(), 8010));
        assert_eq!(c[31], ("127.0.0.1".to_string(), 0));
        assert_eq!(c[32], ("localhost".to_string(), 8000));
        // Three hosts, each with preferred + 30 fallbacks + ephemeral
        assert_eq!(c.len(), 3 * 32);
        assert_eq!(c.last().unwrap(), &("0.0.0.0".to_string(), 0));
    }

    #[test]
    fn test_candidates_without_duplicates() {
        let c = bind_candidates("192.168.1.5", 8015);
        assert_eq!(c[0], ("192.168.1.5".to_string(), 8015));
        assert_eq!(c.iter().filter(|(h, p)| h == "192.168.1.5" && *p == 8015).count(), 1);
        assert_eq!(c.len(), 4 * 31);
    }

    #[tokio::test]
    async fn test_busy_port_falls_through() {
        let held = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let busy = held.local_addr().unwrap().port();

        let listener = bind_with_fallback("127.0.0.1", busy).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), busy);
    }
}
