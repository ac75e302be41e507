//! Upstream TCP dialing with address-family filtering and a connect timeout.

use std::io;
use std::time::Duration;

use tokio::net::{TcpStream, lookup_host};

use super::params::DialTarget;
use crate::error::RelayError;

/// Connects to `target`, trying each resolved address in order.
///
/// # Errors
///
/// - [`RelayError::UpstreamUnavailable`] if resolution fails, no address of
///   the requested family exists, or every connect attempt fails.
/// - [`RelayError::UpstreamTimeout`] if the whole attempt exceeds `timeout`.
pub async fn dial(target: &DialTarget, timeout: Duration) -> Result<TcpStream, RelayError> {
    match tokio::time::timeout(timeout, connect(target)).await {
        Ok(Ok(stream)) => {
            if let Err(err) = stream.set_nodelay(true) {
                tracing::debug!(error = %err, "failed to set TCP_NODELAY");
            }
            Ok(stream)
        }
        Ok(Err(source)) => Err(RelayError::UpstreamUnavailable {
            target: target.address.clone(),
            source,
        }),
        Err(_) => Err(RelayError::UpstreamTimeout {
            target: target.address.clone(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

async fn connect(target: &DialTarget) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in lookup_host(target.address.as_str()).await? {
        if !target.network.accepts(&addr) {
            continue;
        }
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                tracing::debug!(%addr, network = %target.network, "upstream connected");
                return Ok(stream);
            }
            Err(err) => {
                tracing::debug!(%addr, error = %err, "upstream connect attempt failed");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no {} address for {}", target.network, target.address),
        )
    }))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;
    use crate::ws::params::Network;

    #[tokio::test]
    async fn dials_listening_upstream() {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        let target = DialTarget::tcp(addr.to_string());
        let result = dial(&target, Duration::from_secs(2)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn refused_upstream_is_unavailable() {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        drop(listener);

        let target = DialTarget::tcp(addr.to_string());
        assert!(matches!(
            dial(&target, Duration::from_secs(2)).await,
            Err(RelayError::UpstreamUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn family_mismatch_is_unavailable() {
        let target = DialTarget {
            network: Network::Tcp6,
            address: "127.0.0.1:22".to_string(),
        };
        let Err(RelayError::UpstreamUnavailable { source, .. }) =
            dial(&target, Duration::from_secs(2)).await
        else {
            panic!("expected family mismatch to fail");
        };
        assert_eq!(source.kind(), io::ErrorKind::AddrNotAvailable);
    }
}
