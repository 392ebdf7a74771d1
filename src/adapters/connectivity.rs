use crate::config::ConnectivityConfig;
use crate::domain::ports::ConnectivityProbe;
use std::time::Duration;
use tokio::net::TcpStream;

/// Single TCP connect attempt against a well-known public host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ConnectivityConfig) -> Self {
        Self::new(config.address(), config.timeout())
    }
}

impl ConnectivityProbe for TcpProbe {
    async fn is_reachable(&self) -> bool {
        matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await,
            Ok(Ok(_))
        )
    }
}

/// Polls `probe` until it succeeds, sleeping `interval` between attempts.
pub async fn wait_until_connected<P: ConnectivityProbe>(probe: &P, interval: Duration) {
    let mut attempts: u32 = 0;
    while !probe.is_reachable().await {
        attempts += 1;
        if attempts == 1 {
            tracing::warn!("🔌 Network unreachable, waiting for connectivity...");
        } else {
            tracing::debug!("Connectivity probe failed ({} attempts)", attempts);
        }
        tokio::time::sleep(interval).await;
    }
    if attempts > 0 {
        tracing::info!("🔌 Connectivity restored after {} failed probes", attempts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_probe_reaches_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let probe = TcpProbe::new(address, Duration::from_secs(1));
        assert!(probe.is_reachable().await);
    }

    #[tokio::test]
    async fn test_probe_reports_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let probe = TcpProbe::new(address, Duration::from_secs(1));
        assert!(!probe.is_reachable().await);
    }

    struct FlakyProbe {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl ConnectivityProbe for FlakyProbe {
        async fn is_reachable(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_err()
        }
    }

    #[tokio::test]
    async fn test_wait_loops_until_probe_passes() {
        let probe = FlakyProbe {
            failures_left: AtomicU32::new(3),
            calls: AtomicU32::new(0),
        };

        wait_until_connected(&probe, Duration::from_millis(1)).await;

        assert_eq!(probe.calls.load(Ordering::SeqCst), 4);
    }
}
