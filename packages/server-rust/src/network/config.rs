//! Network configuration for the calculation server.

use std::time::Duration;

/// Listener, auth gate, and HTTP-layer settings.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Shared secret expected in the inbound `X-ASYNC-TOKEN` header.
    pub service_token: String,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
    /// How long shutdown waits for running task units.
    pub drain_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            service_token: "async-secret".to_string(),
            request_timeout: Duration::from_secs(30),
            drain_timeout: Duration::from_secs(30),
        }
    }
}

/// Splits a `host:port` listen address. A bare `:port` binds all interfaces.
///
/// Returns `None` if the port is missing or not a valid `u16`.
#[must_use]
pub fn parse_listen_addr(addr: &str) -> Option<(String, u16)> {
    let (host, port) = addr.rsplit_once(':')?;
    let port = port.parse().ok()?;
    let host = match host.trim_start_matches('[').trim_end_matches(']') {
        "" => "0.0.0.0",
        h => h,
    };
    Some((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 0);
        assert_eq!(config.service_token, "async-secret");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.drain_timeout, Duration::from_secs(30));
    }

    #[test]
    fn parse_listen_addr_bare_port() {
        assert_eq!(parse_listen_addr(":8081"), Some(("0.0.0.0".to_string(), 8081)));
    }

    #[test]
    fn parse_listen_addr_host_and_port() {
        assert_eq!(
            parse_listen_addr("127.0.0.1:9000"),
            Some(("127.0.0.1".to_string(), 9000))
        );
        assert_eq!(parse_listen_addr("[::1]:9000"), Some(("::1".to_string(), 9000)));
    }

    #[test]
    fn parse_listen_addr_rejects_garbage() {
        assert_eq!(parse_listen_addr("8081"), None);
        assert_eq!(parse_listen_addr("localhost:http"), None);
        assert_eq!(parse_listen_addr("localhost:70000"), None);
    }
}
