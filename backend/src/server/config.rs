//! HTTP server configuration.

use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration, read from the command line or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Learning platform backend API")]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Number of HTTP worker threads; defaults to the core count.
    #[arg(long, env = "HTTP_WORKERS")]
    pub workers: Option<usize>,
}

impl ServerConfig {
    /// Parse configuration from the process arguments and environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse()
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_8080() {
        let config = ServerConfig::parse_from(["backend"]);
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().expect("addr"));
        assert!(config.workers.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config =
            ServerConfig::parse_from(["backend", "--bind-addr", "127.0.0.1:9999", "--workers", "2"]);
        assert_eq!(config.bind_addr, "127.0.0.1:9999".parse().expect("addr"));
        assert_eq!(config.workers, Some(2));
    }
}
