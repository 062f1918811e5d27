//! Server configuration

use std::net::SocketAddr;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent connections (0 = unlimited)
    pub max_connections: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Origins accepted during the WebSocket upgrade
    ///
    /// `None` accepts every origin. With an allowlist, a browser whose
    /// `Origin` header is not listed is refused the upgrade; requests with
    /// no `Origin` header (non-browser clients) are always let through.
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3010".parse().unwrap(),
            max_connections: 0, // Unlimited
            tcp_nodelay: true,  // Important for low latency
            allowed_origins: None,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }

    /// Restrict upgrades to the given origins
    pub fn allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = Some(origins);
        self
    }

    /// Whether a request with the given `Origin` header may upgrade
    pub fn origin_allowed(&self, origin: Option<&str>) -> bool {
        match (&self.allowed_origins, origin) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(list), Some(origin)) => list.iter().any(|allowed| allowed == origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 3010);
        assert_eq!(config.max_connections, 0);
        assert!(config.tcp_nodelay);
        assert!(config.allowed_origins.is_none());
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:3011".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr.port(), 3011);
    }

    #[test]
    fn test_builder_bind() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let config = ServerConfig::default().bind(addr);

        assert_eq!(config.bind_addr, addr);
    }

    #[test]
    fn test_builder_max_connections() {
        let config = ServerConfig::default().max_connections(100);

        assert_eq!(config.max_connections, 100);
    }

    #[test]
    fn test_builder_tcp_nodelay() {
        let config = ServerConfig::default().tcp_nodelay(false);

        assert!(!config.tcp_nodelay);
    }

    #[test]
    fn test_builder_allowed_origins() {
        let config =
            ServerConfig::default().allowed_origins(vec!["http://localhost:5173".to_string()]);

        assert_eq!(
            config.allowed_origins,
            Some(vec!["http://localhost:5173".to_string()])
        );
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:3010".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .max_connections(50)
            .tcp_nodelay(false)
            .allowed_origins(vec!["https://watch.example".to_string()]);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_connections, 50);
        assert!(!config.tcp_nodelay);
        assert!(config.allowed_origins.is_some());
    }

    #[test]
    fn test_origin_allowed_permissive_by_default() {
        let config = ServerConfig::default();

        assert!(config.origin_allowed(None));
        assert!(config.origin_allowed(Some("http://anywhere.example")));
    }

    #[test]
    fn test_origin_allowlist() {
        let config =
            ServerConfig::default().allowed_origins(vec!["https://watch.example".to_string()]);

        assert!(config.origin_allowed(Some("https://watch.example")));
        assert!(!config.origin_allowed(Some("https://evil.example")));
        // Non-browser clients carry no Origin header
        assert!(config.origin_allowed(None));
    }
}
