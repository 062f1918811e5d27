//! Registry configuration

use std::time::Duration;

/// Configuration for the room registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How often the reaper sweeps for empty rooms
    ///
    /// A room with no members survives until the next sweep, so a client
    /// that reconnects within this window still finds the cached state.
    pub reaper_interval: Duration,

    /// Depth of each connection's outbound frame queue
    ///
    /// When a recipient's queue is full, frames for that recipient are
    /// dropped rather than blocking the sender.
    pub outbound_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reaper_interval: Duration::from_secs(10),
            outbound_capacity: 64,
        }
    }
}

impl RegistryConfig {
    /// Set the reaper sweep interval
    pub fn reaper_interval(mut self, interval: Duration) -> Self {
        self.reaper_interval = interval;
        self
    }

    /// Set the per-connection outbound queue depth
    pub fn outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.reaper_interval, Duration::from_secs(10));
        assert_eq!(config.outbound_capacity, 64);
    }

    #[test]
    fn test_builder_reaper_interval() {
        let config = RegistryConfig::default().reaper_interval(Duration::from_millis(500));

        assert_eq!(config.reaper_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_builder_outbound_capacity() {
        let config = RegistryConfig::default().outbound_capacity(128);

        assert_eq!(config.outbound_capacity, 128);
    }

    #[test]
    fn test_builder_outbound_capacity_floor() {
        // A zero-capacity queue could never deliver anything
        let config = RegistryConfig::default().outbound_capacity(0);

        assert_eq!(config.outbound_capacity, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .reaper_interval(Duration::from_secs(30))
            .outbound_capacity(16);

        assert_eq!(config.reaper_interval, Duration::from_secs(30));
        assert_eq!(config.outbound_capacity, 16);
    }
}
