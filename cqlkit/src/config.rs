use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for a cluster handle. Seeds may be bare hosts
/// (the `port` field applies) or explicit `host:port` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub seeds: Vec<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub pool_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seeds: vec!["127.0.0.1".to_string()],
            port: 9042,
            username: None,
            password: None,
            connect_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            pool_size: 4,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Bound on every round-trip; the server side has no default.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Seed list normalized to `host:port` contact points.
    pub fn contact_points(&self) -> Vec<String> {
        self.seeds
            .iter()
            .map(|host| {
                if host.contains(':') {
                    host.clone()
                } else {
                    format!("{}:{}", host, self.port)
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.contact_points(), vec!["127.0.0.1:9042".to_string()]);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn explicit_port_in_seed_wins() {
        let config = ClientConfig {
            seeds: vec!["10.0.0.1:19042".to_string(), "10.0.0.2".to_string()],
            port: 9042,
            ..ClientConfig::default()
        };
        assert_eq!(
            config.contact_points(),
            vec!["10.0.0.1:19042".to_string(), "10.0.0.2:9042".to_string()]
        );
    }
}
