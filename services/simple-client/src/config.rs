use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use cqlkit::config::{ClientConfig, ObservabilityConfig};
use cqlkit::types::ConsistencyLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleClientConfig {
    pub cluster: ClientConfig,
    pub workload: WorkloadConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub keyspace: String,
    pub table: String,
    pub network_topology: bool,
    pub replication_factor: u32,
    /// Explicit per-datacenter factors; when absent under network topology,
    /// the replication factor is applied to each discovered datacenter.
    pub datacenters: Option<BTreeMap<String, u32>>,
    pub write_consistency: ConsistencyLevel,
    pub read_consistency: ConsistencyLevel,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            keyspace: "demo".to_string(),
            table: "names".to_string(),
            network_topology: false,
            replication_factor: 1,
            datacenters: None,
            write_consistency: ConsistencyLevel::One,
            read_consistency: ConsistencyLevel::One,
        }
    }
}

/// Layered load: optional file, then `SIMPLE_CLIENT_*` environment
/// overrides. CLI flags are applied on top by the caller.
pub fn load_config(path: Option<&str>) -> Result<SimpleClientConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path));
    }
    let config = builder
        .add_source(Environment::with_prefix("SIMPLE_CLIENT"))
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Parse `NAME=FACTOR` datacenter specs from the command line.
pub fn parse_datacenters(specs: &[String]) -> Result<BTreeMap<String, u32>> {
    let mut datacenters = BTreeMap::new();
    for spec in specs {
        let (name, factor) = spec
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid datacenter spec '{}', expected NAME=FACTOR", spec))?;
        let factor: u32 = factor
            .trim()
            .parse()
            .with_context(|| format!("invalid replication factor in '{}'", spec))?;
        datacenters.insert(name.trim().to_string(), factor);
    }
    Ok(datacenters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_workload() {
        let config = SimpleClientConfig::default();
        assert_eq!(config.workload.keyspace, "demo");
        assert_eq!(config.workload.table, "names");
        assert_eq!(config.workload.replication_factor, 1);
        assert!(!config.workload.network_topology);
        assert_eq!(config.workload.write_consistency, ConsistencyLevel::One);
        assert_eq!(config.workload.read_consistency, ConsistencyLevel::One);
    }

    #[test]
    fn parses_datacenter_specs() {
        let specs = vec!["dc1=2".to_string(), "dc2 = 3".to_string()];
        let datacenters = parse_datacenters(&specs).unwrap();
        assert_eq!(datacenters.get("dc1"), Some(&2));
        assert_eq!(datacenters.get("dc2"), Some(&3));
    }

    #[test]
    fn rejects_malformed_datacenter_specs() {
        assert!(parse_datacenters(&["dc1".to_string()]).is_err());
        assert!(parse_datacenters(&["dc1=two".to_string()]).is_err());
    }

    #[test]
    fn load_without_file_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.cluster.port, 9042);
        assert_eq!(config.workload.keyspace, "demo");
    }
}
