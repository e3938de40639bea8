mod config;
mod runner;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::SimpleClientConfig;

#[derive(Parser, Debug)]
#[command(name = "simple-client")]
#[command(about = "Cluster demo client: create schema, insert rows, read them back with tunable consistency")]
struct Args {
    /// Seed node to contact (host or host:port); repeat for multiple seeds
    #[arg(short, long)]
    seed: Vec<String>,

    /// Native protocol port for seeds given without one
    #[arg(long)]
    port: Option<u16>,

    /// Use datacenter-aware (NetworkTopologyStrategy) replication
    #[arg(long)]
    network_topology: bool,

    /// Replication factor (applied per datacenter under --network-topology)
    #[arg(short, long)]
    replication_factor: Option<u32>,

    /// Explicit per-datacenter factors, e.g. dc1=2,dc2=2 (implies --network-topology)
    #[arg(long, value_delimiter = ',')]
    datacenters: Vec<String>,

    /// Keyspace to create and use
    #[arg(short, long)]
    keyspace: Option<String>,

    /// Table to create and use
    #[arg(short, long)]
    table: Option<String>,

    /// Config file; flags override its values
    #[arg(short, long)]
    config: Option<String>,
}

fn apply_args(config: &mut SimpleClientConfig, args: &Args) -> Result<()> {
    if !args.seed.is_empty() {
        config.cluster.seeds = args.seed.clone();
    }
    if let Some(port) = args.port {
        config.cluster.port = port;
    }
    if args.network_topology {
        config.workload.network_topology = true;
    }
    if let Some(factor) = args.replication_factor {
        config.workload.replication_factor = factor;
    }
    if !args.datacenters.is_empty() {
        config.workload.datacenters = Some(config::parse_datacenters(&args.datacenters)?);
        config.workload.network_topology = true;
    }
    if let Some(ref keyspace) = args.keyspace {
        config.workload.keyspace = keyspace.clone();
    }
    if let Some(ref table) = args.table {
        config.workload.table = table.clone();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = config::load_config(args.config.as_deref())?;
    apply_args(&mut config, &args)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "simple_client={level},cqlkit={level}",
                    level = config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting simple-client against seeds {:?}", config.cluster.seeds);
    runner::run(&config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_values() {
        let args = Args::parse_from([
            "simple-client",
            "--seed",
            "10.0.0.1",
            "--seed",
            "10.0.0.2:19042",
            "--network-topology",
            "--replication-factor",
            "3",
            "--keyspace",
            "bench",
            "--table",
            "people",
        ]);
        let mut config = SimpleClientConfig::default();
        apply_args(&mut config, &args).unwrap();

        assert_eq!(config.cluster.seeds, vec!["10.0.0.1", "10.0.0.2:19042"]);
        assert!(config.workload.network_topology);
        assert_eq!(config.workload.replication_factor, 3);
        assert_eq!(config.workload.keyspace, "bench");
        assert_eq!(config.workload.table, "people");
    }

    #[test]
    fn explicit_datacenters_imply_network_topology() {
        let args = Args::parse_from(["simple-client", "--datacenters", "dc1=2,dc2=2"]);
        let mut config = SimpleClientConfig::default();
        apply_args(&mut config, &args).unwrap();

        assert!(config.workload.network_topology);
        let datacenters = config.workload.datacenters.unwrap();
        assert_eq!(datacenters.len(), 2);
        assert_eq!(datacenters.get("dc1"), Some(&2));
    }

    #[test]
    fn absent_flags_leave_config_untouched() {
        let args = Args::parse_from(["simple-client"]);
        let mut config = SimpleClientConfig::default();
        apply_args(&mut config, &args).unwrap();

        assert_eq!(config.cluster.seeds, vec!["127.0.0.1"]);
        assert_eq!(config.workload.keyspace, "demo");
        assert!(!config.workload.network_topology);
    }
}
