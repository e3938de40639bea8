use std::collections::BTreeMap;
use tracing::{debug, warn};

use cqlkit::cluster::ClusterTopology;
use cqlkit::{
    measure, ClientError, ClusterClient, ColumnDef, ColumnValue, CqlType, ReplicationPolicy,
    RowData,
};

use crate::config::{SimpleClientConfig, WorkloadConfig};

/// Rows loaded by the demonstration workload.
const DEMO_ROWS: &[(i32, &str)] = &[(1, "xiguan"), (2, "qinjin"), (3, "yingliu")];

/// The fixed demo sequence: connect, report topology, create schema, insert
/// the demo rows, read them back. Any failure aborts the remaining steps; a
/// failed insert never proceeds to the read.
pub async fn run(config: &SimpleClientConfig) -> Result<(), ClientError> {
    let client = ClusterClient::connect(&config.cluster).await?;
    let topology = client.topology().clone();
    println!("Connected to cluster: {}", topology.cluster_name);
    for node in &topology.nodes {
        println!(
            "Datacenter: {}; Host: {}; Rack: {}",
            node.datacenter, node.address, node.rack
        );
    }

    let workload = &config.workload;
    let policy = replication_policy(workload, &topology);
    debug!(policy = ?policy, "resolved replication policy");
    client.create_keyspace(&workload.keyspace, &policy).await?;

    let columns = [
        ColumnDef::partition_key("id", CqlType::Int),
        ColumnDef::regular("name", CqlType::Text),
    ];
    client
        .create_table(&workload.keyspace, &workload.table, &columns)
        .await?;

    let write = measure(load_rows(&client, workload)).await;
    let write_millis = write.millis();
    write.value?;

    let read = measure(client.select(
        &workload.keyspace,
        &workload.table,
        workload.read_consistency,
    ))
    .await;
    let read_millis = read.millis();
    let rows: Vec<RowData> = read.value?.collect();

    for row in &rows {
        println!("{}", format_row(row)?);
    }
    println!("Write {} values, duration: {}", DEMO_ROWS.len(), write_millis);
    println!("Read {} values, duration: {}", rows.len(), read_millis);
    debug!(metrics = %cqlkit::metrics::render(), "end-of-run metrics");

    client.close()?;
    Ok(())
}

async fn load_rows(client: &ClusterClient, workload: &WorkloadConfig) -> Result<(), ClientError> {
    for (id, name) in DEMO_ROWS {
        client
            .insert(
                &workload.keyspace,
                &workload.table,
                &["id", "name"],
                &[
                    ColumnValue::Int(*id),
                    ColumnValue::Text((*name).to_string()),
                ],
                workload.write_consistency,
            )
            .await?;
    }
    Ok(())
}

/// Explicit datacenter factors win; otherwise, under network topology, the
/// configured factor applies to each discovered datacenter.
fn replication_policy(workload: &WorkloadConfig, topology: &ClusterTopology) -> ReplicationPolicy {
    if !workload.network_topology {
        return ReplicationPolicy::simple(workload.replication_factor);
    }
    if let Some(datacenters) = &workload.datacenters {
        if !datacenters.is_empty() {
            return ReplicationPolicy::network_aware(datacenters.clone());
        }
    }
    let discovered = topology.datacenters();
    if discovered.is_empty() {
        warn!("no datacenters discovered; falling back to simple replication");
        return ReplicationPolicy::simple(workload.replication_factor);
    }
    let datacenters: BTreeMap<String, u32> = discovered
        .into_iter()
        .map(|datacenter| (datacenter, workload.replication_factor))
        .collect();
    ReplicationPolicy::network_aware(datacenters)
}

fn format_row(row: &RowData) -> Result<String, ClientError> {
    let id = row
        .get("id")
        .and_then(ColumnValue::as_int)
        .ok_or_else(|| ClientError::Read("row is missing int column 'id'".to_string()))?;
    let name = row
        .get("name")
        .and_then(ColumnValue::as_text)
        .ok_or_else(|| ClientError::Read("row is missing text column 'name'".to_string()))?;
    Ok(format!("Id: {}, name: {}", id, name))
}
