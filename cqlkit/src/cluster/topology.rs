use scylla::Session;
use std::net::IpAddr;
use tracing::debug;

use crate::errors::ClientError;

/// One cluster member as reported by the seed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub address: IpAddr,
    pub datacenter: String,
    pub rack: String,
}

/// Cluster metadata resolved from the seed at connect time. The seed's own
/// entry always comes first.
#[derive(Debug, Clone)]
pub struct ClusterTopology {
    pub cluster_name: String,
    pub nodes: Vec<NodeInfo>,
}

impl ClusterTopology {
    /// Distinct datacenter names, sorted.
    pub fn datacenters(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .nodes
            .iter()
            .map(|node| node.datacenter.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

const LOCAL_CQL: &str = "SELECT cluster_name, data_center, rack, rpc_address FROM system.local";
const PEERS_CQL: &str = "SELECT rpc_address, data_center, rack FROM system.peers";

fn malformed(detail: &str) -> ClientError {
    ClientError::Connection(format!("malformed topology: {}", detail))
}

/// Resolve cluster name and membership from the seed's system tables. Any
/// failure here fails the connect; a handle is never returned with partial
/// topology.
pub(crate) async fn fetch(session: &Session) -> Result<ClusterTopology, ClientError> {
    let local = session
        .query_unpaged(LOCAL_CQL, ())
        .await
        .map_err(|e| ClientError::Connection(format!("topology fetch failed: {}", e)))?;
    let mut local_rows = local
        .rows_typed::<(String, Option<String>, Option<String>, Option<IpAddr>)>()
        .map_err(|e| malformed(&e.to_string()))?;

    let (cluster_name, datacenter, rack, address) = local_rows
        .next()
        .ok_or_else(|| malformed("system.local returned no rows"))?
        .map_err(|e| malformed(&e.to_string()))?;

    let mut nodes = vec![NodeInfo {
        address: address.ok_or_else(|| malformed("seed has no rpc_address"))?,
        datacenter: datacenter.ok_or_else(|| malformed("seed has no datacenter"))?,
        rack: rack.ok_or_else(|| malformed("seed has no rack"))?,
    }];

    let peers = session
        .query_unpaged(PEERS_CQL, ())
        .await
        .map_err(|e| ClientError::Connection(format!("topology fetch failed: {}", e)))?;
    let peer_rows = peers
        .rows_typed::<(Option<IpAddr>, Option<String>, Option<String>)>()
        .map_err(|e| malformed(&e.to_string()))?;
    for peer in peer_rows {
        let (address, datacenter, rack) = peer.map_err(|e| malformed(&e.to_string()))?;
        nodes.push(NodeInfo {
            address: address.ok_or_else(|| malformed("peer has no rpc_address"))?,
            datacenter: datacenter.ok_or_else(|| malformed("peer has no datacenter"))?,
            rack: rack.ok_or_else(|| malformed("peer has no rack"))?,
        });
    }

    debug!(cluster = %cluster_name, nodes = nodes.len(), "resolved cluster topology");
    Ok(ClusterTopology {
        cluster_name,
        nodes,
    })
}
