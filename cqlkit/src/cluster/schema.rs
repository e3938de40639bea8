use crate::cluster::statement::validate_identifier;
use crate::errors::ClientError;
use crate::types::{ColumnDef, ReplicationPolicy};

impl ReplicationPolicy {
    /// Reject policies that the server would refuse or that would replicate
    /// nowhere. Datacenter names travel into DDL text, so they are held to
    /// the same identifier rules as everything else.
    pub fn validate(&self) -> Result<(), ClientError> {
        match self {
            ReplicationPolicy::Simple { replication_factor } => {
                if *replication_factor == 0 {
                    return Err(ClientError::Schema(
                        "replication factor must be at least 1".to_string(),
                    ));
                }
            }
            ReplicationPolicy::NetworkAware { datacenters } => {
                if datacenters.is_empty() {
                    return Err(ClientError::Schema(
                        "network-aware replication requires at least one datacenter".to_string(),
                    ));
                }
                for (datacenter, factor) in datacenters {
                    validate_identifier(datacenter).map_err(ClientError::Schema)?;
                    if *factor == 0 {
                        return Err(ClientError::Schema(format!(
                            "replication factor for datacenter '{}' must be at least 1",
                            datacenter
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn to_cql(&self) -> String {
        match self {
            ReplicationPolicy::Simple { replication_factor } => format!(
                "{{'class': 'SimpleStrategy', 'replication_factor': {}}}",
                replication_factor
            ),
            ReplicationPolicy::NetworkAware { datacenters } => {
                let factors: Vec<String> = datacenters
                    .iter()
                    .map(|(datacenter, factor)| format!("'{}': {}", datacenter, factor))
                    .collect();
                format!(
                    "{{'class': 'NetworkTopologyStrategy', {}}}",
                    factors.join(", ")
                )
            }
        }
    }
}

/// `CREATE KEYSPACE IF NOT EXISTS ...` — safe to issue repeatedly for the
/// same (name, policy).
pub fn create_keyspace_cql(name: &str, policy: &ReplicationPolicy) -> Result<String, ClientError> {
    validate_identifier(name).map_err(ClientError::Schema)?;
    policy.validate()?;
    Ok(format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {}",
        name,
        policy.to_cql()
    ))
}

/// `CREATE TABLE IF NOT EXISTS ...` with an explicit PRIMARY KEY clause.
/// Definitions are validated before any text exists; a malformed column can
/// never produce malformed DDL.
pub fn create_table_cql(
    keyspace: &str,
    table: &str,
    columns: &[ColumnDef],
) -> Result<String, ClientError> {
    validate_identifier(keyspace).map_err(ClientError::Schema)?;
    validate_identifier(table).map_err(ClientError::Schema)?;
    if columns.is_empty() {
        return Err(ClientError::Schema(
            "table requires at least one column".to_string(),
        ));
    }
    for (index, column) in columns.iter().enumerate() {
        validate_identifier(&column.name).map_err(ClientError::Schema)?;
        if columns[..index].iter().any(|c| c.name == column.name) {
            return Err(ClientError::Schema(format!(
                "duplicate column '{}' in table definition",
                column.name
            )));
        }
    }
    let key_columns: Vec<&str> = columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.as_str())
        .collect();
    if key_columns.is_empty() {
        return Err(ClientError::Schema(
            "table requires at least one primary key column".to_string(),
        ));
    }

    let definitions: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.cql_type.cql_name()))
        .collect();
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {}.{} ({}, PRIMARY KEY ({}))",
        keyspace,
        table,
        definitions.join(", "),
        key_columns.join(", ")
    ))
}
