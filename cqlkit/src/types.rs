use scylla::frame::response::result::CqlValue;
use scylla::frame::value::CqlTimestamp;
use scylla::statement::Consistency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Minimum replica acknowledgment required for an operation. Chosen per
/// operation before it is issued and immutable for that operation's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    Any,
    #[default]
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
}

impl From<ConsistencyLevel> for Consistency {
    fn from(level: ConsistencyLevel) -> Self {
        match level {
            ConsistencyLevel::Any => Consistency::Any,
            ConsistencyLevel::One => Consistency::One,
            ConsistencyLevel::Two => Consistency::Two,
            ConsistencyLevel::Three => Consistency::Three,
            ConsistencyLevel::Quorum => Consistency::Quorum,
            ConsistencyLevel::All => Consistency::All,
            ConsistencyLevel::LocalQuorum => Consistency::LocalQuorum,
            ConsistencyLevel::EachQuorum => Consistency::EachQuorum,
            ConsistencyLevel::LocalOne => Consistency::LocalOne,
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsistencyLevel::Any => "ANY",
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Two => "TWO",
            ConsistencyLevel::Three => "THREE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::All => "ALL",
            ConsistencyLevel::LocalQuorum => "LOCAL_QUORUM",
            ConsistencyLevel::EachQuorum => "EACH_QUORUM",
            ConsistencyLevel::LocalOne => "LOCAL_ONE",
        };
        write!(f, "{}", name)
    }
}

/// Replication policy attached to a keyspace at creation. Immutable once
/// chosen; validated before any DDL text is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum ReplicationPolicy {
    Simple {
        replication_factor: u32,
    },
    NetworkAware {
        datacenters: BTreeMap<String, u32>,
    },
}

impl ReplicationPolicy {
    pub fn simple(replication_factor: u32) -> Self {
        ReplicationPolicy::Simple { replication_factor }
    }

    pub fn network_aware(datacenters: BTreeMap<String, u32>) -> Self {
        ReplicationPolicy::NetworkAware { datacenters }
    }
}

/// A typed value bound into a statement or decoded from a result row.
/// Values pass through without implicit coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValue {
    Text(String),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Blob(Vec<u8>),
    Uuid(Uuid),
    Timestamp(i64),
    Null,
}

impl ColumnValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ColumnValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Driver-side representation for binding; `Null` binds as an unset
    /// optional.
    pub(crate) fn to_cql(&self) -> Option<CqlValue> {
        match self {
            ColumnValue::Text(v) => Some(CqlValue::Text(v.clone())),
            ColumnValue::Int(v) => Some(CqlValue::Int(*v)),
            ColumnValue::BigInt(v) => Some(CqlValue::BigInt(*v)),
            ColumnValue::Float(v) => Some(CqlValue::Float(*v)),
            ColumnValue::Double(v) => Some(CqlValue::Double(*v)),
            ColumnValue::Boolean(v) => Some(CqlValue::Boolean(*v)),
            ColumnValue::Blob(v) => Some(CqlValue::Blob(v.clone())),
            ColumnValue::Uuid(v) => Some(CqlValue::Uuid(*v)),
            ColumnValue::Timestamp(millis) => Some(CqlValue::Timestamp(CqlTimestamp(*millis))),
            ColumnValue::Null => None,
        }
    }

    pub(crate) fn from_cql(value: Option<&CqlValue>) -> Self {
        let Some(value) = value else {
            return ColumnValue::Null;
        };
        match value {
            CqlValue::Text(v) => ColumnValue::Text(v.clone()),
            CqlValue::Ascii(v) => ColumnValue::Text(v.clone()),
            CqlValue::Int(v) => ColumnValue::Int(*v),
            CqlValue::SmallInt(v) => ColumnValue::Int(i32::from(*v)),
            CqlValue::TinyInt(v) => ColumnValue::Int(i32::from(*v)),
            CqlValue::BigInt(v) => ColumnValue::BigInt(*v),
            CqlValue::Float(v) => ColumnValue::Float(*v),
            CqlValue::Double(v) => ColumnValue::Double(*v),
            CqlValue::Boolean(v) => ColumnValue::Boolean(*v),
            CqlValue::Blob(v) => ColumnValue::Blob(v.clone()),
            CqlValue::Uuid(v) => ColumnValue::Uuid(*v),
            CqlValue::Timestamp(v) => ColumnValue::Timestamp(v.0),
            CqlValue::Inet(v) => ColumnValue::Text(v.to_string()),
            // Collections and exotic numerics are outside the data model.
            _ => ColumnValue::Null,
        }
    }
}

/// One result row: an ordered mapping from column name to typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct RowData {
    columns: Vec<(String, ColumnValue)>,
}

impl RowData {
    pub fn new(columns: Vec<(String, ColumnValue)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> &[(String, ColumnValue)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// CQL column types the client models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CqlType {
    Int,
    BigInt,
    Text,
    Boolean,
    Float,
    Double,
    Blob,
    Uuid,
    Timestamp,
}

impl CqlType {
    pub fn cql_name(&self) -> &'static str {
        match self {
            CqlType::Int => "int",
            CqlType::BigInt => "bigint",
            CqlType::Text => "text",
            CqlType::Boolean => "boolean",
            CqlType::Float => "float",
            CqlType::Double => "double",
            CqlType::Blob => "blob",
            CqlType::Uuid => "uuid",
            CqlType::Timestamp => "timestamp",
        }
    }
}

/// Column definition for `create_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub cql_type: CqlType,
    pub primary_key: bool,
}

impl ColumnDef {
    pub fn partition_key(name: impl Into<String>, cql_type: CqlType) -> Self {
        Self {
            name: name.into(),
            cql_type,
            primary_key: true,
        }
    }

    pub fn regular(name: impl Into<String>, cql_type: CqlType) -> Self {
        Self {
            name: name.into(),
            cql_type,
            primary_key: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_maps_to_driver_levels() {
        assert_eq!(
            Consistency::from(ConsistencyLevel::Quorum),
            Consistency::Quorum
        );
        assert_eq!(Consistency::from(ConsistencyLevel::One), Consistency::One);
        assert_eq!(ConsistencyLevel::default(), ConsistencyLevel::One);
    }

    #[test]
    fn consistency_display_uses_cql_names() {
        assert_eq!(ConsistencyLevel::LocalQuorum.to_string(), "LOCAL_QUORUM");
        assert_eq!(ConsistencyLevel::One.to_string(), "ONE");
    }

    #[test]
    fn column_value_round_trips_through_cql() {
        let values = vec![
            ColumnValue::Int(1),
            ColumnValue::Text("xiguan".to_string()),
            ColumnValue::BigInt(-5),
            ColumnValue::Boolean(true),
            ColumnValue::Uuid(Uuid::nil()),
            ColumnValue::Timestamp(1_700_000_000_000),
        ];
        for value in values {
            let cql = value.to_cql();
            assert_eq!(ColumnValue::from_cql(cql.as_ref()), value);
        }
    }

    #[test]
    fn null_binds_as_unset_option() {
        assert_eq!(ColumnValue::Null.to_cql(), None);
        assert_eq!(ColumnValue::from_cql(None), ColumnValue::Null);
    }

    #[test]
    fn narrow_integers_widen_on_decode() {
        assert_eq!(
            ColumnValue::from_cql(Some(&CqlValue::SmallInt(7))),
            ColumnValue::Int(7)
        );
        assert_eq!(
            ColumnValue::from_cql(Some(&CqlValue::TinyInt(-3))),
            ColumnValue::Int(-3)
        );
    }

    #[test]
    fn row_data_preserves_order_and_lookup() {
        let row = RowData::new(vec![
            ("id".to_string(), ColumnValue::Int(1)),
            ("name".to_string(), ColumnValue::Text("xiguan".to_string())),
        ]);
        assert_eq!(row.get("id"), Some(&ColumnValue::Int(1)));
        assert_eq!(row.get("name").and_then(ColumnValue::as_text), Some("xiguan"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.columns()[0].0, "id");
        assert_eq!(row.len(), 2);
    }
}
