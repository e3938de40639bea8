use dashmap::DashMap;
use parking_lot::RwLock;
use scylla::frame::response::result::Row as DriverRow;
use scylla::query::Query;
use scylla::statement::Consistency;
use scylla::transport::errors::{DbError, QueryError};
use scylla::transport::execution_profile::ExecutionProfile;
use scylla::transport::session::PoolSize;
use scylla::{Session, SessionBuilder};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cluster::retry::RetryPolicy;
use crate::cluster::schema;
use crate::cluster::statement::StatementBuilder;
use crate::cluster::topology::{self, ClusterTopology};
use crate::config::ClientConfig;
use crate::errors::{self, ClientError};
use crate::metrics;
use crate::types::{ColumnDef, ColumnValue, ConsistencyLevel, ReplicationPolicy, RowData};

/// Holds the live session for a handle. `Connected` while occupied; `take`
/// moves the handle into its terminal `Closed` state.
struct SessionSlot<S> {
    inner: RwLock<Option<S>>,
}

impl<S: Clone> SessionSlot<S> {
    fn new(session: S) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }

    fn get(&self) -> Result<S, ClientError> {
        self.inner
            .read()
            .as_ref()
            .cloned()
            .ok_or(ClientError::UseAfterClose)
    }

    fn take(&self) -> Result<S, ClientError> {
        self.inner.write().take().ok_or(ClientError::AlreadyClosed)
    }

    fn is_closed(&self) -> bool {
        self.inner.read().is_none()
    }
}

/// A finite, lazily-decoded sequence of result rows. Not restartable: a new
/// `select` call re-executes the statement.
pub struct RowSet {
    columns: Vec<String>,
    rows: std::vec::IntoIter<DriverRow>,
}

impl RowSet {
    fn new(columns: Vec<String>, rows: Vec<DriverRow>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }
}

impl Iterator for RowSet {
    type Item = RowData;

    fn next(&mut self) -> Option<RowData> {
        let row = self.rows.next()?;
        let decoded = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let value = row.columns.get(index).and_then(|v| v.as_ref());
                (name.clone(), ColumnValue::from_cql(value))
            })
            .collect();
        Some(RowData::new(decoded))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for RowSet {}

/// Handle to a cluster: owns the driver session, the topology resolved at
/// connect time, and the per-keyspace DDL locks.
///
/// Lifecycle is `Unconnected -> Connected -> Closed`: [`ClusterClient::connect`]
/// is the only constructor, every operation requires the connected state, and
/// [`ClusterClient::close`] is terminal. Operations after close fail with
/// [`ClientError::UseAfterClose`]; a second close fails with
/// [`ClientError::AlreadyClosed`].
pub struct ClusterClient {
    slot: SessionSlot<Arc<Session>>,
    topology: ClusterTopology,
    config: ClientConfig,
    ddl_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ClusterClient {
    /// Connect to the cluster through the configured seeds and resolve its
    /// topology. Fails with [`ClientError::Connection`] if no seed is
    /// reachable or the topology is malformed; no partial handle is returned.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.seeds.is_empty() {
            return Err(ClientError::Connection(
                "at least one seed address is required".to_string(),
            ));
        }
        let contact_points = config.contact_points();
        info!("Connecting to cluster seeds: {:?}", contact_points);

        let pool_size =
            NonZeroUsize::new(config.pool_size as usize).unwrap_or(NonZeroUsize::MIN);
        let profile = ExecutionProfile::builder()
            .request_timeout(Some(config.request_timeout()))
            .consistency(Consistency::One)
            .build();

        let mut builder = SessionBuilder::new()
            .known_nodes(&contact_points)
            .connection_timeout(config.connect_timeout())
            .pool_size(PoolSize::PerShard(pool_size))
            .default_execution_profile_handle(profile.into_handle());
        if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
            builder = builder.user(username, password);
        }

        let session = RetryPolicy::default()
            .execute(|| builder.build())
            .await
            .map_err(|e| ClientError::Connection(format!("failed to connect: {}", e)))?;
        let session = Arc::new(session);

        let topology = topology::fetch(&session).await?;
        info!("Connected to cluster: {}", topology.cluster_name);
        for node in &topology.nodes {
            info!(
                "Datacenter: {}; Host: {}; Rack: {}",
                node.datacenter, node.address, node.rack
            );
        }
        metrics::set_known_nodes(topology.nodes.len());

        Ok(Self {
            slot: SessionSlot::new(session),
            topology,
            config: config.clone(),
            ddl_locks: DashMap::new(),
        })
    }

    /// Topology resolved from the seed at connect time.
    pub fn topology(&self) -> &ClusterTopology {
        &self.topology
    }

    pub fn is_closed(&self) -> bool {
        self.slot.is_closed()
    }

    /// Release all connections. Terminal: the first close wins, a second
    /// close reports [`ClientError::AlreadyClosed`].
    pub fn close(&self) -> Result<(), ClientError> {
        let session = self.slot.take()?;
        drop(session);
        info!("Cluster handle closed");
        Ok(())
    }

    /// Liveness probe against the connected node.
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let session = self.slot.get()?;
        session
            .query_unpaged("SELECT now() FROM system.local", ())
            .await
            .map_err(|e| ClientError::Connection(format!("health check failed: {}", e)))?;
        Ok(())
    }

    /// Create a keyspace with the given replication policy. Idempotent for
    /// repeated calls with the same arguments.
    pub async fn create_keyspace(
        &self,
        name: &str,
        policy: &ReplicationPolicy,
    ) -> Result<(), ClientError> {
        let session = self.slot.get()?;
        let cql = schema::create_keyspace_cql(name, policy)?;
        let lock = self.ddl_lock(name);
        let _guard = lock.lock().await;

        debug!(keyspace = %name, "creating keyspace");
        let started = Instant::now();
        let result = session.query_unpaged(self.ddl_statement(cql), ()).await;
        metrics::record_operation("create_keyspace", result.is_ok(), started.elapsed().as_secs_f64());
        Self::finish_ddl(result)
    }

    /// Create a table from validated column definitions. Idempotent.
    pub async fn create_table(
        &self,
        keyspace: &str,
        table: &str,
        columns: &[ColumnDef],
    ) -> Result<(), ClientError> {
        let session = self.slot.get()?;
        let cql = schema::create_table_cql(keyspace, table, columns)?;
        let lock = self.ddl_lock(keyspace);
        let _guard = lock.lock().await;

        debug!(keyspace = %keyspace, table = %table, "creating table");
        let started = Instant::now();
        let result = session.query_unpaged(self.ddl_statement(cql), ()).await;
        metrics::record_operation("create_table", result.is_ok(), started.elapsed().as_secs_f64());
        Self::finish_ddl(result)
    }

    /// Insert one row at the requested write consistency. Columns and values
    /// must pair up exactly; values are bound, never spliced into the
    /// statement text.
    pub async fn insert(
        &self,
        keyspace: &str,
        table: &str,
        columns: &[&str],
        values: &[ColumnValue],
        consistency: ConsistencyLevel,
    ) -> Result<(), ClientError> {
        let session = self.slot.get()?;
        let cql = StatementBuilder::insert(keyspace, table, columns, values.len())?;
        let bound: Vec<_> = values.iter().map(ColumnValue::to_cql).collect();

        debug!(keyspace = %keyspace, table = %table, consistency = %consistency, "insert");
        let started = Instant::now();
        let result = session
            .query_unpaged(self.statement(cql, consistency), bound)
            .await;
        metrics::record_operation("insert", result.is_ok(), started.elapsed().as_secs_f64());
        result.map_err(errors::classify_write_error)?;
        Ok(())
    }

    /// Read every row of a table at the requested read consistency.
    pub async fn select(
        &self,
        keyspace: &str,
        table: &str,
        consistency: ConsistencyLevel,
    ) -> Result<RowSet, ClientError> {
        let session = self.slot.get()?;
        let cql = StatementBuilder::select(keyspace, table)?;

        debug!(keyspace = %keyspace, table = %table, consistency = %consistency, "select");
        let started = Instant::now();
        let result = session
            .query_unpaged(self.statement(cql, consistency), ())
            .await;
        metrics::record_operation("select", result.is_ok(), started.elapsed().as_secs_f64());
        let result = result.map_err(errors::classify_read_error)?;

        let columns: Vec<String> = result
            .col_specs()
            .iter()
            .map(|spec| spec.name.clone())
            .collect();
        let rows = result.rows_or_empty();
        Ok(RowSet::new(columns, rows))
    }

    fn statement(&self, cql: String, consistency: ConsistencyLevel) -> Query {
        let mut query = Query::new(cql);
        query.set_consistency(consistency.into());
        query.set_request_timeout(Some(self.config.request_timeout()));
        query
    }

    fn ddl_statement(&self, cql: String) -> Query {
        let mut query = Query::new(cql);
        query.set_request_timeout(Some(self.config.request_timeout()));
        query
    }

    /// Concurrent DDL against the same keyspace is serialized; idempotence
    /// only covers repetition, not interleaving of conflicting definitions.
    fn ddl_lock(&self, keyspace: &str) -> Arc<Mutex<()>> {
        self.ddl_locks
            .entry(keyspace.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn finish_ddl(result: Result<scylla::QueryResult, QueryError>) -> Result<(), ClientError> {
        match result {
            Ok(_) => Ok(()),
            // IF NOT EXISTS races can still surface this; it is the
            // idempotent outcome, not a failure.
            Err(QueryError::DbError(DbError::AlreadyExists { .. }, _)) => Ok(()),
            Err(err) => Err(errors::classify_schema_error(err)),
        }
    }
}
