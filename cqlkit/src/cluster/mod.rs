pub mod connection;
pub mod retry;
pub mod schema;
pub mod statement;
pub mod topology;

pub use connection::{ClusterClient, RowSet};
pub use retry::RetryPolicy;
pub use statement::StatementBuilder;
pub use topology::{ClusterTopology, NodeInfo};
