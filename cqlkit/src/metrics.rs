use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder, HistogramVec,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    pub static ref CLUSTER_OPERATION_DURATION: HistogramVec = register_histogram_vec!(
        "cluster_operation_duration_seconds",
        "Cluster operation duration in seconds",
        &["operation", "status"]
    )
    .unwrap();
    pub static ref OPERATION_COUNTER: IntCounterVec = register_int_counter_vec!(
        "cluster_operations_total",
        "Total number of cluster operations",
        &["operation", "status"]
    )
    .unwrap();
    pub static ref KNOWN_NODES: IntGauge = register_int_gauge!(
        "cluster_known_nodes",
        "Number of nodes discovered in the connected cluster"
    )
    .unwrap();
}

pub fn record_operation(operation: &str, success: bool, duration: f64) {
    let status = if success { "success" } else { "failure" };
    CLUSTER_OPERATION_DURATION
        .with_label_values(&[operation, status])
        .observe(duration);
    OPERATION_COUNTER
        .with_label_values(&[operation, status])
        .inc();
}

pub fn set_known_nodes(count: usize) {
    KNOWN_NODES.set(count as i64);
}

/// Text-format snapshot of the default registry.
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
