use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Value kinds the telemetry store carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Number(f64),
    NumberArray(Vec<f64>),
    Text(String),
}

/// Write interface to the telemetry store.
///
/// The networked store the robot subscribes to is an external collaborator;
/// in-process implementations buffer the latest value per table and key.
pub trait TelemetrySink: Send + Sync {
    fn put(&self, table: &str, key: &str, value: TelemetryValue);
}

/// Tables keyed by path, each holding the latest value per key.
pub type TableSnapshot = BTreeMap<String, BTreeMap<String, TelemetryValue>>;

/// In-process latest-value store backing the bridge and the tests.
#[derive(Default)]
pub struct MemorySink {
    tables: RwLock<TableSnapshot>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TableSnapshot {
        self.tables.read().unwrap().clone()
    }

    /// Latest value under `table`/`key`, if one was ever written.
    pub fn get(&self, table: &str, key: &str) -> Option<TelemetryValue> {
        self.tables
            .read()
            .unwrap()
            .get(table)
            .and_then(|entries| entries.get(key))
            .cloned()
    }
}

impl TelemetrySink for MemorySink {
    fn put(&self, table: &str, key: &str, value: TelemetryValue) {
        let mut tables = self.tables.write().unwrap();
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_overwrites_the_previous_value() {
        let sink = MemorySink::new();
        sink.put("vision/cargo", "r", TelemetryValue::NumberArray(vec![1.0]));
        sink.put("vision/cargo", "r", TelemetryValue::NumberArray(vec![2.0, 3.0]));
        assert_eq!(
            sink.get("vision/cargo", "r"),
            Some(TelemetryValue::NumberArray(vec![2.0, 3.0]))
        );
    }

    #[test]
    fn tables_are_independent_namespaces() {
        let sink = MemorySink::new();
        sink.put("vision/targets", "contour_left", TelemetryValue::NumberArray(vec![0.0; 6]));
        sink.put("vision/cargo", "x", TelemetryValue::NumberArray(vec![]));
        assert!(sink.get("vision/targets", "x").is_none());
        assert_eq!(sink.snapshot().len(), 2);
    }

    #[test]
    fn values_serialize_untagged() {
        let json = serde_json::to_string(&TelemetryValue::NumberArray(vec![1.0, 2.0])).unwrap();
        assert_eq!(json, "[1.0,2.0]");
        let back: TelemetryValue = serde_json::from_str("[1.0,2.0]").unwrap();
        assert_eq!(back, TelemetryValue::NumberArray(vec![1.0, 2.0]));
    }
}
