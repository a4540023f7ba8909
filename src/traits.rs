//! Seams to the outside world: the keyed record store and the clock.
//!
//! The matcher only needs simple keyed reads and writes, so any backend
//! that can hold JSON records per table can implement [`PersistentStore`].

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::StoreError;

/// Tables the matcher reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Trips,
    Demand,
    Vehicles,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Trips => "active_trips",
            Table::Demand => "passenger_requests",
            Table::Vehicles => "vehicles",
        }
    }

    /// Column holding the record key.
    pub fn key_column(&self) -> &'static str {
        match self {
            Table::Trips | Table::Vehicles => "vehicle_id",
            Table::Demand => "id",
        }
    }
}

/// Row filter for [`PersistentStore::select_all`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Rows whose timestamp column is at or after `cutoff`.
    Since {
        column: &'static str,
        cutoff: DateTime<Utc>,
    },
}

/// Keyed record storage with atomic per-key upsert and delete.
///
/// Backends may return a superset of a [`Filter`]; callers re-check it.
pub trait PersistentStore: Send + Sync {
    /// Inserts or replaces the record stored under `key`.
    fn upsert(&self, table: Table, key: &str, record: Value) -> Result<(), StoreError>;

    /// Appends a record under a backend-assigned key.
    fn insert(&self, table: Table, record: Value) -> Result<(), StoreError>;

    fn delete(&self, table: Table, key: &str) -> Result<(), StoreError>;

    fn get(&self, table: Table, key: &str) -> Result<Option<Value>, StoreError>;

    fn select_all(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError>;
}

/// Source of server-side timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
