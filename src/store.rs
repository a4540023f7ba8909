//! Typed stores over a [`PersistentStore`], plus an in-memory backend.
//!
//! Expiry is lazy: nothing is ever reaped in the background. Stale trips
//! and demand records stay in the backend and are only hidden from reads
//! once they fall outside their TTL window.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;
use crate::geo::GeoPoint;
use crate::model::{Direction, PassengerRequest, ProfileUpdate, Trip, VehicleProfile, normalize_label};
use crate::traits::{Clock, Filter, PersistentStore, Table};

const TRIP_TIMESTAMP: &str = "updated_at";
const DEMAND_TIMESTAMP: &str = "created_at";

/// In-process backend. Each table is a map of key to JSON record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, BTreeMap<String, Value>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held in `table`, stale ones included.
    pub fn len(&self, table: Table) -> usize {
        self.tables
            .read()
            .map(|tables| tables.get(&table).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }
}

impl PersistentStore for MemoryStore {
    fn upsert(&self, table: Table, key: &str, record: Value) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        tables.entry(table).or_default().insert(key.to_string(), record);
        Ok(())
    }

    fn insert(&self, table: Table, mut record: Value) -> Result<(), StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        if let Value::Object(fields) = &mut record {
            fields.insert(table.key_column().to_string(), Value::String(id.clone()));
        }
        self.upsert(table, &id, record)
    }

    fn delete(&self, table: Table, key: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(rows) = tables.get_mut(&table) {
            rows.remove(key);
        }
        Ok(())
    }

    fn get(&self, table: Table, key: &str) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.get(&table).and_then(|rows| rows.get(key)).cloned())
    }

    fn select_all(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        let Some(rows) = tables.get(&table) else {
            return Ok(Vec::new());
        };

        Ok(rows
            .values()
            .filter(|row| match filter {
                Filter::All => true,
                Filter::Since { column, cutoff } => {
                    timestamp_of(row, column).is_some_and(|at| at >= *cutoff)
                }
            })
            .cloned()
            .collect())
    }
}

fn timestamp_of(row: &Value, column: &str) -> Option<DateTime<Utc>> {
    serde_json::from_value(row.get(column)?.clone()).ok()
}

/// Decodes rows, dropping (and logging) the ones that do not parse.
fn decode_rows<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> impl Iterator<Item = T> {
    rows.into_iter().filter_map(move |row| match serde_json::from_value(row) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(table = table.name(), error = %err, "skipping undecodable record");
            None
        }
    })
}

/// One active trip per vehicle, last writer wins.
pub struct TripStateStore<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: PersistentStore + ?Sized> TripStateStore<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Replaces the vehicle's trip, stamping it with the server clock.
    pub fn upsert(
        &self,
        vehicle_id: &str,
        position: GeoPoint,
        direction: Direction,
    ) -> Result<Trip, StoreError> {
        let trip = Trip {
            vehicle_id: vehicle_id.to_string(),
            position,
            direction,
            updated_at: self.clock.now(),
        };
        self.store
            .upsert(Table::Trips, vehicle_id, serde_json::to_value(&trip)?)?;
        Ok(trip)
    }

    /// Direct lookup, regardless of age.
    pub fn get(&self, vehicle_id: &str) -> Result<Option<Trip>, StoreError> {
        match self.store.get(Table::Trips, vehicle_id)? {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Trips updated within `ttl` of now.
    pub fn list_active(&self, ttl: Duration) -> Result<Vec<Trip>, StoreError> {
        let cutoff = self.clock.now() - ttl;
        let rows = self.store.select_all(
            Table::Trips,
            &Filter::Since {
                column: TRIP_TIMESTAMP,
                cutoff,
            },
        )?;

        Ok(decode_rows::<Trip>(Table::Trips, rows)
            .filter(|trip| trip.updated_at >= cutoff)
            .collect())
    }

    pub fn remove(&self, vehicle_id: &str) -> Result<(), StoreError> {
        self.store.delete(Table::Trips, vehicle_id)
    }
}

/// Append-only log of rider demand signals.
pub struct DemandStore<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: PersistentStore + ?Sized> DemandStore<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn append(
        &self,
        position: GeoPoint,
        depart_text: Option<&str>,
        arrive_text: Option<&str>,
    ) -> Result<PassengerRequest, StoreError> {
        let request = PassengerRequest {
            position,
            depart_text: non_empty(depart_text),
            arrive_text: non_empty(arrive_text),
            created_at: self.clock.now(),
        };
        self.store
            .insert(Table::Demand, serde_json::to_value(&request)?)?;
        Ok(request)
    }

    /// Requests created within `window` of now.
    pub fn list_recent(&self, window: Duration) -> Result<Vec<PassengerRequest>, StoreError> {
        let cutoff = self.clock.now() - window;
        let rows = self.store.select_all(
            Table::Demand,
            &Filter::Since {
                column: DEMAND_TIMESTAMP,
                cutoff,
            },
        )?;

        Ok(decode_rows::<PassengerRequest>(Table::Demand, rows)
            .filter(|request| request.created_at >= cutoff)
            .collect())
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(normalize_label).filter(|text| !text.is_empty())
}

/// Registered vehicles and their routes and fares.
pub struct VehicleRegistry<S: ?Sized> {
    store: Arc<S>,
}

impl<S: PersistentStore + ?Sized> VehicleRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn register(&self, mut profile: VehicleProfile) -> Result<VehicleProfile, StoreError> {
        profile.route = profile.route.normalized();
        for tariff in &mut profile.tariffs {
            tariff.destination_label = normalize_label(&tariff.destination_label);
        }
        self.store.upsert(
            Table::Vehicles,
            &profile.vehicle_id,
            serde_json::to_value(&profile)?,
        )?;
        Ok(profile)
    }

    pub fn get(&self, vehicle_id: &str) -> Result<Option<VehicleProfile>, StoreError> {
        match self.store.get(Table::Vehicles, vehicle_id)? {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Every registered vehicle, ordered by id.
    pub fn list(&self) -> Result<Vec<VehicleProfile>, StoreError> {
        let rows = self.store.select_all(Table::Vehicles, &Filter::All)?;
        let mut profiles: Vec<VehicleProfile> = decode_rows(Table::Vehicles, rows).collect();
        profiles.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        Ok(profiles)
    }

    /// Applies a partial edit. Returns `None` if the vehicle is unknown.
    pub fn update(
        &self,
        vehicle_id: &str,
        update: ProfileUpdate,
    ) -> Result<Option<VehicleProfile>, StoreError> {
        let Some(mut profile) = self.get(vehicle_id)? else {
            return Ok(None);
        };
        update.apply(&mut profile);
        self.register(profile).map(Some)
    }
}
