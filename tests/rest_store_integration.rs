//! REST store against a real PostgREST in front of Postgres.
//!
//! Both containers join one Docker network so PostgREST can reach the
//! database by container name. Requires a running Docker daemon.

mod fixtures;

use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, TestcontainersError};

use transit_matcher::clock::ManualClock;
use transit_matcher::error::StoreError;
use transit_matcher::model::{Direction, Route, RouteEndpoint, VehicleProfile};
use transit_matcher::rest::{RestConfig, RestStore};
use transit_matcher::store::{DemandStore, TripStateStore, VehicleRegistry};
use transit_matcher::traits::{Clock, Filter, PersistentStore, Table};

use fixtures::*;

const NETWORK: &str = "transit-matcher-it";
const DB_PASSWORD: &str = "matcher";

const SCHEMA: &str = "
create table active_trips (
    vehicle_id text primary key,
    position jsonb not null,
    direction text not null,
    updated_at timestamptz not null
);
create table passenger_requests (
    id bigserial primary key,
    position jsonb not null,
    depart_text text,
    arrive_text text,
    created_at timestamptz not null
);
create table vehicles (
    vehicle_id text primary key,
    driver_name text not null,
    phone text,
    plate text,
    model text,
    route jsonb not null,
    tariffs jsonb not null default '[]'
);
";

struct RestBackend {
    _db: Container<GenericImage>,
    _api: Container<GenericImage>,
    base_url: String,
}

fn rest_backend() -> Result<RestBackend, TestcontainersError> {
    let db_name = format!("transit-matcher-db-{}", std::process::id());

    let db = GenericImage::new("postgres", "16-alpine")
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_PASSWORD", DB_PASSWORD)
        .with_copy_to("/docker-entrypoint-initdb.d/schema.sql", SCHEMA.as_bytes().to_vec())
        .with_network(NETWORK)
        .with_container_name(db_name.clone())
        .with_startup_timeout(StdDuration::from_secs(60))
        .start()?;

    let api = GenericImage::new("postgrest/postgrest", "v12.2.3")
        .with_exposed_port(3000.tcp())
        .with_env_var(
            "PGRST_DB_URI",
            format!("postgres://postgres:{}@{}:5432/postgres", DB_PASSWORD, db_name),
        )
        .with_env_var("PGRST_DB_ANON_ROLE", "postgres")
        .with_env_var("PGRST_DB_SCHEMAS", "public")
        .with_network(NETWORK)
        .with_startup_timeout(StdDuration::from_secs(60))
        .start()?;

    let port = api.get_host_port_ipv4(3000.tcp())?;
    Ok(RestBackend {
        _db: db,
        _api: api,
        base_url: format!("http://127.0.0.1:{}", port),
    })
}

/// PostgREST keeps retrying the database connection, so poll until the
/// schema is served.
fn wait_until_ready(store: &RestStore) {
    let start = Instant::now();
    loop {
        match store.select_all(Table::Vehicles, &Filter::All) {
            Ok(_) => return,
            Err(err) if start.elapsed() > StdDuration::from_secs(30) => {
                panic!("PostgREST never became ready: {}", err)
            }
            Err(_) => std::thread::sleep(StdDuration::from_millis(500)),
        }
    }
}

#[test]
fn rest_store_backs_the_typed_stores() {
    let backend = rest_backend().expect("start postgres and postgrest containers");
    let store = Arc::new(
        RestStore::new(RestConfig {
            base_url: backend.base_url.clone(),
            ..RestConfig::default()
        })
        .expect("build REST client"),
    );
    wait_until_ready(&store);

    // Whole seconds so timestamps survive the round trip through timestamptz
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap(),
    ));
    let trips = TripStateStore::new(store.clone(), clock.clone());
    let demand = DemandStore::new(store.clone(), clock.clone());
    let vehicles = VehicleRegistry::new(store.clone());

    // ------------------------------------------------------------------
    // Trips: merge-duplicates upsert, key lookup, pushed-down TTL, delete
    // ------------------------------------------------------------------
    let written = trips
        .upsert("bus-a", TADMAIT.point(), Direction::Toward("alger".into()))
        .expect("first upsert");
    assert_eq!(trips.get("bus-a").expect("get trip"), Some(written));

    trips
        .upsert("bus-a", THENIA.point(), Direction::Toward("tizi ouzou".into()))
        .expect("second upsert");
    let active = trips.list_active(Duration::seconds(45)).expect("list trips");
    assert_eq!(active.len(), 1, "upsert must replace, not append");
    assert_eq!(active[0].direction, Direction::Toward("tizi ouzou".into()));

    clock.advance(Duration::seconds(46));
    let cutoff = clock.now() - Duration::seconds(45);
    let rows = store
        .select_all(
            Table::Trips,
            &Filter::Since {
                column: "updated_at",
                cutoff,
            },
        )
        .expect("filtered select");
    assert!(rows.is_empty(), "server should drop the stale trip: {:?}", rows);
    assert!(trips.get("bus-a").expect("get stale trip").is_some());

    trips.remove("bus-a").expect("remove trip");
    assert!(trips.get("bus-a").expect("get removed trip").is_none());

    // ------------------------------------------------------------------
    // Demand: server-assigned ids, window pushed down to the server
    // ------------------------------------------------------------------
    demand
        .append(THENIA.point(), None, Some(ALGER.name))
        .expect("append first request");
    clock.advance(Duration::minutes(20));
    demand
        .append(DRAA_BEN_KHEDDA.point(), Some(TIZI_OUZOU.name), Some(BEJAIA.name))
        .expect("append second request");

    let rows = store
        .select_all(
            Table::Demand,
            &Filter::Since {
                column: "created_at",
                cutoff: clock.now() - Duration::minutes(15),
            },
        )
        .expect("filtered demand select");
    assert_eq!(rows.len(), 1);

    let recent = demand.list_recent(Duration::minutes(15)).expect("list demand");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].arrive_text.as_deref(), Some("bejaia"));
    assert_eq!(recent[0].position, DRAA_BEN_KHEDDA.point());

    // ------------------------------------------------------------------
    // Vehicles: nested route and tariffs stored as jsonb
    // ------------------------------------------------------------------
    let route = Route::new(
        RouteEndpoint::new(TIZI_OUZOU.name).with_point(TIZI_OUZOU.lat, TIZI_OUZOU.lon),
        RouteEndpoint::new(BEJAIA.name),
    );
    let registered = vehicles
        .register(VehicleProfile::new("bus-b", "Said", route).with_tariff("Bejaia", 400.0))
        .expect("register vehicle");
    vehicles
        .register(VehicleProfile::new(
            "bus-a",
            "Ali",
            Route::new(RouteEndpoint::new("Tizi Ouzou"), RouteEndpoint::new("Alger")),
        ))
        .expect("register second vehicle");

    let listed = vehicles.list().expect("list vehicles");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1], registered);

    // ------------------------------------------------------------------
    // Rejected writes surface the HTTP status
    // ------------------------------------------------------------------
    let rejected = store.upsert(Table::Trips, "bus-x", json!({ "speed_kmh": 40 }));
    match rejected {
        Err(StoreError::Status { status, body }) => {
            assert!((400..500).contains(&status), "status {}: {}", status, body);
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}
