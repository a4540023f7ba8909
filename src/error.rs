//! Error types for the store adapters and the matching service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("record could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum MatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown vehicle {0}")]
    UnknownVehicle(String),

    #[error("invalid position ({lat}, {lon})")]
    InvalidPosition { lat: f64, lon: f64 },

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
