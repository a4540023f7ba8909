//! transit-matcher core
//!
//! Matches riders, described by free-text places, against vehicles running
//! undirected named routes, inferring each vehicle's direction from its
//! GPS samples.

pub mod api;
pub mod clock;
pub mod config;
pub mod direction;
pub mod error;
pub mod eta;
pub mod fare;
pub mod gazetteer;
pub mod geo;
pub mod model;
pub mod pass_filter;
pub mod polyline;
pub mod replay;
pub mod rest;
pub mod route_matcher;
pub mod service;
pub mod store;
pub mod traits;
