//! Test fixtures for transit-matcher.
//!
//! Provides real place coordinates along the Algiers / Tizi Ouzou corridor
//! and the Kabylie hinterland. Each test binary uses a different subset.

#![allow(dead_code)]

pub mod kabylie_places;

pub use kabylie_places::*;
