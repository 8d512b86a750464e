//! # Climate API
//!
//! Read-only JSON API over a fixed dataset of daily climate measurements
//! (station, date, precipitation, temperature observation).
//!
//! ## Architecture
//!
//! - [`models`]: Measurement rows and temperature statistics
//! - [`api`]: Data Transfer Objects returned by the query service
//! - [`db`]: Repository trait, SQLite and in-memory stores, query service
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! The store handle is built once by the binary and injected into the HTTP
//! state; the library keeps no global connection state.

pub mod api;

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
