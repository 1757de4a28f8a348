//! HTTP API: server, routing, and request/response mapping.
//!
//! Deliberately thin: everything here maps HTTP shapes onto the query engine
//! and mutation service; no business rules live in this crate.

pub mod app;
