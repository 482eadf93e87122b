//! Domain layer for the Feedback Hub backend.
//!
//! This crate contains the domain models and the request/response types
//! exchanged with the HTTP layer.

pub mod models;
