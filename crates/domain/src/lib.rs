//! Domain layer for the Device Registry backend.
//!
//! This crate contains:
//! - The member model, request types and their validation rules
//! - Device UID generation
//! - Data message acceptance

pub mod ingest;
pub mod models;
pub mod uid;
