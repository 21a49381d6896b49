//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable key/value contract used by services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs surface storage failures as values; swallowing them is
//!   a service-level decision.

pub mod local_store;
