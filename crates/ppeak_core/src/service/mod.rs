//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate transport and durable storage into use-case level APIs.
//! - Keep host surfaces decoupled from storage details.
//!
//! # Invariants
//! - Services are explicitly constructed and owned by the host; there is no
//!   process-global cache or theme state.

pub mod content_service;
pub mod theme_service;
