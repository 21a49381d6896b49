//! Domain model for site content and presentation state.
//!
//! # Responsibility
//! - Define canonical data structures shared by services and peripherals.
//!
//! # Invariants
//! - The dark-mode flag is always derived from the active world.
//! - Cache keys are derived from logical content paths only.

pub mod content;
pub mod world;
