//! Payment standard resolution and listing qualification for HUD-VASH caseworkers.
//!
//! The [`standards`] module holds the engine: the authority registry, tier tables,
//! location resolution, the lesser-of payment standard calculator and the listing
//! qualifier. [`listings`] adapts raw listing-source exports into engine input.

pub mod config;
pub mod error;
pub mod listings;
pub mod standards;
pub mod telemetry;
