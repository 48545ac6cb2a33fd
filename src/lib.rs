//! Post-disaster infrastructure digital twin.
//!
//! Builds a synthetic power network (substation, clustered feeders,
//! buildings) from a damaged-building table and simulates recovery under a
//! pluggable repair policy.

/// REST API for a finished run.
#[cfg(feature = "api")]
pub mod api;
/// TOML-based scenario configuration and presets.
pub mod config;
/// Building table model and CSV reader.
pub mod data;
pub mod error;
/// Telemetry export.
pub mod io;
pub mod twin;

pub use error::{Error, Result};
