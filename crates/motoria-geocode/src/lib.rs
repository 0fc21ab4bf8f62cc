//! HTTP client for a Nominatim-compatible geocoding API.
//!
//! Best-effort by design: the catalog's location resolver treats every
//! failure here as "no geocoding available" and falls back to its static
//! dictionary.

mod client;
mod error;
mod retry;
mod types;

pub use client::{GeocodeClient, GeocodeConfig};
pub use error::GeocodeError;
pub use types::{Address, SearchResult};
