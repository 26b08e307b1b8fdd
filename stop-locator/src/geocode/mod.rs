//! Reverse geocoding: coordinate to a short place name.
//!
//! The cache absorbs every service failure; callers only ever see an
//! optional label.

mod cache;
mod client;
mod error;

pub use cache::ReverseGeocodeCache;
pub use client::{Address, GeocodeConfig, NominatimClient, ReverseGeocoder, ReversePlace};
pub use error::GeocodeError;
