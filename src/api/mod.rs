//! PokéAPI access module.
//!
//! This module provides everything the rest of the application needs to talk
//! to the upstream catalog API:
//!
//! - **Client**: HTTP retrieval of catalog pages, type listings, and per-Pokémon
//!   detail, with size-limited bodies and per-request timeouts
//! - **Wire types**: serde mappings for the upstream JSON payloads
//! - **Domain types**: the enriched [`Pokemon`] and [`PokemonDetail`] structs
//!   consumed by the feed controller and the UI
//!
//! # Architecture
//!
//! - [`client`] - `PokeClient` with one method per upstream endpoint
//! - [`wire`] - raw payload structs, kept private to this module
//! - [`types`] - enriched domain structs shared with the rest of the crate
//!
//! There are no retries in this layer: a failed request surfaces as a
//! [`FetchError`] and the caller decides what degrades.

mod client;
mod types;
mod wire;

pub use client::{FetchError, PokeClient, PokemonPage};
pub use types::{LearnedMove, Pokemon, PokemonDetail};
