//! dexfeed: a terminal Pokedex backed by PokeAPI.
//!
//! The crate is split into a transport layer ([`api`]), the session cache
//! and incremental feed state machines ([`feed`]), application state
//! ([`app`]), configuration ([`config`]), and the ratatui front end ([`ui`]).

pub mod api;
pub mod app;
pub mod config;
pub mod feed;
pub mod ui;
