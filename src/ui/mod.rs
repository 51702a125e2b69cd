//! Terminal User Interface module.
//!
//! This module provides the TUI for the Pokédex feed, including:
//! - Main event loop (`run`)
//! - Input handling for browse, detail, and search modes
//! - Rendering for the type sidebar, the feed, and the detail view
//! - Background task event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `tasks` - Background task spawning with panic containment
//! - `render` - View rendering dispatch
//! - `sidebar` - Type list widget
//! - `grid` - Feed list widget
//! - `detail` - Detail view widget
//! - `status` - Status bar widget

mod detail;
mod events;
mod grid;
mod input;
mod loop_runner;
mod render;
mod sidebar;
mod status;
mod tasks;

// Re-export the public API
pub use loop_runner::{run, Action};
