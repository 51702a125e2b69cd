//! The incremental feed core: session cache, view controller, background
//! preloader, and scroll sentinel.
//!
//! This module owns all catalog state for the session. Nothing here performs
//! I/O except [`preload_full_set`]; the controller and cache are plain state
//! machines mutated on the UI task, which is what makes the single-flight
//! guarantees hold without locks.
//!
//! # Architecture
//!
//! - [`cache`] - `SessionCache`: one full-set slot plus one slot per type,
//!   each an explicit absent/loading/ready state machine
//! - [`controller`] - `FeedController`: search, filter, and pagination view
//!   state, plus the visible-slice computation
//! - [`preload`] - sequential batch download of the entire catalog
//! - [`sentinel`] - fires page advances when the last rendered row is seen

mod cache;
mod controller;
mod preload;
mod sentinel;

pub use cache::SessionCache;
pub use controller::{FeedController, PageRequest, ALL_TYPES, PAGE_SIZE};
pub use preload::{preload_full_set, PRELOAD_BATCH_SIZE, PRELOAD_PAUSE, PRELOAD_TOTAL};
pub use sentinel::ScrollSentinel;
