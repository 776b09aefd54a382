//! Presence and messaging relay for Marquee.
//!
//! Tracks which users hold a live WebSocket connection and relays
//! durably-stored messages and notifications to them.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
