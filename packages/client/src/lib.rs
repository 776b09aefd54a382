//! Command-line client for the Marquee relay.

pub mod command;
pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::{ClientConfig, run_client};
