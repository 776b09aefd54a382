//! Utilities shared by the Marquee relay server and client.

pub mod logger;
pub mod time;
