//! メッセージ送信（通知）の実装
//!
//! Concrete implementations of the `MessagePusher` trait.
//!
//! - `websocket`: pushes JSON text frames through per-session channels

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
