//! Events pushed from the relay to live sessions.
//!
//! The wire encoding lives in the infrastructure layer; use cases only decide
//! which event goes to which session.

use super::{
    entity::{ConnectedUser, Message, Notification},
    value_object::{NotificationKind, UserId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Presence snapshot, in registry order
    OnlineUsers(Vec<ConnectedUser>),
    /// A persisted message for its receiver
    Message(Message),
    /// Short notice accompanying a relayed message
    MessageNotice {
        kind: NotificationKind,
        sender_id: UserId,
        content: String,
    },
    /// A persisted free-standing notification
    Notification(Notification),
}
