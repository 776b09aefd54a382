//! Domain layer: relay entities, value objects and the ports the use cases
//! depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod presence;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    ConnectedUser, Message, NewMessage, NewNotification, Notification, UserProfile,
};
pub use error::{MessagePushError, StoreError, ValueObjectError};
pub use event::OutboundEvent;
pub use presence::{PresenceRegistry, RegisterOutcome, ReregistrationPolicy};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{MessageStore, PresenceRepository};
#[cfg(test)]
pub use repository::MockMessageStore;
pub use value_object::{
    InboxId, MessageId, MessageText, NotificationId, NotificationKind, SessionId,
    SessionIdFactory, Timestamp, UserId,
};
