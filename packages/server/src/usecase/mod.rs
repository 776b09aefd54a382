//! UseCase layer: the relay operations, orchestrating repositories and the
//! message pusher.

mod error;
mod get_inbox_messages;
mod get_notifications;
mod mark_notification_read;
mod presence;
mod profile;
mod relay_message;
mod relay_notification;

pub use error::{
    MarkNotificationReadError, ProfileError, RelayMessageError, RelayNotificationError,
};
pub use get_inbox_messages::GetInboxMessagesUseCase;
pub use get_notifications::GetNotificationsUseCase;
pub use mark_notification_read::MarkNotificationReadUseCase;
pub use presence::PresenceUseCase;
pub use profile::{GetProfileUseCase, UpsertProfileUseCase};
pub use relay_message::{Delivery, RelayMessageUseCase, RelayedMessage};
pub use relay_notification::{RelayNotificationUseCase, RelayedNotification};
