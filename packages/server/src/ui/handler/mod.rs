mod http;
mod websocket;

pub use http::{
    get_inbox_messages, get_notifications, get_online_users, get_profile, health_check,
    mark_notification_read, upsert_profile,
};
pub use websocket::websocket_handler;
