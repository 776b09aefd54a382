//! Message formatting utilities for client display.

use marquee_server::infrastructure::dto::websocket::{
    ConnectedUserDto, MessageDto, NotificationEventDto,
};
use marquee_shared::time::{timestamp_to_local_clock, timestamp_to_rfc3339};

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a presence snapshot, marking the current user
    pub fn format_online_users(users: &[ConnectedUserDto], current_user_id: i64) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Online:\n");

        if users.is_empty() {
            output.push_str("(nobody)\n");
        } else {
            for user in users {
                let me_suffix = if user.user_id == current_user_id {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("user {}{}\n", user.user_id, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a direct message
    pub fn format_message(message: &MessageDto) -> String {
        format!(
            "\n\n{}\n@{} (user {}, inbox {}): {}\nsent at {}\n{}\n",
            RULE,
            message.sender.name,
            message.sender_id,
            message.inbox_id,
            message.text,
            timestamp_to_rfc3339(message.created_at),
            RULE
        )
    }

    /// Format either kind of `getNotification` payload
    pub fn format_notification(notification: &NotificationEventDto) -> String {
        match notification {
            NotificationEventDto::Notice(notice) => {
                format!("\n* [{}] {}\n", notice.r#type, notice.content)
            }
            NotificationEventDto::Stored(stored) => format!(
                "\n* [{}] {} (from user {}, #{} at {})\n",
                stored.r#type,
                stored.content,
                stored.sender_id,
                stored.id,
                timestamp_to_local_clock(stored.created_at)
            ),
        }
    }

    pub fn format_help() -> String {
        "\nCommands:\n  \
         /msg <receiver_id> <inbox_id> <text>    send a direct message\n  \
         /notify <receiver_id> <type> <content>  send a notification\n  \
         /online                                  list online users\n  \
         /quit                                    leave\n"
            .to_string()
    }

    /// Format an error line
    pub fn format_error(error: &str) -> String {
        format!("\n! {}\n", error)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
