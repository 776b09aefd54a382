//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ConnectedUser, InboxId, Message, MessageText, NewMessage, NewNotification, Notification,
    NotificationKind, OutboundEvent, UserId, UserProfile, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::SendMessagePayload> for NewMessage {
    type Error = ValueObjectError;

    fn try_from(payload: dto::SendMessagePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            sender_id: UserId::new(payload.sender_id)?,
            receiver_id: UserId::new(payload.receiver_id)?,
            text: MessageText::new(payload.text)?,
            inbox_id: InboxId::new(payload.inbox_id)?,
        })
    }
}

impl TryFrom<dto::SendNotificationPayload> for NewNotification {
    type Error = ValueObjectError;

    fn try_from(payload: dto::SendNotificationPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: NotificationKind::new(payload.r#type)?,
            content: payload.content,
            recipient_id: UserId::new(payload.receiver_id)?,
            sender_id: UserId::new(payload.sender_id)?,
        })
    }
}

/// Build a profile from the path id and request body of `PUT /api/users/{id}`.
pub fn profile_from_request(
    user_id: i64,
    request: http::UpsertProfileRequest,
) -> Result<UserProfile, ValueObjectError> {
    Ok(UserProfile::new(
        UserId::new(user_id)?,
        request.name,
        request.avatar.filter(|avatar| !avatar.trim().is_empty()),
    ))
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ConnectedUser> for dto::ConnectedUserDto {
    fn from(model: ConnectedUser) -> Self {
        Self {
            user_id: model.user_id.value(),
            session_id: model.session_id.into_string(),
        }
    }
}

impl From<UserProfile> for dto::SenderDto {
    fn from(model: UserProfile) -> Self {
        Self {
            id: model.id.value(),
            name: model.name,
            avatar: model.avatar,
        }
    }
}

impl From<UserProfile> for http::UserProfileDto {
    fn from(model: UserProfile) -> Self {
        Self {
            id: model.id.value(),
            name: model.name,
            avatar: model.avatar,
        }
    }
}

impl From<Message> for dto::MessageDto {
    fn from(model: Message) -> Self {
        Self {
            id: model.id.value(),
            sender_id: model.sender.id.value(),
            receiver_id: model.receiver_id.value(),
            text: model.text.into_string(),
            inbox_id: model.inbox_id.value(),
            created_at: model.created_at.value(),
            sender: model.sender.into(),
        }
    }
}

impl From<Notification> for dto::NotificationDto {
    fn from(model: Notification) -> Self {
        Self {
            id: model.id.value(),
            r#type: model.kind.into_string(),
            content: model.content,
            recipient_id: model.recipient_id.value(),
            sender_id: model.sender_id.value(),
            read: model.read,
            created_at: model.created_at.value(),
        }
    }
}

impl From<OutboundEvent> for dto::ServerEvent {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::OnlineUsers(users) => {
                Self::GetOnlineUsers(users.into_iter().map(Into::into).collect())
            }
            OutboundEvent::Message(message) => Self::GetMessage(message.into()),
            OutboundEvent::MessageNotice {
                kind,
                sender_id,
                content,
            } => Self::GetNotification(dto::NotificationEventDto::Notice(
                dto::NotificationNoticeDto {
                    r#type: kind.into_string(),
                    sender_id: sender_id.value(),
                    content,
                },
            )),
            OutboundEvent::Notification(notification) => {
                Self::GetNotification(dto::NotificationEventDto::Stored(notification.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, NotificationId, SessionId, Timestamp};

    fn sample_message() -> Message {
        Message {
            id: MessageId::new(10),
            sender: UserProfile::new(
                UserId::new(1).unwrap(),
                "Alice",
                Some("https://cdn.example/alice.png".to_string()),
            ),
            receiver_id: UserId::new(2).unwrap(),
            text: MessageText::new("hi".to_string()).unwrap(),
            inbox_id: InboxId::new(7).unwrap(),
            created_at: Timestamp::new(1000),
        }
    }

    #[test]
    fn test_send_message_payload_to_domain() {
        // テスト項目: a valid payload becomes a NewMessage
        // given (前提条件):
        let payload = dto::SendMessagePayload {
            sender_id: 1,
            receiver_id: 2,
            text: "hi".to_string(),
            inbox_id: 7,
        };

        // when (操作):
        let new_message = NewMessage::try_from(payload).unwrap();

        // then (期待する結果):
        assert_eq!(new_message.sender_id.value(), 1);
        assert_eq!(new_message.receiver_id.value(), 2);
        assert_eq!(new_message.text.as_str(), "hi");
        assert_eq!(new_message.inbox_id.value(), 7);
    }

    #[test]
    fn test_send_message_payload_with_invalid_field() {
        // テスト項目: an empty text is reported as a validation error
        // given (前提条件):
        let payload = dto::SendMessagePayload {
            sender_id: 1,
            receiver_id: 2,
            text: "".to_string(),
            inbox_id: 7,
        };

        // when (操作):
        let result = NewMessage::try_from(payload);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyMessageText));
    }

    #[test]
    fn test_send_notification_payload_to_domain() {
        // テスト項目: receiverId maps to the recipient
        // given (前提条件):
        let payload = dto::SendNotificationPayload {
            r#type: "follow".to_string(),
            receiver_id: 2,
            sender_id: 1,
            content: "Alice followed you".to_string(),
        };

        // when (操作):
        let new_notification = NewNotification::try_from(payload).unwrap();

        // then (期待する結果):
        assert_eq!(new_notification.kind.as_str(), "follow");
        assert_eq!(new_notification.recipient_id.value(), 2);
        assert_eq!(new_notification.sender_id.value(), 1);
    }

    #[test]
    fn test_profile_from_request_drops_blank_avatar() {
        // テスト項目: a blank avatar is stored as no avatar
        // given (前提条件):
        let request = http::UpsertProfileRequest {
            name: "Alice".to_string(),
            avatar: Some("  ".to_string()),
        };

        // when (操作):
        let profile = profile_from_request(1, request).unwrap();

        // then (期待する結果):
        assert_eq!(profile.avatar, None);
        assert_eq!(profile.name, "Alice");
    }

    #[test]
    fn test_message_event_carries_sender_identity() {
        // テスト項目: getMessage includes sender id, name and avatar
        // given (前提条件):
        let event = OutboundEvent::Message(sample_message());

        // when (操作):
        let dto: dto::ServerEvent = event.into();

        // then (期待する結果):
        let dto::ServerEvent::GetMessage(message) = dto else {
            panic!("expected getMessage");
        };
        assert_eq!(message.sender_id, 1);
        assert_eq!(message.sender.name, "Alice");
        assert_eq!(
            message.sender.avatar.as_deref(),
            Some("https://cdn.example/alice.png")
        );
        assert_eq!(message.text, "hi");
    }

    #[test]
    fn test_online_users_event_keeps_order() {
        // テスト項目: the snapshot keeps registry order
        // given (前提条件):
        let users = vec![
            ConnectedUser::new(UserId::new(2).unwrap(), SessionId::try_from("B").unwrap()),
            ConnectedUser::new(UserId::new(1).unwrap(), SessionId::try_from("A").unwrap()),
        ];

        // when (操作):
        let dto: dto::ServerEvent = OutboundEvent::OnlineUsers(users).into();

        // then (期待する結果):
        let dto::ServerEvent::GetOnlineUsers(users) = dto else {
            panic!("expected getOnlineUsers");
        };
        let ids: Vec<i64> = users.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_stored_notification_event() {
        // テスト項目: a stored notification is sent in full
        // given (前提条件):
        let notification = Notification {
            id: NotificationId::new(3),
            kind: NotificationKind::new("follow".to_string()).unwrap(),
            content: "Alice followed you".to_string(),
            recipient_id: UserId::new(2).unwrap(),
            sender_id: UserId::new(1).unwrap(),
            read: false,
            created_at: Timestamp::new(1000),
        };

        // when (操作):
        let dto: dto::ServerEvent = OutboundEvent::Notification(notification).into();

        // then (期待する結果):
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["event"], "getNotification");
        assert_eq!(json["data"]["id"], 3);
        assert_eq!(json["data"]["type"], "follow");
        assert_eq!(json["data"]["recipientId"], 2);
        assert_eq!(json["data"]["read"], false);
    }
}
