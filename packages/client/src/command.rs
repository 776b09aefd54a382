//! Prompt commands.
//!
//! ```text
//! /msg <receiver_id> <inbox_id> <text...>
//! /notify <receiver_id> <type> <content...>
//! /online
//! /help
//! /quit
//! ```

use marquee_server::infrastructure::dto::websocket::{
    ClientEvent, SendMessagePayload, SendNotificationPayload,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message {
        receiver_id: i64,
        inbox_id: i64,
        text: String,
    },
    Notify {
        receiver_id: i64,
        kind: String,
        content: String,
    },
    Online,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type /help")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a valid id")]
    InvalidId(String),
}

const MSG_USAGE: &str = "/msg <receiver_id> <inbox_id> <text>";
const NOTIFY_USAGE: &str = "/notify <receiver_id> <type> <content>";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();

        match name {
            "/msg" => {
                let (receiver_id, rest) = next_word(rest).ok_or(CommandError::Usage(MSG_USAGE))?;
                let (inbox_id, text) = next_word(rest).ok_or(CommandError::Usage(MSG_USAGE))?;
                if text.is_empty() {
                    return Err(CommandError::Usage(MSG_USAGE));
                }
                Ok(Self::Message {
                    receiver_id: parse_id(receiver_id)?,
                    inbox_id: parse_id(inbox_id)?,
                    text: text.to_string(),
                })
            }
            "/notify" => {
                let (receiver_id, rest) =
                    next_word(rest).ok_or(CommandError::Usage(NOTIFY_USAGE))?;
                let (kind, content) = next_word(rest).ok_or(CommandError::Usage(NOTIFY_USAGE))?;
                if content.is_empty() {
                    return Err(CommandError::Usage(NOTIFY_USAGE));
                }
                Ok(Self::Notify {
                    receiver_id: parse_id(receiver_id)?,
                    kind: kind.to_string(),
                    content: content.to_string(),
                })
            }
            "/online" => Ok(Self::Online),
            "/help" => Ok(Self::Help),
            "/quit" | "/exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// The WebSocket event this command sends as `user_id`, if any.
    pub fn to_client_event(&self, user_id: i64) -> Option<ClientEvent> {
        match self {
            Self::Message {
                receiver_id,
                inbox_id,
                text,
            } => Some(ClientEvent::SendMessage(SendMessagePayload {
                sender_id: user_id,
                receiver_id: *receiver_id,
                text: text.clone(),
                inbox_id: *inbox_id,
            })),
            Self::Notify {
                receiver_id,
                kind,
                content,
            } => Some(ClientEvent::SendNotification(SendNotificationPayload {
                r#type: kind.clone(),
                receiver_id: *receiver_id,
                sender_id: user_id,
                content: content.clone(),
            })),
            Self::Online | Self::Help | Self::Quit => None,
        }
    }
}

/// Split off the first whitespace-delimited word.
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let (word, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    Some((word, rest.trim_start()))
}

fn parse_id(value: &str) -> Result<i64, CommandError> {
    match value.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CommandError::InvalidId(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_msg() {
        // テスト項目: /msg は本文の空白を保持する
        // given (前提条件):
        let line = "/msg 2 7 hello   there";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::Message {
                receiver_id: 2,
                inbox_id: 7,
                text: "hello   there".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_msg_errors() {
        // テスト項目: 引数不足や不正な ID はエラー
        assert_eq!(Command::parse("/msg 2 7"), Err(CommandError::Usage(MSG_USAGE)));
        assert_eq!(Command::parse("/msg"), Err(CommandError::Usage(MSG_USAGE)));
        assert_eq!(
            Command::parse("/msg bob 7 hi"),
            Err(CommandError::InvalidId("bob".to_string()))
        );
        assert_eq!(
            Command::parse("/msg 2 0 hi"),
            Err(CommandError::InvalidId("0".to_string()))
        );
    }

    #[test]
    fn test_parse_notify() {
        // テスト項目: /notify は種別と内容に分かれる
        assert_eq!(
            Command::parse("/notify 3 follow Alice followed you"),
            Ok(Command::Notify {
                receiver_id: 3,
                kind: "follow".to_string(),
                content: "Alice followed you".to_string(),
            })
        );
        assert_eq!(
            Command::parse("/notify 3 follow"),
            Err(CommandError::Usage(NOTIFY_USAGE))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        // テスト項目: 引数なしのコマンドと未知のコマンド
        assert_eq!(Command::parse("/online"), Ok(Command::Online));
        assert_eq!(Command::parse("  /quit  "), Ok(Command::Quit));
        assert_eq!(Command::parse("/exit"), Ok(Command::Quit));
        assert_eq!(Command::parse("/help"), Ok(Command::Help));
        assert_eq!(
            Command::parse("hello"),
            Err(CommandError::Unknown("hello".to_string()))
        );
    }

    #[test]
    fn test_to_client_event() {
        // テスト項目: 送信者 ID が付与された WebSocket イベントになる
        // given (前提条件):
        let command = Command::parse("/msg 2 7 hi").unwrap();

        // when (操作):
        let event = command.to_client_event(1);

        // then (期待する結果):
        let json = serde_json::to_value(event.unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "sendMessage",
                "data": {"senderId": 1, "receiverId": 2, "text": "hi", "inboxId": 7}
            })
        );
        assert!(Command::Online.to_client_event(1).is_none());
    }

    #[test]
    fn test_notify_to_client_event_uses_type_field() {
        // テスト項目: 通知の種別は "type" として送られる
        let command = Command::parse("/notify 3 follow hello").unwrap();
        let json = serde_json::to_value(command.to_client_event(1).unwrap()).unwrap();
        assert_eq!(json["event"], "sendNotification");
        assert_eq!(json["data"]["type"], "follow");
        assert_eq!(json["data"]["receiverId"], 3);
        assert_eq!(json["data"]["senderId"], 1);
    }
}
