//! Tests for the Telegram channel module.

use super::polling::to_incoming;
use super::send::inline_keyboard;
use super::types::*;
use crate::utils::split_message;
use butler_core::message::{Button, Keyboard};

fn update(json: &str) -> TgUpdate {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_split_short_message() {
    let chunks = split_message("hello", 4096);
    assert_eq!(chunks, vec!["hello"]);
}

#[test]
fn test_split_long_message() {
    let text = "a\n".repeat(3000);
    let chunks = split_message(&text, 4096);
    assert!(chunks.len() >= 2);
    for chunk in &chunks {
        assert!(chunk.len() <= 4096);
    }
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_multibyte_without_newlines() {
    // Two bytes per char, odd limit forces a mid-char cut attempt.
    let text = "ж".repeat(100);
    let chunks = split_message(&text, 7);
    assert!(chunks.iter().all(|c| c.len() <= 7));
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_tg_chat_group_detection() {
    let group: TgChat = serde_json::from_str(r#"{"id": -100123, "type": "group"}"#).unwrap();
    let supergroup: TgChat =
        serde_json::from_str(r#"{"id": -100456, "type": "supergroup"}"#).unwrap();
    let private: TgChat = serde_json::from_str(r#"{"id": 789, "type": "private"}"#).unwrap();

    assert!(group.is_group());
    assert!(supergroup.is_group());
    assert!(!private.is_group());
}

#[test]
fn test_tg_chat_type_defaults_when_missing() {
    let chat: TgChat = serde_json::from_str(r#"{"id": 123}"#).unwrap();
    assert_eq!(chat.chat_type, "");
    assert!(!chat.is_group());
}

#[test]
fn test_text_message_becomes_incoming() {
    let upd = update(
        r#"{
            "update_id": 10,
            "message": {
                "message_id": 2,
                "from": {"id": 42, "first_name": "Ann", "last_name": "Lee", "username": "ann"},
                "chat": {"id": 42, "type": "private"},
                "text": "/start"
            }
        }"#,
    );
    let msg = to_incoming(upd, &[]).unwrap();
    assert_eq!(msg.sender_id, "42");
    assert_eq!(msg.sender_name.as_deref(), Some("Ann Lee"));
    assert_eq!(msg.sender_username.as_deref(), Some("ann"));
    assert_eq!(msg.reply_target.as_deref(), Some("42"));
    assert_eq!(msg.text, "/start");
    assert!(msg.callback.is_none());
    assert!(msg.is_command());
}

#[test]
fn test_callback_query_becomes_incoming() {
    let upd = update(
        r#"{
            "update_id": 11,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 42, "first_name": "Ann"},
                "message": {
                    "message_id": 77,
                    "chat": {"id": 42, "type": "private"},
                    "text": "Main menu"
                },
                "data": "action|weather"
            }
        }"#,
    );
    let msg = to_incoming(upd, &[]).unwrap();
    let cb = msg.callback.as_ref().unwrap();
    assert_eq!(cb.id, "cb-1");
    assert_eq!(cb.data, "action|weather");
    assert_eq!(cb.message_id, Some(77));
    assert_eq!(msg.text, "");
    assert!(!msg.is_command());
}

#[test]
fn test_callback_without_message_routes_to_user() {
    let upd = update(
        r#"{
            "update_id": 12,
            "callback_query": {"id": "cb-2", "from": {"id": 9, "first_name": "B"}, "data": "x|y"}
        }"#,
    );
    let msg = to_incoming(upd, &[]).unwrap();
    assert_eq!(msg.reply_target.as_deref(), Some("9"));
    assert_eq!(msg.callback.unwrap().message_id, None);
}

#[test]
fn test_unauthorized_and_group_updates_dropped() {
    let private = r#"{
        "update_id": 13,
        "message": {
            "message_id": 1,
            "from": {"id": 5, "first_name": "Eve"},
            "chat": {"id": 5, "type": "private"},
            "text": "hi"
        }
    }"#;
    assert!(to_incoming(update(private), &[1, 2]).is_none());
    assert!(to_incoming(update(private), &[5]).is_some());

    let group = r#"{
        "update_id": 14,
        "message": {
            "message_id": 1,
            "from": {"id": 5, "first_name": "Eve"},
            "chat": {"id": -100, "type": "supergroup"},
            "text": "hi"
        }
    }"#;
    assert!(to_incoming(update(group), &[]).is_none());
}

#[test]
fn test_non_text_message_dropped() {
    let upd = update(
        r#"{
            "update_id": 15,
            "message": {
                "message_id": 1,
                "from": {"id": 5, "first_name": "Eve"},
                "chat": {"id": 5, "type": "private"}
            }
        }"#,
    );
    assert!(to_incoming(upd, &[]).is_none());
}

#[test]
fn test_inline_keyboard_markup() {
    let kb = Keyboard::new(vec![
        vec![Button::new("Weather", "action|weather")],
        vec![
            Button::new("Done", "complete|daily|1|2"),
            Button::new("Later", "snooze|daily|1|2"),
        ],
    ]);
    let markup = inline_keyboard(&kb);
    let rows = markup["inline_keyboard"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].as_array().unwrap().len(), 2);
    assert_eq!(rows[0][0]["text"], "Weather");
    assert_eq!(rows[1][1]["callback_data"], "snooze|daily|1|2");
}
