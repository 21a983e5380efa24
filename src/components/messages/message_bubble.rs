//! Message Bubble Component
//!
//! WhatsApp-style bubbles, inbound on the left and clinic replies on the
//! right, with the attachment (if any) above the text.

use dioxus::prelude::*;

use super::attachment::AttachmentView;
use crate::conversation::InboxMessage;

/// Format a millisecond timestamp as local `HH:MM`
pub fn format_time(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Individual message bubble component
#[component]
pub fn MessageBubble(message: InboxMessage) -> Element {
    let (row_class, bubble_class) = if message.is_mine() {
        ("message-row message-row-sent", "message-bubble message-bubble-sent")
    } else {
        ("message-row message-row-received", "message-bubble message-bubble-received")
    };

    rsx! {
        div { class: "{row_class}",
            div { class: "{bubble_class}",
                if let Some(attachment) = message.attachment.clone() {
                    AttachmentView { attachment }
                }
                if !message.body.is_empty() {
                    div { class: "message-bubble-content", "{message.body}" }
                }
                div { class: "message-bubble-time", "{format_time(message.sent_at_ms)}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_hours_and_minutes() {
        let formatted = format_time(1_760_860_800_000);
        assert_eq!(formatted.len(), 5);
        assert_eq!(&formatted[2..3], ":");
    }

    #[test]
    fn out_of_range_time_is_blank() {
        assert_eq!(format_time(i64::MAX), "");
    }
}
