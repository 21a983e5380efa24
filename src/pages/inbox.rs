//! Inbox Page
//!
//! One WhatsApp thread, oldest message first. Attachments load as they
//! scroll into view.

use dioxus::prelude::*;

use crate::components::messages::MessageBubble;
use crate::components::{NavHeader, NavLocation};
use crate::context::use_conversation;

#[component]
pub fn Inbox() -> Element {
    let conversation = use_conversation();
    let messages = conversation
        .read()
        .as_ref()
        .map(|c| c.messages.clone())
        .unwrap_or_default();

    rsx! {
        div { class: "app-shell",
            NavHeader { current: NavLocation::Inbox }
            main { class: "conversation",
                if messages.is_empty() {
                    div { class: "conversation-empty", "No messages in this conversation yet." }
                }
                for message in messages {
                    MessageBubble { key: "{message.id}", message: message.clone() }
                }
            }
        }
    }
}
