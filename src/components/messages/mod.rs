//! Conversation components

mod attachment;
mod message_bubble;

pub use attachment::AttachmentView;
pub use message_bubble::{format_time, MessageBubble};
