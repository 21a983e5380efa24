//! Conversation context for ClinicDesk.
//!
//! ## Usage
//!
//! ```ignore
//! // In App component
//! use_context_provider(|| conversation);
//!
//! // In child components
//! let conversation = use_conversation();
//! ```

use dioxus::prelude::*;

use crate::conversation::Conversation;

/// Get the conversation loaded at startup.
pub fn get_conversation() -> Option<Conversation> {
    crate::get_conversation()
}

/// Hook to access the current conversation.
pub fn use_conversation() -> Signal<Option<Conversation>> {
    use_context::<Signal<Option<Conversation>>>()
}
