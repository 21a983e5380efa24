use dioxus::prelude::*;
use clinicdesk_ui::MediaProvider;

use crate::context::get_conversation;
use crate::conversation::Conversation;
use crate::pages::{Diagnostics, Inbox};
use crate::theme::GLOBAL_STYLES;

/// Application routes.
///
/// - `/` - The conversation with its attachments
/// - `/diagnostics` - Handle and observer counters
#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[route("/")]
    Inbox {},
    #[route("/diagnostics")]
    Diagnostics {},
}

/// Root application component.
///
/// Provides global styles, the conversation context, media services and
/// routing.
#[component]
pub fn App() -> Element {
    let conversation: Signal<Option<Conversation>> = use_signal(get_conversation);
    use_context_provider(|| conversation);

    rsx! {
        style { {GLOBAL_STYLES} }
        MediaProvider {
            Router::<Route> {}
        }
    }
}
