//! Navigation Header Component
//!
//! App title, the patient the thread is with, and links between the inbox
//! and the diagnostics page.

use dioxus::prelude::*;

use crate::app::Route;
use crate::context::use_conversation;

/// Navigation location within the application
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NavLocation {
    Inbox,
    Diagnostics,
}

impl NavLocation {
    pub const ALL: [NavLocation; 2] = [NavLocation::Inbox, NavLocation::Diagnostics];

    /// Get the display name for this location
    pub fn display_name(&self) -> &'static str {
        match self {
            NavLocation::Inbox => "Inbox",
            NavLocation::Diagnostics => "Diagnostics",
        }
    }

    /// Get the route for this location
    pub fn route(&self) -> Route {
        match self {
            NavLocation::Inbox => Route::Inbox {},
            NavLocation::Diagnostics => Route::Diagnostics {},
        }
    }
}

#[component]
pub fn NavHeader(current: NavLocation) -> Element {
    let conversation = use_conversation();
    let (contact, phone) = conversation
        .read()
        .as_ref()
        .map(|c| (c.contact_name.clone(), c.contact_phone.clone()))
        .unwrap_or_default();

    rsx! {
        header { class: "nav-header",
            div { class: "nav-title",
                h1 { class: "app-title", "ClinicDesk" }
                if !contact.is_empty() {
                    span { class: "nav-contact", "{contact}" }
                }
                if !phone.is_empty() {
                    span { class: "nav-contact-phone", "{phone}" }
                }
            }
            nav { class: "nav-links",
                for location in NavLocation::ALL {
                    Link {
                        to: location.route(),
                        class: if location == current { "nav-link active" } else { "nav-link" },
                        "{location.display_name()}"
                    }
                }
            }
        }
    }
}
