//! ClinicDesk Media Components
//!
//! Dioxus components that show protected inbox attachments.
//!
//! ## Setup
//!
//! Build a [`MediaServices`] once at launch, hand it to the app as root
//! context and mount [`MediaProvider`] near the top of the tree. The provider
//! serves `/blob/<id>` handles to the webview and runs the single shared
//! intersection observer.
//!
//! ```rust,ignore
//! let services = MediaServices::new(config)?;
//! dioxus::LaunchBuilder::desktop()
//!     .with_context(services)
//!     .launch(App);
//!
//! #[component]
//! fn App() -> Element {
//!     rsx! {
//!         MediaProvider {
//!             AuthMedia {
//!                 resource_reference: "/media/42",
//!                 kind: MediaKind::Image,
//!                 display_label: "Wound photo",
//!             }
//!             AuthDocument { resource_reference: "/files/7", filename: "discharge.pdf" }
//!         }
//!     }
//! }
//! ```

pub mod components;
pub mod hooks;
pub mod observer;
pub mod services;

pub use components::*;
pub use hooks::{use_media_loader, MediaHandle};
pub use services::{use_media_services, MediaProvider, MediaServices};
