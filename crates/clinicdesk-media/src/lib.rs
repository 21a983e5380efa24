//! ClinicDesk Media Core Library
//!
//! Authenticated, lazily loaded media for the ClinicDesk inbox.
//!
//! ## Overview
//!
//! Attachments in the WhatsApp inbox (scans, voice notes, videos, PDFs) sit
//! behind the tenant's authenticated API. Showing one takes four steps:
//!
//! 1. wait until the attachment is near the viewport ([`visibility`]),
//! 2. fetch it with the session's credentials ([`fetch`]),
//! 3. turn the bytes into a local handle the webview can load ([`handle`]),
//! 4. draw the right element for its kind ([`render`]).
//!
//! [`loader::MediaLoader`] ties these together per component instance and
//! guarantees every handle it allocates is released exactly once, including
//! when responses arrive out of order or after the component is gone.
//!
//! ## Quick Start
//!
//! ```ignore
//! use clinicdesk_media::{
//!     AuthenticatedClient, ClientConfig, FetchClient, HandleRegistry, MediaKind, MediaLoader,
//!     MediaRequest,
//! };
//!
//! let client = AuthenticatedClient::new(
//!     ClientConfig::default()
//!         .with_base_url("https://api.clinic.example")
//!         .with_token(token),
//! )?;
//! let registry = HandleRegistry::new();
//!
//! let request = MediaRequest::new("/media/42", MediaKind::Image).eager();
//! let mut loader = MediaLoader::new(request, registry.clone());
//!
//! if let Some(ticket) = loader.start() {
//!     let result = client.fetch(&ticket.reference).await;
//!     loader.complete(&ticket, result);
//! }
//!
//! println!("{:?}", loader.render_plan());
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod handle;
pub mod kind;
pub mod loader;
pub mod logging;
pub mod render;
pub mod request;
pub mod visibility;

// Re-exports
pub use config::ClientConfig;
pub use error::{MediaError, MediaResult, DOCUMENT_FAILURE_MESSAGE, MEDIA_FAILURE_MESSAGE};
pub use fetch::{AuthenticatedClient, FetchClient, FetchResponse};
pub use handle::{Blob, HandleAllocator, HandleRegistry, HandleStats, ObjectUrl};
pub use kind::{ContentType, MediaKind};
pub use loader::{Completion, FetchTicket, LoadState, MediaLoader, Phase, RequestToken};
pub use render::{RenderInput, RenderPlan};
pub use request::MediaRequest;
pub use visibility::{
    ChannelBackend, IntersectionReport, ObserverCommand, ObserverOptions, ViewportBackend,
    ViewportRegistry, VisibilityGate, VisibilitySubscription,
};
