//! Render selection
//!
//! Pure mapping from a loader's observable state to what should be drawn.
//! No network, no allocation: the UI layer turns a [`RenderPlan`] into
//! elements.

use serde::Serialize;

use crate::kind::MediaKind;
use crate::loader::Phase;

/// Decoding hint for images, keeps decoding off the main thread
pub const IMAGE_DECODING: &str = "async";

/// Native loading hint for images
pub const IMAGE_LOADING: &str = "lazy";

/// Preload policy for playback elements: metadata only, no eager buffering
pub const PLAYBACK_PRELOAD: &str = "metadata";

/// Filename offered when a document has no label
pub const FALLBACK_FILENAME: &str = "document";

/// Everything the selector looks at
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderInput<'a> {
    pub phase: Phase,
    pub kind: MediaKind,
    /// Owned handle or borrowed preview, whichever is in use
    pub source: Option<&'a str>,
    pub error_message: Option<&'a str>,
    pub is_visible: bool,
    pub label: &'a str,
}

/// What to draw for one media instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "element", rename_all = "lowercase")]
pub enum RenderPlan {
    /// Sized empty box, nothing fetched yet
    Placeholder,
    /// Spinner inside the placeholder box
    Loading,
    /// Inline error indicator
    Error { message: String },
    /// Ready with nothing to show
    Empty,
    Image { src: String, alt: String },
    Video { src: String, label: String },
    Audio { src: String, label: String },
    /// Download affordance
    Document { href: String, filename: String },
}

impl RenderPlan {
    /// Pick the plan for `input`.
    pub fn select(input: &RenderInput<'_>) -> Self {
        if !input.is_visible {
            return RenderPlan::Placeholder;
        }

        match input.phase {
            // Visible but idle only happens between mount and the first fetch
            // being issued, so it already shows the spinner.
            Phase::Idle | Phase::Loading => RenderPlan::Loading,
            Phase::Error => RenderPlan::Error {
                message: input.error_message.unwrap_or_default().to_string(),
            },
            Phase::Ready => match input.source {
                None => RenderPlan::Empty,
                Some(src) => Self::ready(input.kind, src.to_string(), input.label),
            },
        }
    }

    fn ready(kind: MediaKind, src: String, label: &str) -> Self {
        let label = label.to_string();
        match kind {
            MediaKind::Image => RenderPlan::Image { src, alt: label },
            MediaKind::Video => RenderPlan::Video { src, label },
            MediaKind::Audio => RenderPlan::Audio { src, label },
            MediaKind::Document => RenderPlan::Document {
                href: src,
                filename: if label.trim().is_empty() {
                    FALLBACK_FILENAME.to_string()
                } else {
                    label
                },
            },
        }
    }

    /// Whether the plan shows fetched content.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            RenderPlan::Image { .. }
                | RenderPlan::Video { .. }
                | RenderPlan::Audio { .. }
                | RenderPlan::Document { .. }
        )
    }

    /// The handle or preview the plan points at, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            RenderPlan::Image { src, .. }
            | RenderPlan::Video { src, .. }
            | RenderPlan::Audio { src, .. } => Some(src),
            RenderPlan::Document { href, .. } => Some(href),
            _ => None,
        }
    }
}
