//! Authenticated media element
//!
//! Fetches a protected image, video or audio clip with the session's
//! credentials once it nears the viewport, and renders it from a local handle.

use clinicdesk_media::render::{IMAGE_DECODING, IMAGE_LOADING, PLAYBACK_PRELOAD};
use clinicdesk_media::{MediaKind, MediaRequest, RenderPlan};
use dioxus::prelude::*;

use super::auth_document::DocumentLink;
use super::frame::{frame_class, MediaFailure, MediaFrame, MediaSpinner};
use crate::hooks::use_media_loader;

/// Protected media attachment
///
/// # Examples
///
/// ```rust,ignore
/// rsx! {
///     AuthMedia {
///         resource_reference: "/media/42",
///         kind: MediaKind::Image,
///         display_label: "Wound photo, day 3",
///     }
/// }
/// ```
#[component]
pub fn AuthMedia(
    /// Path or URL of the protected resource
    resource_reference: String,
    kind: MediaKind,
    /// Alt text, or the suggested filename for documents
    #[props(default)]
    display_label: String,
    /// Local handle to show instead of fetching (e.g. an outgoing draft)
    #[props(default)]
    preview_reference: Option<String>,
    /// Wait for the viewport before fetching
    #[props(default = true)]
    lazy: bool,
    /// Extra class on the frame
    #[props(default)]
    class: Option<String>,
) -> Element {
    let media = use_media_loader(MediaRequest {
        resource_reference,
        kind,
        display_label,
        preview_reference,
        lazy,
    });

    let plan = media.plan.read().clone();
    let frame = frame_class(&plan, class.as_deref());

    rsx! {
        MediaFrame { id: media.target.clone(), class: frame,
            MediaBody { plan }
        }
    }
}

/// Element for one render plan
#[component]
pub fn MediaBody(plan: RenderPlan) -> Element {
    match plan {
        RenderPlan::Placeholder | RenderPlan::Empty => rsx! {},
        RenderPlan::Loading => rsx! { MediaSpinner {} },
        RenderPlan::Error { message } => rsx! { MediaFailure { message } },
        RenderPlan::Image { src, alt } => rsx! {
            img {
                class: "media-frame__image",
                src: "{src}",
                alt: "{alt}",
                "decoding": IMAGE_DECODING,
                "loading": IMAGE_LOADING,
            }
        },
        RenderPlan::Video { src, label } => rsx! {
            video {
                class: "media-frame__video",
                src: "{src}",
                title: "{label}",
                controls: true,
                "preload": PLAYBACK_PRELOAD,
            }
        },
        RenderPlan::Audio { src, label } => rsx! {
            audio {
                class: "media-frame__audio",
                src: "{src}",
                title: "{label}",
                controls: true,
                "preload": PLAYBACK_PRELOAD,
            }
        },
        RenderPlan::Document { href, filename } => rsx! { DocumentLink { href, filename } },
    }
}
