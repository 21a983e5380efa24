//! Placeholder box, spinner and error indicator

use clinicdesk_media::RenderPlan;
use dioxus::prelude::*;

/// CSS modifier for a render plan
pub fn frame_modifier(plan: &RenderPlan) -> &'static str {
    match plan {
        RenderPlan::Placeholder => "placeholder",
        RenderPlan::Loading => "loading",
        RenderPlan::Error { .. } => "error",
        RenderPlan::Empty => "empty",
        RenderPlan::Image { .. } => "image",
        RenderPlan::Video { .. } => "video",
        RenderPlan::Audio { .. } => "audio",
        RenderPlan::Document { .. } => "document",
    }
}

/// Full class list for the frame around `plan`.
pub fn frame_class(plan: &RenderPlan, extra: Option<&str>) -> String {
    let mut class = format!("media-frame media-frame--{}", frame_modifier(plan));
    if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
        class.push(' ');
        class.push_str(extra);
    }
    class
}

/// Box the observer watches. Stays mounted across every phase.
#[component]
pub fn MediaFrame(
    /// DOM id registered with the viewport observer
    id: String,
    class: String,
    children: Element,
) -> Element {
    rsx! {
        div { id: "{id}", class: "{class}", {children} }
    }
}

#[component]
pub fn MediaSpinner() -> Element {
    rsx! {
        div { class: "media-frame__loading",
            div { class: "loading-spinner", role: "progressbar", "aria-label": "Loading" }
        }
    }
}

/// Inline error indicator
#[component]
pub fn MediaFailure(message: String) -> Element {
    rsx! {
        div { class: "media-frame__error", role: "alert",
            span { class: "media-frame__error-icon", "⚠" }
            span { "{message}" }
        }
    }
}
