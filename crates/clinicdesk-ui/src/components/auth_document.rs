//! Authenticated document attachment
//!
//! Same loading pipeline as [`AuthMedia`](super::AuthMedia); once the payload
//! is in, the user gets a button that saves it to disk under the suggested
//! filename.

use std::path::PathBuf;

use clinicdesk_media::{HandleRegistry, MediaError, MediaKind, MediaResult};
use dioxus::prelude::*;
use rfd::FileDialog;
use tracing::{info, warn};

use super::auth_media::AuthMedia;
use crate::services::use_media_services;

/// Protected document attachment
///
/// # Examples
///
/// ```rust,ignore
/// rsx! {
///     AuthDocument {
///         resource_reference: "/files/7",
///         filename: "discharge-summary.pdf",
///     }
/// }
/// ```
#[component]
pub fn AuthDocument(
    resource_reference: String,
    /// Suggested filename; falls back to "document"
    #[props(default)]
    filename: String,
    /// Local handle to show instead of fetching (e.g. an upload in progress)
    #[props(default)]
    preview_reference: Option<String>,
    #[props(default = true)]
    lazy: bool,
    #[props(default)]
    class: Option<String>,
) -> Element {
    rsx! {
        AuthMedia {
            resource_reference,
            kind: MediaKind::Document,
            display_label: filename,
            preview_reference,
            lazy,
            class,
        }
    }
}

/// Where a save is at
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed,
}

impl SaveStatus {
    /// Short note shown next to the button, if any.
    pub fn note(&self) -> Option<&'static str> {
        match self {
            SaveStatus::Idle => None,
            SaveStatus::Saving => Some("Saving..."),
            SaveStatus::Saved => Some("Saved"),
            SaveStatus::Failed => Some("Could not save"),
        }
    }
}

/// Download affordance for a loaded document handle
#[component]
pub fn DocumentLink(href: String, filename: String) -> Element {
    let services = use_media_services();
    let mut status = use_signal(SaveStatus::default);

    let on_save = {
        let href = href.clone();
        let filename = filename.clone();
        move |_: MouseEvent| {
            let handles = services.handles.clone();
            let href = href.clone();
            let filename = filename.clone();
            spawn(async move {
                status.set(SaveStatus::Saving);
                match save_document(&handles, &href, filename).await {
                    Ok(Some(path)) => {
                        info!(path = %path.display(), "Document saved");
                        status.set(SaveStatus::Saved);
                    }
                    Ok(None) => status.set(SaveStatus::Idle),
                    Err(e) => {
                        warn!(href = %href, error = %e, "Failed to save document");
                        status.set(SaveStatus::Failed);
                    }
                }
            });
        }
    };

    rsx! {
        div { class: "media-frame__document",
            span { class: "media-frame__document-icon", "📄" }
            span { class: "media-frame__document-name", title: "{filename}", "{filename}" }
            button {
                class: "btn btn--secondary",
                disabled: status() == SaveStatus::Saving,
                onclick: on_save,
                "Download"
            }
            if let Some(note) = status().note() {
                span { class: "media-frame__document-note", "{note}" }
            }
        }
    }
}

/// Ask where to save the payload behind `href`, then write it there.
///
/// Returns `Ok(None)` if the user cancelled the dialog.
pub async fn save_document(
    handles: &HandleRegistry,
    href: &str,
    filename: String,
) -> MediaResult<Option<PathBuf>> {
    let blob = handles
        .resolve(href)
        .ok_or_else(|| MediaError::Handle(format!("{} is no longer live", href)))?;

    let chosen = tokio::task::spawn_blocking(move || {
        FileDialog::new()
            .set_title("Save document")
            .set_file_name(filename)
            .save_file()
    })
    .await
    .map_err(|e| MediaError::Io(std::io::Error::other(e)))?;

    let Some(path) = chosen else {
        return Ok(None);
    };
    tokio::fs::write(&path, &blob.bytes).await?;
    Ok(Some(path))
}
