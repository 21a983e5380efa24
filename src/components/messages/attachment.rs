//! Attachment inside a message bubble

use clinicdesk_media::MediaKind;
use clinicdesk_ui::{AuthDocument, AuthMedia};
use dioxus::prelude::*;

use crate::conversation::Attachment;

#[component]
pub fn AttachmentView(attachment: Attachment) -> Element {
    let request = attachment.to_request();
    let kind = request.kind;
    let show_caption = !attachment.caption.is_empty() && kind != MediaKind::Image;

    rsx! {
        div { class: "message-attachment",
            if kind == MediaKind::Document {
                AuthDocument {
                    resource_reference: request.resource_reference.clone(),
                    filename: request.display_label.clone(),
                    preview_reference: request.preview_reference.clone(),
                    class: Some("message-attachment__document".to_string()),
                }
            } else {
                AuthMedia {
                    resource_reference: request.resource_reference.clone(),
                    kind,
                    display_label: request.display_label.clone(),
                    preview_reference: request.preview_reference.clone(),
                    class: Some(format!("message-attachment__{}", kind)),
                }
            }
            if show_caption {
                div { class: "message-attachment__caption", "{attachment.caption}" }
            }
        }
    }
}
