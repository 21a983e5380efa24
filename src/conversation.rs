//! Inbox conversation model
//!
//! A conversation is one WhatsApp thread with a patient. The desktop app
//! loads it from a JSON fixture (`--conversation`) or falls back to the
//! bundled sample.

use std::path::Path;

use anyhow::{Context, Result};
use clinicdesk_media::{MediaKind, MediaRequest};
use serde::{Deserialize, Serialize};

const SAMPLE_CONVERSATION: &str = include_str!("../fixtures/sample_conversation.json");

/// One WhatsApp thread
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub messages: Vec<InboxMessage>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// From the patient
    Inbound,
    /// From the clinic
    Outbound,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id: String,
    pub direction: Direction,
    /// Milliseconds since the epoch
    pub sent_at_ms: i64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

impl InboxMessage {
    pub fn is_mine(&self) -> bool {
        self.direction == Direction::Outbound
    }
}

/// Media attached to a message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Protected resource path or URL
    pub reference: String,
    /// Explicit kind; inferred from `mime_type`/`filename` when absent
    #[serde(default)]
    pub kind: Option<MediaKind>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub caption: String,
    /// Local handle of an outgoing attachment that is still uploading
    #[serde(default)]
    pub preview: Option<String>,
}

impl Attachment {
    pub fn kind(&self) -> MediaKind {
        self.kind.unwrap_or_else(|| {
            MediaKind::from_mime_or_extension(self.mime_type.as_deref(), &self.filename)
        })
    }

    /// Alt text for media, filename for documents.
    pub fn label(&self) -> &str {
        match self.kind() {
            MediaKind::Document => &self.filename,
            _ if !self.caption.is_empty() => &self.caption,
            _ => &self.filename,
        }
    }

    pub fn to_request(&self) -> MediaRequest {
        let request = MediaRequest::new(self.reference.clone(), self.kind()).with_label(self.label());
        match &self.preview {
            Some(preview) => request.with_preview(preview.clone()),
            None => request,
        }
    }
}

impl Conversation {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read conversation {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse conversation {}", path.display()))
    }

    /// The bundled demo thread.
    pub fn sample() -> Result<Self> {
        serde_json::from_str(SAMPLE_CONVERSATION).context("Bundled sample conversation is invalid")
    }

    pub fn attachment_count(&self) -> usize {
        self.messages.iter().filter(|m| m.attachment.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sample_covers_every_kind() {
        let conversation = Conversation::sample().unwrap();
        let kinds: Vec<MediaKind> = conversation
            .messages
            .iter()
            .filter_map(|m| m.attachment.as_ref().map(Attachment::kind))
            .collect();

        for kind in MediaKind::ALL {
            assert!(kinds.contains(&kind), "sample lacks a {} attachment", kind);
        }
        assert_eq!(conversation.attachment_count(), kinds.len());
    }

    #[test]
    fn kind_is_inferred_when_absent() {
        let attachment = Attachment {
            reference: "/media/1".to_string(),
            kind: None,
            mime_type: Some("audio/ogg; codecs=opus".to_string()),
            filename: "PTT-0001.opus".to_string(),
            caption: String::new(),
            preview: None,
        };
        assert_eq!(attachment.kind(), MediaKind::Audio);

        let by_extension = Attachment {
            mime_type: None,
            filename: "scan.PNG".to_string(),
            ..attachment.clone()
        };
        assert_eq!(by_extension.kind(), MediaKind::Image);

        let explicit = Attachment {
            kind: Some(MediaKind::Document),
            ..attachment
        };
        assert_eq!(explicit.kind(), MediaKind::Document);
    }

    #[test]
    fn request_carries_label_and_preview() {
        let attachment = Attachment {
            reference: "/media/9".to_string(),
            kind: Some(MediaKind::Image),
            mime_type: None,
            filename: "IMG-0009.jpg".to_string(),
            caption: "Rash on forearm".to_string(),
            preview: Some("/blob/01HV0000000000000000000000".to_string()),
        };
        let request = attachment.to_request();
        assert_eq!(request.display_label, "Rash on forearm");
        assert_eq!(request.preview(), Some("/blob/01HV0000000000000000000000"));
        assert!(request.lazy);
    }

    #[test]
    fn documents_are_labelled_by_filename() {
        let attachment = Attachment {
            reference: "/files/7".to_string(),
            kind: None,
            mime_type: Some("application/pdf".to_string()),
            filename: "discharge-summary.pdf".to_string(),
            caption: "Discharge".to_string(),
            preview: None,
        };
        assert_eq!(attachment.label(), "discharge-summary.pdf");
    }

    #[test]
    fn uploading_document_uses_local_preview() {
        let attachment = Attachment {
            reference: "/files/8".to_string(),
            kind: None,
            mime_type: Some("application/pdf".to_string()),
            filename: "referral.pdf".to_string(),
            caption: String::new(),
            preview: Some("/blob/01HV0000000000000000000001".to_string()),
        };
        let request = attachment.to_request();
        assert_eq!(request.kind, MediaKind::Document);
        assert_eq!(request.preview(), Some("/blob/01HV0000000000000000000001"));
        assert!(!request.needs_fetch());
    }

    #[test]
    fn loads_fixture_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("thread.json");
        std::fs::write(
            &path,
            r#"{"contact_name":"Ward 4","messages":[{"id":"m1","direction":"outbound","sent_at_ms":0,"body":"hello"}]}"#,
        )
        .unwrap();

        let conversation = Conversation::from_file(&path).unwrap();
        assert_eq!(conversation.contact_name, "Ward 4");
        assert!(conversation.messages[0].is_mine());
        assert!(conversation.messages[0].attachment.is_none());
    }

    #[test]
    fn malformed_fixture_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("thread.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(Conversation::from_file(&path).is_err());
    }
}
