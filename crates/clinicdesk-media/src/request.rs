//! Caller-supplied description of one media attachment.

use serde::{Deserialize, Serialize};

use crate::kind::MediaKind;

/// What a media component was mounted with.
///
/// # Example
///
/// ```
/// use clinicdesk_media::{MediaKind, MediaRequest};
///
/// let request = MediaRequest::new("/media/42", MediaKind::Image)
///     .with_label("X-ray, left wrist")
///     .eager();
/// assert!(!request.lazy);
/// assert!(request.needs_fetch());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRequest {
    /// Opaque locator of the protected resource (path or URL)
    pub resource_reference: String,
    /// Declared kind, picks the rendered element
    pub kind: MediaKind,
    /// Alt text for media, suggested filename for documents
    #[serde(default)]
    pub display_label: String,
    /// Already-available local handle; borrowed, never released by the loader
    #[serde(default)]
    pub preview_reference: Option<String>,
    /// Whether loading waits for the viewport
    #[serde(default = "default_lazy")]
    pub lazy: bool,
}

fn default_lazy() -> bool {
    true
}

impl MediaRequest {
    /// Lazy request with an empty label.
    pub fn new(resource_reference: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            resource_reference: resource_reference.into(),
            kind,
            display_label: String::new(),
            preview_reference: None,
            lazy: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.display_label = label.into();
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview_reference = Some(preview.into());
        self
    }

    /// Skip visibility gating.
    pub fn eager(mut self) -> Self {
        self.lazy = false;
        self
    }

    /// Preview reference, if a non-blank one was supplied.
    pub fn preview(&self) -> Option<&str> {
        self.preview_reference
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    /// Whether the reference points at anything at all.
    pub fn has_reference(&self) -> bool {
        !self.resource_reference.trim().is_empty()
    }

    /// Whether satisfying this request takes a network call.
    pub fn needs_fetch(&self) -> bool {
        self.preview().is_none() && self.has_reference()
    }

    /// Whether switching from `self` to `other` re-runs the load pipeline.
    ///
    /// Kind counts as part of the source: decode checks and failure text
    /// depend on it. Label and laziness changes are applied in place.
    pub fn source_differs(&self, other: &MediaRequest) -> bool {
        self.resource_reference != other.resource_reference
            || self.kind != other.kind
            || self.preview() != other.preview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_preview_is_ignored() {
        let request = MediaRequest::new("/media/1", MediaKind::Image).with_preview("  ");
        assert_eq!(request.preview(), None);
        assert!(request.needs_fetch());
    }

    #[test]
    fn empty_reference_needs_no_fetch() {
        let request = MediaRequest::new("", MediaKind::Video);
        assert!(!request.has_reference());
        assert!(!request.needs_fetch());
    }

    #[test]
    fn label_change_keeps_source() {
        let a = MediaRequest::new("/media/1", MediaKind::Image);
        let b = a.clone().with_label("renamed");
        let c = MediaRequest::new("/media/2", MediaKind::Image);
        assert!(!a.source_differs(&b));
        assert!(a.source_differs(&c));
    }

    #[test]
    fn kind_change_is_a_source_change() {
        let a = MediaRequest::new("/media/1", MediaKind::Document);
        let b = MediaRequest::new("/media/1", MediaKind::Image);
        assert!(a.source_differs(&b));
    }

    #[test]
    fn lazy_defaults_on_in_fixtures() {
        let request: MediaRequest =
            serde_json::from_str(r#"{"resource_reference":"/media/9","kind":"audio"}"#).unwrap();
        assert!(request.lazy);
        assert_eq!(request.kind, MediaKind::Audio);
        assert!(request.display_label.is_empty());
    }
}
