//! Media kinds and content-type handling
//!
//! A [`MediaKind`] is what the caller *declares* an attachment to be; a
//! [`ContentType`] is what the server *says* the payload is. The loader uses
//! both: the kind picks the rendered element, the content type is attached to
//! the allocated handle and checked for obvious mismatches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// Content type used when the server does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Declared kind of a media attachment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image, rendered inline
    #[default]
    Image,
    /// Video clip with playback controls
    Video,
    /// Audio clip / voice note with playback controls
    Audio,
    /// Anything else, offered as a download
    Document,
}

impl MediaKind {
    /// All kinds, in display order.
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Image,
        MediaKind::Video,
        MediaKind::Audio,
        MediaKind::Document,
    ];

    /// Lowercase name as used in fixtures and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
        }
    }

    /// Infer a kind from a content type essence (`image/png` -> `Image`).
    ///
    /// Anything that is not image, video or audio is a document.
    pub fn from_content_type(content_type: &ContentType) -> Self {
        match content_type.top_level() {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            "audio" => MediaKind::Audio,
            _ => MediaKind::Document,
        }
    }

    /// Infer a kind from an optional MIME type, falling back to the file
    /// extension of `name`.
    pub fn from_mime_or_extension(mime: Option<&str>, name: &str) -> Self {
        if let Some(mime) = mime.filter(|m| !m.trim().is_empty()) {
            return Self::from_content_type(&ContentType::parse(Some(mime)));
        }

        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg" | "heic" => MediaKind::Image,
            "mp4" | "mov" | "webm" | "mkv" | "3gp" | "avi" => MediaKind::Video,
            "mp3" | "ogg" | "opus" | "m4a" | "wav" | "aac" | "amr" => MediaKind::Audio,
            _ => MediaKind::Document,
        }
    }

    /// Whether a payload with this content type can be shown as this kind.
    ///
    /// Documents accept anything. Media kinds reject textual payloads, which
    /// is what a login page or JSON error body served with a 200 looks like.
    pub fn accepts(&self, content_type: &ContentType) -> bool {
        match self {
            MediaKind::Document => true,
            MediaKind::Image | MediaKind::Video | MediaKind::Audio => !content_type.is_textual(),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            "document" => Ok(MediaKind::Document),
            other => Err(MediaError::Config(format!("Unknown media kind: {}", other))),
        }
    }
}

/// Normalized content type (lowercase essence, parameters stripped)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentType(String);

impl ContentType {
    /// Parse a `Content-Type` header value.
    ///
    /// `audio/ogg; codecs=opus` becomes `audio/ogg`. A missing, blank or
    /// malformed header becomes `application/octet-stream`.
    pub fn parse(header: Option<&str>) -> Self {
        let essence = header
            .and_then(|h| h.split(';').next())
            .map(|e| e.trim().to_ascii_lowercase())
            .filter(|e| {
                e.split_once('/')
                    .is_some_and(|(top, sub)| !top.is_empty() && !sub.is_empty())
            });

        match essence {
            Some(essence) => Self(essence),
            None => Self::octet_stream(),
        }
    }

    /// `application/octet-stream`
    pub fn octet_stream() -> Self {
        Self(DEFAULT_CONTENT_TYPE.to_string())
    }

    /// The full essence, e.g. `image/png`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the slash, e.g. `image`.
    pub fn top_level(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    /// Text documents and structured text error bodies.
    pub fn is_textual(&self) -> bool {
        self.top_level() == "text"
            || matches!(
                self.0.as_str(),
                "application/json" | "application/problem+json" | "application/xhtml+xml"
            )
    }

    /// Raster formats whose magic bytes can be verified.
    pub fn raster_format(&self) -> Option<image::ImageFormat> {
        match self.0.as_str() {
            "image/png" => Some(image::ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(image::ImageFormat::Jpeg),
            "image/webp" => Some(image::ImageFormat::WebP),
            "image/gif" => Some(image::ImageFormat::Gif),
            _ => None,
        }
    }
}

impl Default for ContentType {
    fn default() -> Self {
        Self::octet_stream()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
