//! Local handles for fetched payloads
//!
//! A handle is the desktop equivalent of a browser object URL: a short local
//! path (`/blob/<ulid>`) that the webview can dereference while the payload
//! stays in process memory. Handles are allocated from a [`HandleRegistry`]
//! and must be released exactly once.
//!
//! # Ownership
//!
//! [`ObjectUrl`] is deliberately not `Clone`. Whoever holds it owns the
//! allocation, and [`HandleAllocator::release`] consumes it, so a second
//! release of the same handle does not type-check.
//!
//! ```text
//! fetch bytes ──► Blob::decode ──► allocate() ──► ObjectUrl ──► release(url)
//!                                       │                           │
//!                                       └──── registry entry ───────┘
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, trace};
use ulid::Ulid;

use crate::error::{MediaError, MediaResult};
use crate::kind::{ContentType, MediaKind};

/// Path segment all handles live under.
pub const HANDLE_PREFIX: &str = "blob";

/// Fetched payload plus its declared content type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub content_type: ContentType,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, content_type: ContentType) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Build a blob for `kind`, rejecting payloads that cannot be shown as it.
    ///
    /// Raster images are checked against their magic bytes; any media kind
    /// rejects empty and textual payloads. Documents are taken as they are.
    pub fn decode(bytes: Bytes, content_type: ContentType, kind: MediaKind) -> MediaResult<Self> {
        if kind != MediaKind::Document && bytes.is_empty() {
            return Err(MediaError::Decode(format!("empty {} payload", kind)));
        }

        if !kind.accepts(&content_type) {
            return Err(MediaError::Decode(format!(
                "{} payload declared as {}",
                kind, content_type
            )));
        }

        if kind == MediaKind::Image {
            if let Some(expected) = content_type.raster_format() {
                match image::guess_format(&bytes) {
                    Ok(actual) if actual == expected => {}
                    Ok(actual) => {
                        return Err(MediaError::Decode(format!(
                            "declared {} but payload is {:?}",
                            content_type, actual
                        )))
                    }
                    Err(e) => {
                        return Err(MediaError::Decode(format!(
                            "unrecognized {} payload: {}",
                            content_type, e
                        )))
                    }
                }
            }
        }

        Ok(Self::new(bytes, content_type))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An allocated local handle. Not `Clone`: exactly one owner releases it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ObjectUrl {
    id: Ulid,
    path: String,
}

impl ObjectUrl {
    fn new(id: Ulid) -> Self {
        Self {
            id,
            path: format!("/{}/{}", HANDLE_PREFIX, id),
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    /// Dereferenceable path, e.g. `/blob/01HV...`
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Allocates and releases local handles.
///
/// The loader is generic over this so tests can count calls.
pub trait HandleAllocator {
    /// Store `blob` and hand out a handle for it.
    fn allocate(&self, blob: Blob) -> MediaResult<ObjectUrl>;

    /// Drop the stored payload. Returns whether the handle was live.
    fn release(&self, url: ObjectUrl) -> bool;
}

/// Allocation counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandleStats {
    pub allocated: u64,
    pub released: u64,
    pub live: usize,
}

#[derive(Default)]
struct RegistryInner {
    entries: Mutex<HashMap<Ulid, Blob>>,
    allocated: AtomicU64,
    released: AtomicU64,
}

/// In-process handle store shared by every media component.
///
/// Cheap to clone; clones share the same entries. Each entry is owned by the
/// single component that allocated it, the registry only makes it resolvable.
#[derive(Clone, Default)]
pub struct HandleRegistry {
    inner: Arc<RegistryInner>,
}

impl fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("stats", &self.stats())
            .finish()
    }
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the payload behind a handle path.
    ///
    /// Accepts `/blob/<id>`, `blob/<id>` and full URLs ending in either, which
    /// is what the webview's asset requests look like.
    pub fn resolve(&self, path: &str) -> Option<Blob> {
        let id = parse_handle_path(path)?;
        self.inner.entries.lock().get(&id).cloned()
    }

    /// Store `blob` under `id`, leaving any existing entry untouched.
    fn insert(&self, id: Ulid, blob: Blob) -> MediaResult<ObjectUrl> {
        let size = blob.len();
        match self.inner.entries.lock().entry(id) {
            Entry::Occupied(_) => {
                return Err(MediaError::Handle(format!("handle {} already allocated", id)))
            }
            Entry::Vacant(slot) => {
                slot.insert(blob);
            }
        }
        self.inner.allocated.fetch_add(1, Ordering::SeqCst);
        debug!(handle = %id, size, "Allocated media handle");
        Ok(ObjectUrl::new(id))
    }

    pub fn stats(&self) -> HandleStats {
        HandleStats {
            allocated: self.inner.allocated.load(Ordering::SeqCst),
            released: self.inner.released.load(Ordering::SeqCst),
            live: self.inner.entries.lock().len(),
        }
    }
}

impl HandleAllocator for HandleRegistry {
    fn allocate(&self, blob: Blob) -> MediaResult<ObjectUrl> {
        self.insert(Ulid::new(), blob)
    }

    fn release(&self, url: ObjectUrl) -> bool {
        let removed = self.inner.entries.lock().remove(&url.id).is_some();
        if removed {
            self.inner.released.fetch_add(1, Ordering::SeqCst);
            debug!(handle = %url.id, "Released media handle");
        } else {
            trace!(handle = %url.id, "Release of unknown handle ignored");
        }
        removed
    }
}

fn parse_handle_path(path: &str) -> Option<Ulid> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.rsplit('/');
    let id = segments.next()?;
    let prefix = segments.next()?;
    if prefix != HANDLE_PREFIX {
        return None;
    }
    Ulid::from_string(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn png_blob() -> Blob {
        Blob::new(PNG_MAGIC.to_vec(), ContentType::parse(Some("image/png")))
    }

    #[test]
    fn allocate_then_resolve_then_release() {
        let registry = HandleRegistry::new();
        let url = registry.allocate(png_blob()).unwrap();

        assert!(url.as_str().starts_with("/blob/"));
        let resolved = registry.resolve(url.as_str()).unwrap();
        assert_eq!(resolved.content_type.as_str(), "image/png");

        assert!(registry.release(url));
        assert_eq!(
            registry.stats(),
            HandleStats {
                allocated: 1,
                released: 1,
                live: 0
            }
        );
    }

    #[test]
    fn colliding_id_keeps_existing_entry() {
        let registry = HandleRegistry::new();
        let url = registry.allocate(png_blob()).unwrap();

        let other = Blob::new(b"%PDF-1.7".to_vec(), ContentType::parse(Some("application/pdf")));
        let collided = registry.insert(url.id(), other);
        assert!(matches!(collided, Err(MediaError::Handle(_))));

        let resolved = registry.resolve(url.as_str()).unwrap();
        assert_eq!(resolved.content_type.as_str(), "image/png");
        assert_eq!(registry.stats().allocated, 1);
        assert_eq!(registry.stats().live, 1);
    }

    #[test]
    fn resolve_accepts_webview_urls() {
        let registry = HandleRegistry::new();
        let url = registry.allocate(png_blob()).unwrap();
        let id = url.id();

        assert!(registry.resolve(&format!("blob/{}", id)).is_some());
        assert!(registry
            .resolve(&format!("http://dioxus.index.html/blob/{}?v=1", id))
            .is_some());
        assert!(registry.resolve(&format!("/assets/{}", id)).is_none());
        assert!(registry.resolve("/blob/not-a-ulid").is_none());

        registry.release(url);
        assert!(registry.resolve(&format!("/blob/{}", id)).is_none());
    }

    #[test]
    fn clones_share_entries() {
        let registry = HandleRegistry::new();
        let other = registry.clone();
        let url = registry.allocate(png_blob()).unwrap();
        assert_eq!(other.stats().live, 1);
        assert!(other.release(url));
        assert_eq!(registry.stats().live, 0);
    }

    #[test]
    fn decode_checks_raster_magic() {
        let ok = Blob::decode(
            Bytes::from_static(PNG_MAGIC),
            ContentType::parse(Some("image/png")),
            MediaKind::Image,
        );
        assert!(ok.is_ok());

        let wrong = Blob::decode(
            Bytes::from_static(b"<html>session expired</html>"),
            ContentType::parse(Some("image/jpeg")),
            MediaKind::Image,
        );
        assert!(matches!(wrong, Err(MediaError::Decode(_))));
    }

    #[test]
    fn decode_rejects_empty_media_but_not_documents() {
        let empty = Blob::decode(Bytes::new(), ContentType::octet_stream(), MediaKind::Audio);
        assert!(matches!(empty, Err(MediaError::Decode(_))));

        let doc = Blob::decode(Bytes::new(), ContentType::octet_stream(), MediaKind::Document);
        assert!(doc.unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_text_bodies_for_media() {
        let result = Blob::decode(
            Bytes::from_static(b"{\"error\":\"forbidden\"}"),
            ContentType::parse(Some("application/json")),
            MediaKind::Video,
        );
        assert!(matches!(result, Err(MediaError::Decode(_))));
    }
}
