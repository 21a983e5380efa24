//! Media loader state machine
//!
//! One [`MediaLoader`] per mounted media component. It decides when to fetch,
//! owns the resulting handle, and discards results that arrive for a request
//! that is no longer current.
//!
//! ## Phases
//!
//! ```text
//!            visible + reference           success
//!   Idle ─────────────────────────► Loading ───────► Ready
//!     ▲                                │
//!     │ (hidden, lazy)                 │ failure
//!     │                                ▼
//!     └─────── new reference ◄──────  Error
//! ```
//!
//! `Ready` and `Error` stay put until the reference (or preview) changes or
//! the gate opens. There is no automatic retry.
//!
//! ## Tickets
//!
//! Every fetch the loader asks for is described by a [`FetchTicket`] carrying
//! a token. Tokens increase monotonically per loader; only a completion whose
//! token is the latest one issued is applied. Anything else is dropped before
//! a handle is allocated for it, so a stale response can never leak.
//!
//! ## Example
//!
//! ```
//! use clinicdesk_media::{
//!     Completion, FetchResponse, HandleRegistry, MediaKind, MediaLoader, MediaRequest, Phase,
//! };
//!
//! let registry = HandleRegistry::new();
//! let request = MediaRequest::new("/media/42", MediaKind::Document).eager();
//! let mut loader = MediaLoader::new(request, registry.clone());
//!
//! let ticket = loader.start().expect("eager loader fetches at once");
//! assert_eq!(loader.state().phase(), Phase::Loading);
//!
//! let response = FetchResponse::new(b"%PDF-1.7".to_vec(), Some("application/pdf"));
//! assert_eq!(loader.complete(&ticket, Ok(response)), Completion::Applied);
//! assert_eq!(registry.stats().live, 1);
//!
//! drop(loader);
//! assert_eq!(registry.stats().live, 0);
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::MediaResult;
use crate::fetch::FetchResponse;
use crate::handle::{Blob, HandleAllocator, ObjectUrl};
use crate::render::{RenderInput, RenderPlan};
use crate::request::MediaRequest;
use crate::visibility::VisibilityGate;

/// Discrete load state of one media instance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Waiting for the gate to open
    #[default]
    Idle,
    /// Fetch in flight
    Loading,
    /// Content (or deliberate emptiness) available
    Ready,
    /// Fetch or decode failed
    Error,
}

/// Monotonic per-loader request counter
pub type RequestToken = u64;

/// Describes one fetch the caller should perform
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: RequestToken,
    pub reference: String,
}

/// What [`MediaLoader::complete`] did with a result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Payload became the current handle
    Applied,
    /// Failure recorded as the current state
    Failed,
    /// Result belonged to a superseded request or a torn-down loader
    Discarded,
}

/// Observable loader state
#[derive(Debug, Default)]
pub struct LoadState {
    phase: Phase,
    handle: Option<ObjectUrl>,
    preview: Option<String>,
    error_message: Option<&'static str>,
    visible: bool,
}

impl LoadState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Handle owned by this instance, if any.
    pub fn local_handle(&self) -> Option<&ObjectUrl> {
        self.handle.as_ref()
    }

    /// Borrowed preview in use, if any.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// What to point the element at: owned handle first, then preview.
    pub fn source(&self) -> Option<&str> {
        self.handle
            .as_ref()
            .map(ObjectUrl::as_str)
            .or(self.preview.as_deref())
    }

    /// Present iff the phase is `Error`.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error_message
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Fetch-and-handle lifecycle for one media instance
pub struct MediaLoader<A: HandleAllocator> {
    request: MediaRequest,
    gate: VisibilityGate,
    state: LoadState,
    allocator: A,
    issued: RequestToken,
    in_flight: Option<RequestToken>,
    started: bool,
    torn_down: bool,
}

impl<A: HandleAllocator> std::fmt::Debug for MediaLoader<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaLoader")
            .field("reference", &self.request.resource_reference)
            .field("kind", &self.request.kind)
            .field("state", &self.state)
            .field("issued", &self.issued)
            .field("in_flight", &self.in_flight)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl<A: HandleAllocator> MediaLoader<A> {
    /// Create an idle loader. Call [`start`](Self::start) to evaluate it.
    pub fn new(request: MediaRequest, allocator: A) -> Self {
        let gate = VisibilityGate::new(request.lazy);
        Self {
            state: LoadState {
                visible: gate.is_visible(),
                ..LoadState::default()
            },
            request,
            gate,
            allocator,
            issued: 0,
            in_flight: None,
            started: false,
            torn_down: false,
        }
    }

    pub fn request(&self) -> &MediaRequest {
        &self.request
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Latest token handed out, zero before the first run.
    pub fn latest_token(&self) -> RequestToken {
        self.issued
    }

    /// Evaluate the mount-time state. Returns a ticket if a fetch is due.
    pub fn start(&mut self) -> Option<FetchTicket> {
        self.started = true;
        self.run()
    }

    /// Bring the loader in line with `request`: starts it on the first call,
    /// behaves like [`update`](Self::update) afterwards.
    pub fn apply(&mut self, request: MediaRequest) -> Option<FetchTicket> {
        if self.started {
            return self.update(request);
        }
        if self.request.lazy != request.lazy {
            self.gate = VisibilityGate::new(request.lazy);
            self.state.visible = self.gate.is_visible();
        }
        self.request = request;
        self.start()
    }

    /// The render target came into view. One-way; repeated calls are no-ops.
    pub fn mark_visible(&mut self) -> Option<FetchTicket> {
        if self.torn_down || !self.gate.reveal() {
            return None;
        }
        self.state.visible = true;
        self.run()
    }

    /// Apply new props.
    ///
    /// A changed reference, kind or preview re-runs the pipeline (releasing the
    /// current handle). Label changes are applied in place.
    pub fn update(&mut self, request: MediaRequest) -> Option<FetchTicket> {
        if self.torn_down {
            return None;
        }

        let source_changed = self.request.source_differs(&request);
        let revealed = self.gate.set_lazy(request.lazy);
        self.state.visible = self.gate.is_visible();
        self.request = request;

        if source_changed || revealed {
            self.run()
        } else {
            None
        }
    }

    /// Feed back the outcome of the fetch described by `ticket`.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: MediaResult<FetchResponse>,
    ) -> Completion {
        if self.torn_down || self.in_flight != Some(ticket.token) {
            debug!(
                token = ticket.token,
                latest = self.issued,
                reference = %ticket.reference,
                "Discarding stale media result"
            );
            return Completion::Discarded;
        }
        self.in_flight = None;

        let kind = self.request.kind;
        let allocated = result
            .and_then(|response| Blob::decode(response.bytes, response.content_type, kind))
            .and_then(|blob| self.allocator.allocate(blob));

        match allocated {
            Ok(url) => {
                self.release_owned();
                debug!(reference = %ticket.reference, handle = %url, "Media ready");
                self.state.handle = Some(url);
                self.state.phase = Phase::Ready;
                Completion::Applied
            }
            Err(e) => {
                warn!(
                    reference = %ticket.reference,
                    %kind,
                    error = %e,
                    "Failed to load media"
                );
                self.state.phase = Phase::Error;
                self.state.error_message = Some(e.user_message(kind));
                Completion::Failed
            }
        }
    }

    /// Release everything this instance owns and ignore any later
    /// completion. Idempotent; also run on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.issued += 1;
        self.in_flight = None;
        self.release_owned();
        self.state.preview = None;
        debug!(reference = %self.request.resource_reference, "Media loader torn down");
    }

    /// Current render plan.
    pub fn render_plan(&self) -> RenderPlan {
        RenderPlan::select(&RenderInput {
            phase: self.state.phase,
            kind: self.request.kind,
            source: self.state.source(),
            error_message: self.state.error_message,
            is_visible: self.state.visible,
            label: &self.request.display_label,
        })
    }

    fn run(&mut self) -> Option<FetchTicket> {
        if self.torn_down {
            return None;
        }

        // Every run supersedes whatever was in flight.
        self.issued += 1;
        self.in_flight = None;
        self.release_owned();
        self.state.preview = None;
        self.state.error_message = None;

        if let Some(preview) = self.request.preview() {
            self.state.preview = Some(preview.to_string());
            self.state.phase = Phase::Ready;
            return None;
        }

        if !self.request.has_reference() {
            self.state.phase = Phase::Ready;
            return None;
        }

        if !self.gate.is_visible() {
            self.state.phase = Phase::Idle;
            return None;
        }

        self.state.phase = Phase::Loading;
        self.in_flight = Some(self.issued);
        debug!(
            token = self.issued,
            reference = %self.request.resource_reference,
            "Issuing media fetch"
        );
        Some(FetchTicket {
            token: self.issued,
            reference: self.request.resource_reference.clone(),
        })
    }

    fn release_owned(&mut self) {
        if let Some(url) = self.state.handle.take() {
            self.allocator.release(url);
        }
    }
}

impl<A: HandleAllocator> Drop for MediaLoader<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}
