//! Viewport visibility gating
//!
//! Lazy media waits until its render target is within (or close to) the
//! viewport before any network work starts.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  VisibilityGate: per-instance one-way flag (hidden -> visible)  │
//! │                                                                 │
//! │  ViewportRegistry: one process-wide observer, many targets      │
//! │  ├── subscribe(target) -> VisibilitySubscription                │
//! │  ├── dispatch(report)  -> fires the target's subscription once  │
//! │  └── drop(subscription) -> target is unobserved                 │
//! │                                                                 │
//! │  ViewportBackend: the real observer (JS IntersectionObserver)   │
//! │  ├── observe(target)                                            │
//! │  └── unobserve(target)                                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A subscription resolves at most once. After the first qualifying report
//! the target is unobserved; later reports for it are ignored.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// Pre-fetch margin around the viewport, in device-independent pixels
pub const DEFAULT_ROOT_MARGIN_PX: u32 = 50;

/// Fraction of the target that must intersect
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// How the shared observer is configured
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    pub root_margin_px: u32,
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ObserverOptions {
    /// CSS margin string, e.g. `50px`
    pub fn root_margin(&self) -> String {
        format!("{}px", self.root_margin_px)
    }

    /// Whether a report is enough to reveal its target.
    ///
    /// Edge-adjacent reports (intersecting with a zero ratio) count: the
    /// margin already places the target within reach.
    pub fn qualifies(&self, report: &IntersectionReport) -> bool {
        report.is_intersecting && (report.ratio >= self.threshold || report.ratio == 0.0)
    }
}

/// One observer entry, as reported by the webview
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionReport {
    /// Element id of the render target
    pub target: String,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Instruction for the real observer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "target", rename_all = "lowercase")]
pub enum ObserverCommand {
    Observe(String),
    Unobserve(String),
}

/// The real intersection observer behind the registry.
pub trait ViewportBackend: Send + Sync {
    fn observe(&self, target: &str);
    fn unobserve(&self, target: &str);
}

/// Backend that forwards commands over a channel to whatever task owns the
/// real observer.
#[derive(Clone, Debug)]
pub struct ChannelBackend {
    commands: mpsc::UnboundedSender<ObserverCommand>,
}

impl ChannelBackend {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ObserverCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        (Self { commands }, receiver)
    }
}

impl ViewportBackend for ChannelBackend {
    fn observe(&self, target: &str) {
        if self.commands.send(ObserverCommand::Observe(target.to_string())).is_err() {
            trace!(target = %target, "Observer task gone, observe dropped");
        }
    }

    fn unobserve(&self, target: &str) {
        if self.commands.send(ObserverCommand::Unobserve(target.to_string())).is_err() {
            trace!(target = %target, "Observer task gone, unobserve dropped");
        }
    }
}

struct Waiter {
    id: u64,
    sender: oneshot::Sender<()>,
}

struct RegistryInner {
    options: ObserverOptions,
    backend: Box<dyn ViewportBackend>,
    waiting: Mutex<HashMap<String, Waiter>>,
    next_id: AtomicU64,
}

/// Process-wide multiplexer of one-shot visibility subscriptions
#[derive(Clone)]
pub struct ViewportRegistry {
    inner: Arc<RegistryInner>,
}

impl fmt::Debug for ViewportRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportRegistry")
            .field("options", &self.inner.options)
            .field("pending", &self.pending())
            .finish()
    }
}

impl ViewportRegistry {
    pub fn new(options: ObserverOptions, backend: impl ViewportBackend + 'static) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                options,
                backend: Box::new(backend),
                waiting: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.inner.options
    }

    /// Start watching `target`. The subscription resolves on the first
    /// qualifying report and unobserves the target when dropped.
    ///
    /// Subscribing a target that already has a subscription supersedes it;
    /// the older one resolves as cancelled.
    pub fn subscribe(&self, target: impl Into<String>) -> VisibilitySubscription {
        let target = target.into();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();

        let replaced = self
            .inner
            .waiting
            .lock()
            .insert(target.clone(), Waiter { id, sender })
            .is_some();

        if !replaced {
            self.inner.backend.observe(&target);
        }
        debug!(target = %target, replaced, "Observing render target");

        VisibilitySubscription {
            target,
            id,
            registry: self.clone(),
            receiver: Some(receiver),
        }
    }

    /// Feed one observer report in. Returns whether it revealed a target.
    pub fn dispatch(&self, report: &IntersectionReport) -> bool {
        if !self.inner.options.qualifies(report) {
            trace!(target = %report.target, ratio = report.ratio, "Report below threshold");
            return false;
        }

        let waiter = self.inner.waiting.lock().remove(&report.target);
        match waiter {
            Some(waiter) => {
                self.inner.backend.unobserve(&report.target);
                debug!(target = %report.target, ratio = report.ratio, "Render target revealed");
                // Receiver may already be gone if the component unmounted.
                let _ = waiter.sender.send(());
                true
            }
            None => false,
        }
    }

    /// Targets still waiting for their first qualifying report.
    pub fn pending(&self) -> usize {
        self.inner.waiting.lock().len()
    }

    fn cancel(&self, target: &str, id: u64) {
        let mut waiting = self.inner.waiting.lock();
        if waiting.get(target).is_some_and(|w| w.id == id) {
            waiting.remove(target);
            drop(waiting);
            self.inner.backend.unobserve(target);
            debug!(target = %target, "Stopped observing render target");
        }
    }
}

/// Handle on one pending visibility notification
pub struct VisibilitySubscription {
    target: String,
    id: u64,
    registry: ViewportRegistry,
    receiver: Option<oneshot::Receiver<()>>,
}

impl fmt::Debug for VisibilitySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilitySubscription")
            .field("target", &self.target)
            .field("resolved", &self.receiver.is_none())
            .finish()
    }
}

impl VisibilitySubscription {
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Wait for the target to become visible.
    ///
    /// Returns `false` if the subscription was superseded instead. Once this
    /// has returned, later calls return `false` immediately. Dropping the
    /// future before it resolves keeps the subscription armed.
    pub async fn visible(&mut self) -> bool {
        let Some(receiver) = self.receiver.as_mut() else {
            return false;
        };
        let revealed = receiver.await.is_ok();
        self.receiver = None;
        revealed
    }
}

impl Drop for VisibilitySubscription {
    fn drop(&mut self) {
        self.registry.cancel(&self.target, self.id);
    }
}

/// Per-instance one-way visibility flag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityGate {
    lazy: bool,
    visible: bool,
}

impl VisibilityGate {
    /// Eager gates start (and stay) visible.
    pub fn new(lazy: bool) -> Self {
        Self {
            lazy,
            visible: !lazy,
        }
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip to visible. Returns whether this call changed anything.
    pub fn reveal(&mut self) -> bool {
        let changed = !self.visible;
        self.visible = true;
        changed
    }

    /// Apply a new `lazy` prop. Turning laziness off reveals; turning it on
    /// never hides again.
    pub fn set_lazy(&mut self, lazy: bool) -> bool {
        self.lazy = lazy;
        if lazy {
            false
        } else {
            self.reveal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingBackend {
        log: Arc<Mutex<Vec<ObserverCommand>>>,
    }

    impl ViewportBackend for RecordingBackend {
        fn observe(&self, target: &str) {
            self.log.lock().push(ObserverCommand::Observe(target.to_string()));
        }

        fn unobserve(&self, target: &str) {
            self.log.lock().push(ObserverCommand::Unobserve(target.to_string()));
        }
    }

    fn registry() -> (ViewportRegistry, Arc<Mutex<Vec<ObserverCommand>>>) {
        let backend = RecordingBackend::default();
        let log = backend.log.clone();
        (ViewportRegistry::new(ObserverOptions::default(), backend), log)
    }

    fn report(target: &str, is_intersecting: bool, ratio: f64) -> IntersectionReport {
        IntersectionReport {
            target: target.to_string(),
            is_intersecting,
            ratio,
        }
    }

    #[test]
    fn default_options_match_prefetch_margin() {
        let options = ObserverOptions::default();
        assert_eq!(options.root_margin(), "50px");
        assert!(options.qualifies(&report("a", true, 0.02)));
        assert!(options.qualifies(&report("a", true, 0.0)));
        assert!(!options.qualifies(&report("a", true, 0.005)));
        assert!(!options.qualifies(&report("a", false, 0.0)));
    }

    #[tokio::test]
    async fn subscription_fires_once_and_unobserves() {
        let (registry, log) = registry();
        let mut sub = registry.subscribe("media-1");

        assert!(!registry.dispatch(&report("media-1", false, 0.0)));
        assert!(registry.dispatch(&report("media-1", true, 0.4)));
        assert!(sub.visible().await);

        // One-shot: further reports have nobody to wake.
        assert!(!registry.dispatch(&report("media-1", true, 1.0)));
        assert!(!sub.visible().await);

        drop(sub);
        assert_eq!(
            *log.lock(),
            vec![
                ObserverCommand::Observe("media-1".to_string()),
                ObserverCommand::Unobserve("media-1".to_string()),
            ]
        );
    }

    #[test]
    fn dropping_unfired_subscription_detaches() {
        let (registry, log) = registry();
        let sub = registry.subscribe("media-2");
        assert_eq!(registry.pending(), 1);

        drop(sub);
        assert_eq!(registry.pending(), 0);
        assert_eq!(log.lock().last(), Some(&ObserverCommand::Unobserve("media-2".to_string())));
    }

    #[tokio::test]
    async fn targets_are_independent() {
        let (registry, _log) = registry();
        let mut a = registry.subscribe("a");
        let _b = registry.subscribe("b");

        assert!(registry.dispatch(&report("a", true, 1.0)));
        assert!(a.visible().await);
        assert_eq!(registry.pending(), 1);
    }

    #[tokio::test]
    async fn resubscribe_supersedes_previous() {
        let (registry, log) = registry();
        let mut old = registry.subscribe("media-3");
        let mut new = registry.subscribe("media-3");

        // Old subscription's sender was dropped when replaced.
        assert!(!old.visible().await);
        drop(old);
        assert_eq!(registry.pending(), 1, "stale drop must not cancel the newer subscription");

        assert!(registry.dispatch(&report("media-3", true, 1.0)));
        assert!(new.visible().await);
        let observes = log
            .lock()
            .iter()
            .filter(|c| matches!(c, ObserverCommand::Observe(_)))
            .count();
        assert_eq!(observes, 1);
    }

    #[tokio::test]
    async fn abandoned_wait_still_sees_later_reveal() {
        let (registry, _log) = registry();
        let mut sub = registry.subscribe("media-6");

        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(10), sub.visible()).await;
        assert!(waited.is_err());
        assert_eq!(registry.pending(), 1);

        assert!(registry.dispatch(&report("media-6", true, 1.0)));
        assert!(sub.visible().await);
        assert!(!sub.visible().await);
    }

    #[tokio::test]
    async fn channel_backend_forwards_commands() {
        let (backend, mut commands) = ChannelBackend::new();
        let registry = ViewportRegistry::new(ObserverOptions::default(), backend);

        let sub = registry.subscribe("media-4");
        drop(sub);

        assert_eq!(
            commands.recv().await,
            Some(ObserverCommand::Observe("media-4".to_string()))
        );
        assert_eq!(
            commands.recv().await,
            Some(ObserverCommand::Unobserve("media-4".to_string()))
        );
    }

    #[test]
    fn observer_command_wire_shape() {
        let json = serde_json::to_string(&ObserverCommand::Observe("media-5".to_string())).unwrap();
        assert_eq!(json, r#"{"op":"observe","target":"media-5"}"#);
    }

    #[test]
    fn gate_is_one_way() {
        let mut gate = VisibilityGate::new(true);
        assert!(!gate.is_visible());
        assert!(gate.reveal());
        assert!(!gate.reveal());
        assert!(!gate.set_lazy(true));
        assert!(gate.is_visible());

        let eager = VisibilityGate::new(false);
        assert!(eager.is_visible());

        let mut switched = VisibilityGate::new(true);
        assert!(switched.set_lazy(false));
        assert!(switched.is_visible());
    }
}
