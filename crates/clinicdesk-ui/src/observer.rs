//! Bridge between the [`ViewportRegistry`] and one IntersectionObserver in
//! the webview.
//!
//! Rust sends `{"op":"observe","target":"media-..."}` commands down the eval
//! channel; the page sends back one report per intersection change. Targets
//! that are not in the DOM yet are retried on the next few animation frames,
//! since the command can outrun the render that creates the element.

use clinicdesk_media::{IntersectionReport, ObserverCommand, ObserverOptions, ViewportRegistry};
use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, trace, warn};

/// Frames to wait for a target element before giving up on it
pub const ATTACH_ATTEMPTS: u32 = 30;

const OBSERVER_SCRIPT: &str = r#"
const observer = new IntersectionObserver((entries) => {
    for (const entry of entries) {
        dioxus.send({
            target: entry.target.id,
            is_intersecting: entry.isIntersecting,
            ratio: entry.intersectionRatio,
        });
    }
}, { rootMargin: "__ROOT_MARGIN__", threshold: __THRESHOLD__ });

const attach = (target, attempts) => {
    const element = document.getElementById(target);
    if (element) {
        observer.observe(element);
    } else if (attempts > 0) {
        requestAnimationFrame(() => attach(target, attempts - 1));
    }
};

while (true) {
    const command = await dioxus.recv();
    if (command.op === "observe") {
        attach(command.target, __ATTEMPTS__);
    } else {
        const element = document.getElementById(command.target);
        if (element) observer.unobserve(element);
    }
}
"#;

/// Render the observer script for `options`.
pub fn observer_script(options: &ObserverOptions) -> String {
    OBSERVER_SCRIPT
        .replace("__ROOT_MARGIN__", &options.root_margin())
        .replace("__THRESHOLD__", &options.threshold.to_string())
        .replace("__ATTEMPTS__", &ATTACH_ATTEMPTS.to_string())
}

/// Pump commands into the page and reports back into `registry` until
/// either side goes away.
pub async fn run_observer_bridge(
    registry: ViewportRegistry,
    mut commands: UnboundedReceiver<ObserverCommand>,
) {
    let mut eval = document::eval(&observer_script(&registry.options()));
    debug!("Viewport observer started");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("Viewport registry dropped, stopping observer");
                    break;
                };
                trace!(?command, "Observer command");
                if let Err(e) = eval.send(&command) {
                    warn!("Failed to send observer command: {:?}", e);
                    break;
                }
            }
            report = eval.recv::<IntersectionReport>() => match report {
                Ok(report) => {
                    let woke = registry.dispatch(&report);
                    trace!(target = %report.target, ratio = report.ratio, woke, "Intersection report");
                }
                Err(e) => {
                    warn!("Viewport observer stopped: {:?}", e);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_carries_observer_options() {
        let script = observer_script(&ObserverOptions::default());
        assert!(script.contains(r#"rootMargin: "50px""#));
        assert!(script.contains("threshold: 0.01"));
        assert!(script.contains(&format!("attach(command.target, {})", ATTACH_ATTEMPTS)));
        assert!(!script.contains("__"));
    }

    #[test]
    fn script_follows_custom_options() {
        let options = ObserverOptions {
            root_margin_px: 200,
            threshold: 0.5,
        };
        let script = observer_script(&options);
        assert!(script.contains(r#"rootMargin: "200px""#));
        assert!(script.contains("threshold: 0.5"));
    }
}
