//! Diagnostics Page
//!
//! Live handle registry and viewport observer counters. A `live` count that
//! keeps growing while scrolling back and forth is a leak.

use std::time::Duration;

use clinicdesk_media::HandleStats;
use clinicdesk_ui::{use_media_services, MediaServices};
use dioxus::prelude::*;

use crate::components::{NavHeader, NavLocation};

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Counters at one point in time
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub handles: HandleStats,
    pub pending_observations: usize,
    pub base_url: String,
    pub tenant: String,
}

impl Snapshot {
    pub fn capture(services: &MediaServices) -> Self {
        let config = services.client.config();
        Self {
            handles: services.handles.stats(),
            pending_observations: services.viewport.pending(),
            base_url: config.base_url.clone(),
            tenant: config.tenant_id.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[component]
pub fn Diagnostics() -> Element {
    let services = use_media_services();
    let mut snapshot = use_signal({
        let services = services.clone();
        move || Snapshot::capture(&services)
    });

    use_future(move || {
        let services = services.clone();
        async move {
            loop {
                tokio::time::sleep(REFRESH_INTERVAL).await;
                snapshot.set(Snapshot::capture(&services));
            }
        }
    });

    let current = snapshot();
    let rows = [
        ("Handles allocated", current.handles.allocated.to_string()),
        ("Handles released", current.handles.released.to_string()),
        ("Handles live", current.handles.live.to_string()),
        ("Targets awaiting visibility", current.pending_observations.to_string()),
        ("Backend", current.base_url.clone()),
        ("Tenant", current.tenant.clone()),
    ];

    rsx! {
        div { class: "app-shell",
            NavHeader { current: NavLocation::Diagnostics }
            main { class: "diagnostics",
                table { class: "diagnostics-table",
                    tbody {
                        for (label, value) in rows {
                            tr { key: "{label}",
                                th { "{label}" }
                                td { "{value}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
