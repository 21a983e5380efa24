//! Shared media services and the provider component that wires them into the
//! webview.

use std::sync::Arc;

use clinicdesk_media::{
    AuthenticatedClient, ChannelBackend, ClientConfig, HandleRegistry, MediaResult,
    ObserverCommand, ObserverOptions, ViewportRegistry,
};
use dioxus::desktop::use_asset_handler;
use dioxus::desktop::wry::http::{header::CONTENT_TYPE, Response, StatusCode};
use dioxus::prelude::*;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::observer::run_observer_bridge;

/// Everything a media component needs, shared across the whole tree
#[derive(Clone)]
pub struct MediaServices {
    pub client: AuthenticatedClient,
    pub handles: HandleRegistry,
    pub viewport: ViewportRegistry,
    commands: Arc<Mutex<Option<UnboundedReceiver<ObserverCommand>>>>,
}

impl MediaServices {
    /// Build the client, an empty handle registry and a viewport registry
    /// with the default observer options.
    pub fn new(config: ClientConfig) -> MediaResult<Self> {
        Self::with_options(config, ObserverOptions::default())
    }

    pub fn with_options(config: ClientConfig, options: ObserverOptions) -> MediaResult<Self> {
        let client = AuthenticatedClient::new(config)?;
        let (backend, commands) = ChannelBackend::new();
        Ok(Self {
            client,
            handles: HandleRegistry::new(),
            viewport: ViewportRegistry::new(options, backend),
            commands: Arc::new(Mutex::new(Some(commands))),
        })
    }

    /// Hand out the observer command stream. Only the first caller gets it.
    pub(crate) fn take_commands(&self) -> Option<UnboundedReceiver<ObserverCommand>> {
        self.commands.lock().take()
    }
}

/// Get the media services from context.
pub fn use_media_services() -> MediaServices {
    use_context::<MediaServices>()
}

/// Serves handles to the webview and runs the shared viewport observer.
///
/// Mount once, above every [`AuthMedia`](crate::AuthMedia).
#[component]
pub fn MediaProvider(children: Element) -> Element {
    let services = use_media_services();

    let handles = services.handles.clone();
    use_asset_handler(clinicdesk_media::handle::HANDLE_PREFIX, move |request, responder| {
        responder.respond(serve_handle(&handles, &request.uri().to_string()));
    });

    use_effect(move || {
        match services.take_commands() {
            Some(commands) => {
                spawn(run_observer_bridge(services.viewport.clone(), commands));
            }
            None => warn!("Viewport observer already running, ignoring second provider"),
        }
    });

    rsx! { {children} }
}

/// Build the asset response for a handle path.
pub fn serve_handle(handles: &HandleRegistry, path: &str) -> Response<Vec<u8>> {
    let (status, content_type, body) = match handles.resolve(path) {
        Some(blob) => (StatusCode::OK, blob.content_type.as_str().to_string(), blob.bytes.to_vec()),
        None => {
            debug!(path, "Request for released or unknown handle");
            (StatusCode::NOT_FOUND, "text/plain".to_string(), Vec::new())
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Ok(value) = content_type.parse() {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdesk_media::{Blob, ContentType, HandleAllocator};

    #[test]
    fn serves_live_handles_with_their_content_type() {
        let handles = HandleRegistry::new();
        let url = handles
            .allocate(Blob::new(b"%PDF-1.7".to_vec(), ContentType::parse(Some("application/pdf"))))
            .unwrap();

        let response = serve_handle(&handles, &format!("dioxus://index.html{}", url));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
        assert_eq!(response.body(), b"%PDF-1.7");

        handles.release(url);
    }

    #[test]
    fn released_handles_are_not_found() {
        let handles = HandleRegistry::new();
        let url = handles
            .allocate(Blob::new(b"ID3".to_vec(), ContentType::parse(Some("audio/mpeg"))))
            .unwrap();
        let path = url.as_str().to_string();
        handles.release(url);

        let response = serve_handle(&handles, &path);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.body().is_empty());
    }

    #[test]
    fn commands_are_taken_once() {
        let services = MediaServices::new(ClientConfig::default()).unwrap();
        let clone = services.clone();
        assert!(services.take_commands().is_some());
        assert!(clone.take_commands().is_none());
    }
}
