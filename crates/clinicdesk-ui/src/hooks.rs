//! `use_media_loader`: the glue between a [`MediaLoader`] and a component.
//!
//! The loader lives for as long as the component does. Prop changes go
//! through [`MediaLoader::apply`], visibility comes from the shared
//! [`ViewportRegistry`](clinicdesk_media::ViewportRegistry), and every fetch
//! runs as a task owned by the component's scope, so unmounting cancels it.

use std::cell::RefCell;
use std::rc::Rc;

use clinicdesk_media::{
    AuthenticatedClient, FetchClient, FetchTicket, HandleRegistry, MediaLoader, MediaRequest,
    RenderPlan,
};
use dioxus::prelude::*;
use ulid::Ulid;

use crate::services::use_media_services;

type SharedLoader = Rc<RefCell<MediaLoader<HandleRegistry>>>;

/// What a media component renders from
#[derive(Clone, PartialEq)]
pub struct MediaHandle {
    /// DOM id of the element the observer watches
    pub target: String,
    /// Current render plan
    pub plan: Signal<RenderPlan>,
}

/// Fresh DOM id for one render target.
pub fn render_target_id() -> String {
    format!("media-{}", Ulid::new().to_string().to_lowercase())
}

/// Drive a [`MediaLoader`] for `request` from inside a component.
pub fn use_media_loader(request: MediaRequest) -> MediaHandle {
    let services = use_media_services();
    let target = use_hook(render_target_id);

    let loader: SharedLoader = use_hook({
        let request = request.clone();
        let handles = services.handles.clone();
        move || Rc::new(RefCell::new(MediaLoader::new(request, handles)))
    });
    let plan = use_signal(|| loader.borrow().render_plan());

    // Mount and prop changes
    use_effect(use_reactive((&request,), {
        let loader = loader.clone();
        let client = services.client.clone();
        move |(request,)| {
            let ticket = loader.borrow_mut().apply(request);
            publish(&loader, plan, ticket, &client);
        }
    }));

    // Visibility, for lazy instances only. The subscription lives in the
    // task, so unmounting unobserves the target.
    use_effect({
        let loader = loader.clone();
        let client = services.client.clone();
        let viewport = services.viewport.clone();
        let target = target.clone();
        move || {
            if loader.borrow().state().is_visible() {
                return;
            }
            let mut subscription = viewport.subscribe(target.clone());
            let loader = loader.clone();
            let client = client.clone();
            spawn(async move {
                if subscription.visible().await {
                    let ticket = loader.borrow_mut().mark_visible();
                    publish(&loader, plan, ticket, &client);
                }
            });
        }
    });

    use_drop({
        let loader = loader.clone();
        move || loader.borrow_mut().teardown()
    });

    MediaHandle { target, plan }
}

/// Push the loader's plan to the UI and run the fetch `ticket` asks for.
fn publish(
    loader: &SharedLoader,
    mut plan: Signal<RenderPlan>,
    ticket: Option<FetchTicket>,
    client: &AuthenticatedClient,
) {
    plan.set(loader.borrow().render_plan());

    let Some(ticket) = ticket else {
        return;
    };
    let loader = loader.clone();
    let client = client.clone();
    spawn(async move {
        let result = client.fetch(&ticket.reference).await;
        loader.borrow_mut().complete(&ticket, result);
        plan.set(loader.borrow().render_plan());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_ids_are_unique_and_dom_safe() {
        let a = render_target_id();
        let b = render_target_id();
        assert_ne!(a, b);
        assert!(a.starts_with("media-"));
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }
}
