use std::rc::Rc;

use client_core::{resolve_endpoint, ChatWidgetController, HttpQueryTransport};
use shared::{error::WidgetError, protocol::CHAT_FORM_SELECTOR};
use tracing::{error, warn};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlFormElement, Window};

use crate::{
    dom_view::{js_error, DomChatView},
    widget_settings_from_attr, SETTINGS_ATTRIBUTE,
};

#[wasm_bindgen(start)]
pub fn start() {
    tracing_wasm::set_as_global_default();

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if document.ready_state() != "loading" {
        run_mount(&window, document);
        return;
    }

    let ready_document = document.clone();
    let on_ready = Closure::once_into_js(move || run_mount(&window, ready_document));
    if let Err(err) =
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
    {
        error!(error = ?err, "failed to wait for DOMContentLoaded");
    }
}

fn run_mount(window: &Window, document: Document) {
    if let Err(err) = mount(window, document) {
        error!(code = ?err.code(), error = %err, "chat widget failed to mount");
    }
}

fn mount(window: &Window, document: Document) -> Result<(), WidgetError> {
    let form = document
        .query_selector(CHAT_FORM_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());
    let settings = widget_settings_from_attr(
        form.as_ref()
            .and_then(|form| form.get_attribute(SETTINGS_ATTRIBUTE))
            .as_deref(),
    );

    // Resolved against the document url like `fetch`; a failure surfaces per submission.
    let endpoint = window
        .location()
        .href()
        .map_err(js_error)
        .and_then(|href| resolve_endpoint(&href, &settings.endpoint_path));
    if let Err(err) = &endpoint {
        warn!(error = %err, "chat endpoint unresolved; queries will fail");
    }

    let view = DomChatView::locate(document, form.as_ref());
    let controller = Rc::new(ChatWidgetController::new(
        view,
        HttpQueryTransport::resolved(endpoint),
        settings,
    ));
    controller.init();

    let Some(form) = form else {
        warn!("{CHAT_FORM_SELECTOR} not found; submissions are not handled");
        return Ok(());
    };

    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let controller = Rc::clone(&controller);
        spawn_local(async move {
            controller.submit().await;
        });
    });
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(js_error)?;
    // The handler lives as long as the page.
    on_submit.forget();
    Ok(())
}
