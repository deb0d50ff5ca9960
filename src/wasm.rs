use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, Event, EventTarget};

use crate::config::ClientConfig;
use crate::constants::classes;
use crate::controller::FormController;
use crate::dom::DomPage;
use crate::error::ClientError;
use crate::http::FetchTransport;
use crate::render::ResultRenderer;

type PageController = FormController<DomPage, FetchTransport>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = ClientConfig::load_from_local_storage().unwrap_or_default();
    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::log_1(&format!("Logger setup failed: {}", e).into());
    }
    log::info!("SpeciScan WASM starting...");

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        log::error!("No document available, nothing to bind");
        return;
    };

    if document.ready_state() == "loading" {
        let result = listen(&document, "DOMContentLoaded", move |_| bind_or_log(&config));
        if let Err(e) = result {
            log::error!("{}", e);
        }
    } else {
        bind_or_log(&config);
    }
}

fn bind_or_log(config: &ClientConfig) {
    match bind_page(config) {
        Ok(()) => log::info!("✓ Page bound"),
        Err(e) => log::error!("{}", e),
    }
}

/// Attach every page handler to a shared controller.
fn bind_page(config: &ClientConfig) -> Result<(), ClientError> {
    let page = DomPage::acquire()?;
    let transport = FetchTransport::from_config(config);
    let renderer = ResultRenderer::new(config.placeholder_image_url.as_str());
    let controller = Rc::new(FormController::new(page, transport, renderer));

    bind_file_selection(&controller)?;
    bind_forms(&controller)?;
    bind_chips(&controller)?;
    Ok(())
}

fn bind_file_selection(controller: &Rc<PageController>) -> Result<(), ClientError> {
    let page = controller.page();

    let ctrl = controller.clone();
    listen(page.upload_zone(), "dragover", move |event| {
        event.prevent_default();
        ctrl.page().set_dragover(true);
    })?;

    let ctrl = controller.clone();
    listen(page.upload_zone(), "dragleave", move |_| {
        ctrl.page().set_dragover(false);
    })?;

    let ctrl = controller.clone();
    listen(page.upload_zone(), "drop", move |event| {
        event.prevent_default();
        ctrl.page().set_dragover(false);

        let files = event
            .dyn_ref::<DragEvent>()
            .and_then(DragEvent::data_transfer)
            .and_then(|transfer| transfer.files());
        if let Some(files) = files.filter(|files| files.length() > 0) {
            ctrl.page().mirror_dropped_files(&files);
            ctrl.file_selected();
        }
    })?;

    let ctrl = controller.clone();
    listen(page.file_input(), "change", move |_| ctrl.file_selected())
}

fn bind_forms(controller: &Rc<PageController>) -> Result<(), ClientError> {
    let ctrl = controller.clone();
    listen(controller.page().upload_form(), "submit", move |event| {
        event.prevent_default();
        let ctrl = ctrl.clone();
        // Failures are already reported to the user
        spawn_local(async move {
            let _ = ctrl.submit_upload().await;
        });
    })?;

    let ctrl = controller.clone();
    listen(controller.page().name_form(), "submit", move |event| {
        event.prevent_default();
        let ctrl = ctrl.clone();
        spawn_local(async move {
            let _ = ctrl.submit_name().await;
        });
    })
}

fn bind_chips(controller: &Rc<PageController>) -> Result<(), ClientError> {
    let chips = controller.page().chips()?;
    log::debug!("Binding {} suggestion chips", chips.len());

    for chip in chips {
        let ctrl = controller.clone();
        let target = chip.clone();
        listen(&target, "click", move |_| {
            let species = chip
                .get_attribute(classes::CHIP_SPECIES_ATTR)
                .unwrap_or_default();
            let ctrl = ctrl.clone();
            spawn_local(async move {
                let _ = ctrl.choose_suggestion(&species).await;
            });
        })?;
    }
    Ok(())
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), ClientError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget(); // Leak the closure to keep it alive
    Ok(())
}
