//! Form submission over the browser fetch API.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, File, FormData, Request, RequestInit, Response, Window};

use crate::config::ClientConfig;
use crate::constants::{SPECIES_NAME_FIELD, UPLOAD_FIELD};
use crate::controller::Transport;
use crate::error::ClientError;
use crate::model::UploadResult;

/// Posts forms to the configured endpoints.
pub struct FetchTransport {
    upload_endpoint: String,
    search_endpoint: String,
    timeout_ms: Option<u32>,
}

impl FetchTransport {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            upload_endpoint: config.upload_endpoint.clone(),
            search_endpoint: config.search_endpoint.clone(),
            timeout_ms: config.request_timeout_ms,
        }
    }

    async fn post_form(&self, url: &str, body: FormData) -> Result<UploadResult, ClientError> {
        let window = web_sys::window().ok_or_else(|| ClientError::Dom("no window".to_string()))?;
        let controller = AbortController::new()?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&body.into());
        init.set_signal(Some(&controller.signal()));
        let request = Request::new_with_str_and_init(url, &init)?;

        // Cleared on drop, so the timer never outlives the request
        let timeout = match self.timeout_ms {
            Some(millis) => Some(RequestTimeout::arm(&window, &controller, millis)?),
            None => None,
        };

        log::debug!("POST {}", url);
        match fetch_json(&window, &request).await {
            Err(_) if timeout.as_ref().is_some_and(RequestTimeout::fired) => {
                Err(ClientError::Timeout(self.timeout_ms.unwrap_or_default()))
            }
            outcome => outcome,
        }
    }
}

impl Transport<File> for FetchTransport {
    async fn upload_image(&self, file: &File) -> Result<UploadResult, ClientError> {
        let form = FormData::new()?;
        form.append_with_blob(UPLOAD_FIELD, file)?;
        self.post_form(&self.upload_endpoint, form).await
    }

    async fn search_by_name(&self, species_name: &str) -> Result<UploadResult, ClientError> {
        let form = FormData::new()?;
        form.append_with_str(SPECIES_NAME_FIELD, species_name)?;
        self.post_form(&self.search_endpoint, form).await
    }
}

async fn fetch_json(window: &Window, request: &Request) -> Result<UploadResult, ClientError> {
    let response: Response = JsFuture::from(window.fetch_with_request(request))
        .await?
        .dyn_into()?;

    if !response.ok() {
        log::debug!("{} answered HTTP {}", response.url(), response.status());
        return Err(ClientError::HttpStatus(response.status()));
    }

    let body = JsFuture::from(response.text()?).await?;
    let text = body
        .as_string()
        .ok_or_else(|| ClientError::Network("response body is not text".to_string()))?;
    Ok(UploadResult::from_json(&text)?)
}

/// Aborts a request when its deadline passes.
struct RequestTimeout {
    window: Window,
    handle: i32,
    fired: Rc<Cell<bool>>,
    _on_timeout: Closure<dyn FnMut()>,
}

impl RequestTimeout {
    fn arm(
        window: &Window,
        controller: &AbortController,
        millis: u32,
    ) -> Result<Self, ClientError> {
        let fired = Rc::new(Cell::new(false));
        let fired_flag = fired.clone();
        let controller = controller.clone();
        let on_timeout = Closure::wrap(Box::new(move || {
            log::warn!("Request exceeded {} ms, aborting", millis);
            fired_flag.set(true);
            controller.abort();
        }) as Box<dyn FnMut()>);

        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.as_ref().unchecked_ref(),
            i32::try_from(millis).unwrap_or(i32::MAX),
        )?;

        Ok(Self {
            window: window.clone(),
            handle,
            fired,
            _on_timeout: on_timeout,
        })
    }

    fn fired(&self) -> bool {
        self.fired.get()
    }
}

impl Drop for RequestTimeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}
