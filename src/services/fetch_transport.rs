// ============================================================================
// FETCH TRANSPORT - browser implementation of `Transport`
// ============================================================================
// JSON calls go through gloo-net (fetch). Uploads with progress go through
// XMLHttpRequest because fetch exposes no upload progress events.
// ============================================================================

use async_trait::async_trait;
use futures::channel::oneshot;
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AbortController, Blob, BlobPropertyBag, Event, FormData, ProgressEvent, RequestCredentials, XmlHttpRequest};

use crate::error::ApiError;
use crate::models::UploadProgress;
use crate::services::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, ProgressCallback, Transport};

#[derive(Clone, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }

    fn builder(request: &HttpRequest) -> RequestBuilder {
        let url = request.url.as_str();
        let builder = match request.method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Patch => Request::patch(url),
            HttpMethod::Delete => Request::delete(url),
        };

        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        };

        let builder = request
            .headers
            .iter()
            .fold(builder, |b, (name, value)| b.header(name, value));

        if request.with_credentials {
            builder.credentials(RequestCredentials::Include)
        } else {
            builder
        }
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let controller = AbortController::new().map_err(|e| ApiError::transport(js_error_text(&e)))?;
        let timed_out = Rc::new(Cell::new(false));

        // Dropping the Timeout cancels it, so it only fires while we wait
        let _timeout = request.timeout_ms.map(|ms| {
            let controller = controller.clone();
            let timed_out = timed_out.clone();
            Timeout::new(ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        });

        let signal = controller.signal();
        let builder = Self::builder(&request).abort_signal(Some(&signal));
        let built = match request.body {
            Some(ref body) => builder.body(body.clone()),
            None => builder.build(),
        }
        .map_err(|e| ApiError::transport(format!("Request build error: {}", e)))?;

        log::debug!("🌐 {} {}", request.method.as_str(), request.url);

        let response = match built.send().await {
            Ok(response) => response,
            Err(_) if timed_out.get() => {
                return Err(ApiError::Timeout(request.timeout_ms.unwrap_or_default()))
            }
            Err(_) => return Err(ApiError::transport("Network Error")),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(_) if timed_out.get() => {
                return Err(ApiError::Timeout(request.timeout_ms.unwrap_or_default()))
            }
            Err(e) => return Err(ApiError::transport(format!("Body read error: {}", e))),
        };
        Ok(HttpResponse::new(status, body))
    }

    async fn send_form(
        &self,
        url: &str,
        form: MultipartForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<HttpResponse, ApiError> {
        let form_data = build_form_data(&form).map_err(|e| ApiError::transport(js_error_text(&e)))?;

        match on_progress {
            Some(callback) => send_with_progress(url, form_data, callback).await,
            None => {
                // No Content-Type header: the browser adds the multipart boundary
                let response = Request::post(url)
                    .body(form_data)
                    .map_err(|e| ApiError::transport(format!("Request build error: {}", e)))?
                    .send()
                    .await
                    .map_err(|_| ApiError::transport("Network Error"))?;
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| ApiError::transport(format!("Body read error: {}", e)))?;
                Ok(HttpResponse::new(status, body))
            }
        }
    }
}

fn build_form_data(form: &MultipartForm) -> Result<FormData, JsValue> {
    let data = FormData::new()?;
    for (name, value) in &form.fields {
        data.append_with_str(name, value)?;
    }

    let bytes = js_sys::Uint8Array::from(form.file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&form.file.effective_content_type());
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    // Storage policies expect the file as the last part
    data.append_with_blob_and_filename(&form.file_field, &blob, &form.file.name)?;
    Ok(data)
}

async fn send_with_progress(
    url: &str,
    form_data: FormData,
    on_progress: ProgressCallback,
) -> Result<HttpResponse, ApiError> {
    let xhr = XmlHttpRequest::new().map_err(|e| ApiError::transport(js_error_text(&e)))?;
    xhr.open("POST", url)
        .map_err(|e| ApiError::transport(js_error_text(&e)))?;

    let (tx, rx) = oneshot::channel::<Result<HttpResponse, ApiError>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let progress_closure = Closure::wrap(Box::new(move |event: ProgressEvent| {
        if event.length_computable() {
            on_progress(UploadProgress::new(event.loaded() as u64, event.total() as u64));
        }
    }) as Box<dyn FnMut(ProgressEvent)>);

    let load_closure = Closure::wrap(Box::new({
        let tx = tx.clone();
        let xhr = xhr.clone();
        move |_event: Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let status = xhr.status().unwrap_or(0);
                let body = xhr.response_text().ok().flatten().unwrap_or_default();
                let _ = tx.send(Ok(HttpResponse::new(status, body)));
            }
        }
    }) as Box<dyn FnMut(Event)>);

    let error_closure = Closure::wrap(Box::new({
        let tx = tx.clone();
        move |_event: Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(ApiError::transport("Network Error")));
            }
        }
    }) as Box<dyn FnMut(Event)>);

    let upload = xhr
        .upload()
        .map_err(|e| ApiError::transport(js_error_text(&e)))?;
    upload.set_onprogress(Some(progress_closure.as_ref().unchecked_ref()));
    xhr.set_onload(Some(load_closure.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(error_closure.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(error_closure.as_ref().unchecked_ref()));

    xhr.send_with_opt_form_data(Some(&form_data))
        .map_err(|e| ApiError::transport(js_error_text(&e)))?;

    let result = rx
        .await
        .unwrap_or_else(|_| Err(ApiError::transport("Upload cancelled")));

    // Detach handlers before the closures drop
    upload.set_onprogress(None);
    xhr.set_onload(None);
    xhr.set_onerror(None);
    xhr.set_onabort(None);

    result
}

fn js_error_text(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_default()
}
