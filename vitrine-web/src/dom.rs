use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Headers, KeyboardEvent, Request, RequestInit, Response, Storage, Window};

/// Retrieve the global `window` object.
///
/// # Panics
/// Panics if executed outside of a browser context where `window` is unavailable.
#[must_use]
pub fn window() -> Window {
    web_sys::window().expect("`window` should be available in web context")
}

/// Retrieve the document object for DOM interactions.
///
/// # Panics
/// Panics when the document cannot be accessed from the current browser window.
#[must_use]
pub fn document() -> Document {
    window()
        .document()
        .expect("`document` should exist in browser context")
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Perform a GET request and return the browser `Response`.
///
/// # Errors
/// Returns an error if the fetch request fails or the response cannot be converted to `Response`.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn fetch_response(url: &str) -> Result<Response, JsValue> {
    let resp_value = JsFuture::from(window().fetch_with_str(url)).await?;
    resp_value.dyn_into::<Response>()
}

/// POST `body` as JSON and return the browser `Response`.
///
/// # Errors
/// Returns an error if the body cannot be encoded, the request cannot be built or the fetch fails.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn post_json<T: Serialize>(url: &str, body: &T) -> Result<Response, JsValue> {
    let json = serde_json::to_string(body).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    headers.set("Accept", "application/json")?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&json));
    let request = Request::new_with_str_and_init(url, &init)?;

    let resp_value = JsFuture::from(window().fetch_with_request(&request)).await?;
    resp_value.dyn_into::<Response>()
}

/// Read a response body as text.
///
/// # Errors
/// Returns an error if the body stream cannot be read.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn response_text(response: &Response) -> Result<String, JsValue> {
    let text = JsFuture::from(response.text()?).await?;
    Ok(text.as_string().unwrap_or_default())
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Navigate away from the single-page app, e.g. to the login entry point.
pub fn redirect(href: &str) {
    if let Some(win) = web_sys::window()
        && let Err(err) = win.location().set_href(href)
    {
        console_error(&format!("redirect to {href} failed: {}", js_error_message(&err)));
    }
}

/// Document-level `keydown` listener that unregisters itself when dropped.
///
/// Keep the guard alive for as long as the listener should fire.
pub struct KeydownGuard {
    target: web_sys::EventTarget,
    closure: Closure<dyn FnMut(KeyboardEvent)>,
}

impl KeydownGuard {
    /// Attach `handler` to the document.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be registered.
    pub fn attach(handler: impl FnMut(KeyboardEvent) + 'static) -> Result<Self, JsValue> {
        let target: web_sys::EventTarget = document().into();
        let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(handler);
        target.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        Ok(Self { target, closure })
    }

    /// Fire `on_escape` whenever Escape is pressed while the guard lives.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be registered.
    pub fn on_escape(on_escape: impl Fn() + 'static) -> Result<Self, JsValue> {
        Self::attach(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                e.prevent_default();
                on_escape();
            }
        })
    }
}

impl Drop for KeydownGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("keydown", self.closure.as_ref().unchecked_ref());
    }
}

/// Copy text to the clipboard, ignoring browsers that refuse.
pub fn copy_to_clipboard(text: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.navigator().clipboard().write_text(text);
    }
}

/// Draw `payload` as a QR image inside `container` using the page's `QRCode`
/// renderer. Returns `false` when no renderer is loaded.
pub fn render_qr_code(container: &web_sys::Element, payload: &str) -> bool {
    let Ok(ctor) = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("QRCode")) else {
        return false;
    };
    let Some(ctor) = ctor.dyn_ref::<js_sys::Function>() else {
        return false;
    };
    container.set_inner_html("");
    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&options, &"text".into(), &payload.into());
    let _ = js_sys::Reflect::set(&options, &"width".into(), &JsValue::from(200));
    let _ = js_sys::Reflect::set(&options, &"height".into(), &JsValue::from(200));
    let args = js_sys::Array::of2(container, &options);
    match js_sys::Reflect::construct(ctor, &args) {
        Ok(_) => true,
        Err(err) => {
            console_error(&format!("QR render failed: {}", js_error_message(&err)));
            false
        }
    }
}
