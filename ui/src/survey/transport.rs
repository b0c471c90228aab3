//! Script-injection transports.
//!
//! A transport loads the submission URL as a script. When that script calls
//! the registered callback, the transport forwards the argument to the
//! [`CallbackRegistry`]. The browser build injects a real `<script>` element;
//! native builds fetch the script text and evaluate the single call it makes.

use url::Url;

use super::error::SubmissionError;
use super::registry::{CallbackPayload, CallbackRegistry};

#[allow(async_fn_in_trait)]
pub trait ScriptTransport {
    /// Load `url` as a script expected to invoke `callback`. Completes once the
    /// script has been loaded; fails only when the fetch itself fails.
    async fn inject(
        &self,
        url: &Url,
        callback: &str,
        registry: &CallbackRegistry,
    ) -> Result<(), SubmissionError>;
}

/// Extract the argument of `callback(...)` from a script body.
pub fn parse_script_call(body: &str, callback: &str) -> Option<CallbackPayload> {
    let body = body.trim().trim_start_matches("/**/").trim_start();
    let args = body.strip_prefix(callback)?.trim_start().strip_prefix('(')?;
    let args = args
        .trim_end()
        .trim_end_matches(';')
        .trim_end()
        .strip_suffix(')')?;
    Some(serde_json::from_str(args.trim()).unwrap_or_default())
}

#[cfg(target_arch = "wasm32")]
pub type PlatformTransport = browser::BrowserScriptTransport;

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformTransport = native::HttpScriptTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use dioxus::logger::tracing::debug;
    use url::Url;

    use super::{parse_script_call, ScriptTransport};
    use crate::survey::error::SubmissionError;
    use crate::survey::registry::CallbackRegistry;

    #[derive(Clone, Default)]
    pub struct HttpScriptTransport {
        client: reqwest::Client,
    }

    impl ScriptTransport for HttpScriptTransport {
        async fn inject(
            &self,
            url: &Url,
            callback: &str,
            registry: &CallbackRegistry,
        ) -> Result<(), SubmissionError> {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|err| SubmissionError::Network(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SubmissionError::Network(format!("HTTP {status}")));
            }

            let body = response
                .text()
                .await
                .map_err(|err| SubmissionError::Network(err.to_string()))?;

            // A script that never calls back is left to the submission timeout.
            match parse_script_call(&body, callback) {
                Some(payload) => {
                    registry.resolve(callback, payload);
                }
                None => debug!(callback, "script response did not invoke the callback"),
            }
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures_channel::oneshot;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Event, HtmlScriptElement, Window};

    use super::ScriptTransport;
    use crate::survey::error::SubmissionError;
    use crate::survey::registry::{CallbackPayload, CallbackRegistry};
    use url::Url;

    type LoadSender = Rc<RefCell<Option<oneshot::Sender<Result<(), SubmissionError>>>>>;

    #[derive(Clone, Default)]
    pub struct BrowserScriptTransport;

    impl ScriptTransport for BrowserScriptTransport {
        async fn inject(
            &self,
            url: &Url,
            callback: &str,
            registry: &CallbackRegistry,
        ) -> Result<(), SubmissionError> {
            let (tx, rx) = oneshot::channel();
            let tag = ScriptTag::attach(url.as_str(), callback, registry.clone(), tx)?;
            let outcome = rx.await.unwrap_or_else(|_| {
                Err(SubmissionError::Network("script element went away".into()))
            });
            drop(tag);
            outcome
        }
    }

    /// An injected `<script>` plus its global hook. Dropping it removes both,
    /// so an abandoned submission (timeout) leaves nothing behind.
    struct ScriptTag {
        window: Window,
        name: String,
        element: HtmlScriptElement,
        _global: Closure<dyn FnMut(JsValue)>,
        _onload: Closure<dyn FnMut(Event)>,
        _onerror: Closure<dyn FnMut(Event)>,
    }

    impl ScriptTag {
        fn attach(
            src: &str,
            name: &str,
            registry: CallbackRegistry,
            loaded: oneshot::Sender<Result<(), SubmissionError>>,
        ) -> Result<Self, SubmissionError> {
            let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
            let document = window.document().ok_or_else(|| js_error("no document"))?;
            let head = document.head().ok_or_else(|| js_error("no document head"))?;

            let callback_name = name.to_string();
            let global = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                let payload = js_sys::JSON::stringify(&value)
                    .ok()
                    .and_then(|text| text.as_string())
                    .and_then(|text| serde_json::from_str::<CallbackPayload>(&text).ok())
                    .unwrap_or_default();
                registry.resolve(&callback_name, payload);
            });
            js_sys::Reflect::set(
                &window,
                &JsValue::from_str(name),
                global.as_ref().unchecked_ref(),
            )
            .map_err(js_value_error)?;

            let sender: LoadSender = Rc::new(RefCell::new(Some(loaded)));
            let onload = {
                let sender = sender.clone();
                Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                    if let Some(tx) = sender.borrow_mut().take() {
                        let _ = tx.send(Ok(()));
                    }
                })
            };
            let onerror = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                if let Some(tx) = sender.borrow_mut().take() {
                    let _ = tx.send(Err(SubmissionError::Network(
                        "script request failed".into(),
                    )));
                }
            });

            let element: HtmlScriptElement = document
                .create_element("script")
                .map_err(js_value_error)?
                .dyn_into()
                .map_err(|_| js_error("created element is not a script"))?;
            element.set_src(src);
            element.set_onload(Some(onload.as_ref().unchecked_ref()));
            element.set_onerror(Some(onerror.as_ref().unchecked_ref()));

            let tag = Self {
                window,
                name: name.to_string(),
                element,
                _global: global,
                _onload: onload,
                _onerror: onerror,
            };
            head.append_child(&tag.element).map_err(js_value_error)?;
            Ok(tag)
        }
    }

    impl Drop for ScriptTag {
        fn drop(&mut self) {
            self.element.set_onload(None);
            self.element.set_onerror(None);
            self.element.remove();
            let _ = js_sys::Reflect::delete_property(&self.window, &JsValue::from_str(&self.name));
        }
    }

    fn js_error(message: &str) -> SubmissionError {
        SubmissionError::Network(message.to_string())
    }

    fn js_value_error(value: JsValue) -> SubmissionError {
        SubmissionError::Network(format!("{value:?}"))
    }
}
