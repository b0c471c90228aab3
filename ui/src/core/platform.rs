//! Platform glue: user-facing blocking notifications.

use dioxus::logger::tracing::warn;

/// Show a blocking notification. Browsers get `window.alert`; native builds
/// only log, the inline error banner carries the message there.
pub fn notify_user(message: &str) {
    warn!("user notification: {message}");

    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
