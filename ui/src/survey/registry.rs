//! Correlation registry for script-injection callbacks.
//!
//! Each submission registers a uniquely named callback backed by a one-shot
//! channel. The returned [`PendingCallback`] guard removes the entry when it
//! is dropped, whichever way the submission ends.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures_channel::oneshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const CALLBACK_PREFIX: &str = "pixpoll_jsonp_";

/// Argument the endpoint's script passes to the callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackPayload {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CallbackPayload {
    pub fn success() -> Self {
        Self {
            status: "success".into(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Clone, Default)]
pub struct CallbackRegistry {
    pending: Rc<RefCell<HashMap<String, oneshot::Sender<CallbackPayload>>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh callback name. The name is a valid JS identifier.
    pub fn register(&self) -> (PendingCallback, oneshot::Receiver<CallbackPayload>) {
        let name = format!("{CALLBACK_PREFIX}{}", Uuid::new_v4().simple());
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(name.clone(), tx);
        (
            PendingCallback {
                name,
                registry: self.clone(),
            },
            rx,
        )
    }

    /// Deliver `payload` to the waiter registered as `name`. Returns `false`
    /// for unknown or already settled names.
    pub fn resolve(&self, name: &str, payload: CallbackPayload) -> bool {
        let sender = self.pending.borrow_mut().remove(name);
        match sender {
            Some(tx) => tx.send(payload).is_ok(),
            None => false,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.pending.borrow().contains_key(name)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    fn release(&self, name: &str) {
        self.pending.borrow_mut().remove(name);
    }
}

/// Registration guard; deregisters its callback on drop.
pub struct PendingCallback {
    name: String,
    registry: CallbackRegistry,
}

impl PendingCallback {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for PendingCallback {
    fn drop(&mut self) {
        self.registry.release(&self.name);
    }
}
