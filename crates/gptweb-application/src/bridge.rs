//! Display protocol bridge.
//!
//! Outbound half of the channel between a chat session and its rendering
//! surface. At most one surface is attached at a time; messages posted while
//! none is attached are dropped, not queued.

use std::sync::{Mutex, MutexGuard};

use gptweb_core::protocol::OutboundMessage;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Default)]
pub struct DisplayBridge {
    surface: Mutex<Option<UnboundedSender<OutboundMessage>>>,
}

impl DisplayBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a new surface, replacing any previous one, and returns its
    /// receiving end.
    pub fn attach(&self) -> UnboundedReceiver<OutboundMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.attach_sender(tx);
        rx
    }

    /// Attaches an existing sender as the surface.
    pub fn attach_sender(&self, sender: UnboundedSender<OutboundMessage>) {
        *self.surface() = Some(sender);
    }

    pub fn detach(&self) {
        *self.surface() = None;
    }

    pub fn is_attached(&self) -> bool {
        self.surface().is_some()
    }

    /// Delivers `message` to the attached surface in FIFO order.
    ///
    /// A surface whose receiver has gone away is detached.
    pub fn post(&self, message: OutboundMessage) {
        let mut surface = self.surface();
        let Some(sender) = surface.as_ref() else {
            tracing::trace!("[DisplayBridge] No surface attached, dropping {:?}", message);
            return;
        };

        if sender.send(message).is_err() {
            tracing::debug!("[DisplayBridge] Surface closed, detaching");
            *surface = None;
        }
    }

    fn surface(&self) -> MutexGuard<'_, Option<UnboundedSender<OutboundMessage>>> {
        self.surface
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
