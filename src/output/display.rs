use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::{Formatter, StatusOutput};
use crate::buffer::BufferStatus;
use crate::control::DeferredAction;

/// Status line renderer with a transient message slot
///
/// A message stays attached to every rendered line until `hold` has
/// passed since it was last set; setting a new one restarts the timer.
pub struct StatusDisplay {
    formatter: Box<dyn Formatter>,
    message: Arc<Mutex<Option<String>>>,
    clear: DeferredAction,
    hold: Duration,
}

impl StatusDisplay {
    pub fn new(formatter: Box<dyn Formatter>, hold: Duration) -> std::io::Result<Self> {
        let message = Arc::new(Mutex::new(None));
        let slot = message.clone();
        let clear = DeferredAction::new("status-message", move || {
            slot.lock().take();
        })?;

        Ok(Self {
            formatter,
            message,
            clear,
            hold,
        })
    }

    pub fn show_message(&self, message: impl Into<String>) {
        *self.message.lock() = Some(message.into());
        self.clear.schedule(self.hold);
    }

    pub fn current_message(&self) -> Option<String> {
        self.message.lock().clone()
    }

    pub fn has_message(&self) -> bool {
        self.message.lock().is_some()
    }

    pub fn render(&self, status: &BufferStatus) -> String {
        let message = self.message.lock();
        self.formatter.format(&StatusOutput {
            status,
            message: message.as_deref(),
        })
    }
}
