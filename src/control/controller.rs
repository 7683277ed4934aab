use std::sync::Arc;

use super::Command;
use crate::buffer::{BufferStatus, TimeShiftBuffer};
use crate::config::SeekStep;

/// Result of applying one command
#[derive(Debug, Clone, PartialEq)]
pub struct ControlEvent {
    /// Short transient message for the status line, e.g. `-0.5s`
    pub message: Option<String>,
    /// Buffer state right after the command was applied
    pub status: BufferStatus,
}

/// Maps control commands onto buffer operations
///
/// Plays the role of front-panel button handlers: each command becomes
/// one buffer call, is logged, and yields the message the display
/// should flash.
pub struct Controller {
    buffer: Arc<TimeShiftBuffer>,
    seek_step: SeekStep,
}

impl Controller {
    pub fn new(buffer: Arc<TimeShiftBuffer>, seek_step: SeekStep) -> Self {
        Self { buffer, seek_step }
    }

    pub fn buffer(&self) -> &Arc<TimeShiftBuffer> {
        &self.buffer
    }

    /// Apply `command` to the buffer
    ///
    /// `Quit` and `Status` leave the buffer untouched.
    pub fn handle(&self, command: Command) -> ControlEvent {
        let sample_rate = self.buffer.sample_rate();

        let message = match command {
            Command::Backward(step) => {
                let step = step.unwrap_or(self.seek_step);
                self.buffer.move_backward(step.to_frames(sample_rate));
                log::info!(
                    "Moved playback backward by {:.1} seconds",
                    step.as_secs(sample_rate)
                );
                Some(format!("-{:.1}s", step.as_secs(sample_rate)))
            }
            Command::Forward(step) => {
                let step = step.unwrap_or(self.seek_step);
                self.buffer.move_forward(step.to_frames(sample_rate));
                log::info!(
                    "Moved playback forward by {:.1} seconds",
                    step.as_secs(sample_rate)
                );
                Some(format!("+{:.1}s", step.as_secs(sample_rate)))
            }
            Command::Pause => {
                self.buffer.pause();
                log::info!("Playback paused");
                None
            }
            Command::Resume => {
                self.buffer.resume();
                log::info!("Playback resumed");
                None
            }
            Command::TogglePause => {
                let paused = self.buffer.toggle_pause();
                log::info!("Playback {}", if paused { "paused" } else { "resumed" });
                None
            }
            Command::Live => {
                self.buffer.reset_to_live();
                log::info!("Playback reset to live");
                Some("Live Reset".to_string())
            }
            Command::Status | Command::Quit => None,
        };

        ControlEvent {
            message,
            status: self.buffer.status(),
        }
    }
}
