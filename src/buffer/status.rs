use serde::Serialize;

/// Playback state derived from the shift offset and pause flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Playing with no shift behind live
    Live,
    /// Playing behind live by a user-controlled shift
    Shifted,
    /// Output silenced, read cursor frozen
    Paused,
}

impl PlaybackState {
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }
}

/// Consistent snapshot of buffer telemetry
///
/// Taken under one lock acquisition, so all fields describe the same
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferStatus {
    pub state: PlaybackState,
    pub sample_rate: u32,
    pub capacity_frames: usize,
    pub stored_frames: usize,
    pub shift_frames: usize,
    /// Shift that `resume()` would apply right now; equals `shift_frames`
    /// while playing
    pub pending_shift_frames: usize,
    pub write_position: usize,
    pub read_position: usize,
}

impl BufferStatus {
    pub fn is_live(&self) -> bool {
        self.state == PlaybackState::Live
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Seconds of audio retained
    pub fn buffer_time(&self) -> f32 {
        self.frames_to_secs(self.stored_frames)
    }

    /// Seconds playback trails live by
    pub fn delayed_time(&self) -> f32 {
        self.frames_to_secs(self.shift_frames)
    }

    /// Seconds of retained audio older than the playback point
    pub fn future_buffer_time(&self) -> f32 {
        self.frames_to_secs(self.stored_frames.saturating_sub(self.shift_frames))
    }

    /// Seconds between live and the playback point; while paused, the
    /// delay playback would resume with
    pub fn remaining_buffer_time(&self) -> f32 {
        self.frames_to_secs(self.pending_shift_frames)
    }

    fn frames_to_secs(&self, frames: usize) -> f32 {
        frames as f32 / self.sample_rate as f32
    }
}
