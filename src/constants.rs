//! Default timing constants

/// Minimum lag the live read cursor keeps behind the write cursor, in seconds.
/// Keeps playback out of the block the producer is about to commit.
pub const DEFAULT_LIVE_DELAY_SECS: f32 = 0.1;

/// Seek distance of one backward/forward button press, in seconds.
pub const DEFAULT_SEEK_STEP_SECS: f32 = 0.5;

/// Status refresh period while playback is paused, in milliseconds.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 500;

/// How long a transient control message stays on the status line, in seconds.
pub const DEFAULT_MESSAGE_HOLD_SECS: f32 = 2.0;
