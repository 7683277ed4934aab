use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeShiftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel mismatch: {samples} samples is not a whole number of {channels}-channel frames")]
    ChannelMismatch { samples: usize, channels: usize },

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Invalid script entry {entry:?}: {reason}")]
    Script { entry: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TimeShiftError>;
