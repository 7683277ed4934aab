//! Configuration for the time-shift buffer and its audio front end.
//!
//! Every section implements `Default`, and the whole tree can be loaded
//! from a TOML file in which any key may be omitted:
//!
//! ```toml
//! [buffer]
//! past_seconds = 30
//! future_seconds = 120
//!
//! [audio]
//! sample_rate = 48000
//! output_channels = 2
//!
//! [control]
//! seek_step = "250ms"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_LIVE_DELAY_SECS, DEFAULT_MESSAGE_HOLD_SECS, DEFAULT_REFRESH_INTERVAL_MS,
    DEFAULT_SEEK_STEP_SECS,
};
use crate::error::{Result, TimeShiftError};

/// Seek distance for one backward/forward step
///
/// Either a duration or an exact frame count.
///
/// # Parsing formats
/// - `0.5s` - seconds
/// - `500ms` - milliseconds
/// - `22050` - frames (no suffix)
///
/// # Example
/// ```
/// use timeshift::config::SeekStep;
///
/// let step: SeekStep = "250ms".parse().unwrap();
/// assert_eq!(step.to_frames(44100), 11025);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum SeekStep {
    Seconds(f32),
    Frames(usize),
}

impl SeekStep {
    /// Step length in frames at the given sample rate
    pub fn to_frames(&self, sample_rate: u32) -> usize {
        match *self {
            Self::Seconds(secs) => (secs * sample_rate as f32).round() as usize,
            Self::Frames(frames) => frames,
        }
    }

    /// Step length in seconds at the given sample rate
    pub fn as_secs(&self, sample_rate: u32) -> f32 {
        match *self {
            Self::Seconds(secs) => secs,
            Self::Frames(frames) => frames as f32 / sample_rate as f32,
        }
    }
}

impl Default for SeekStep {
    fn default() -> Self {
        Self::Seconds(DEFAULT_SEEK_STEP_SECS)
    }
}

impl fmt::Display for SeekStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{}s", secs),
            Self::Frames(frames) => write!(f, "{}", frames),
        }
    }
}

impl FromStr for SeekStep {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        // "ms" must be checked before "s"
        if let Some(num) = s.strip_suffix("ms") {
            let ms: f32 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid step: {}", s))?;
            if !(ms > 0.0) {
                return Err("step must be positive".to_string());
            }
            return Ok(Self::Seconds(ms / 1000.0));
        }

        if let Some(num) = s.strip_suffix('s') {
            let secs: f32 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid step: {}", s))?;
            if !(secs > 0.0) {
                return Err("step must be positive".to_string());
            }
            return Ok(Self::Seconds(secs));
        }

        let frames: usize = s.parse().map_err(|_| format!("invalid step: {}", s))?;
        if frames == 0 {
            return Err("step must be positive".to_string());
        }
        Ok(Self::Frames(frames))
    }
}

impl TryFrom<String> for SeekStep {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// What happens when a pause outlasts the seekable history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PauseOverflow {
    /// Stay paused; on resume, playback starts from the oldest seekable frame
    #[default]
    Clamp,
    /// Give up the pause point and snap back to live playback
    ResumeLive,
}

/// System-wide configuration
///
/// # Example
/// ```
/// use timeshift::config::TimeShiftConfig;
///
/// let mut config = TimeShiftConfig::default();
/// config.buffer.past_seconds = 10.0;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeShiftConfig {
    /// Ring buffer sizing and policies
    pub buffer: BufferConfig,
    /// Audio device configuration
    pub audio: AudioConfig,
    /// Control front end configuration
    pub control: ControlConfig,
}

/// Ring buffer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// History kept behind live that can be rewound into, in seconds
    pub past_seconds: f32,
    /// Extra headroom for audio accumulated while paused, in seconds
    pub future_seconds: f32,
    /// Fixed lag of the live read cursor behind the write cursor, in seconds
    pub live_delay_secs: f32,
    /// Policy when a pause outgrows the seekable history
    pub pause_overflow: PauseOverflow,
}

/// Audio device configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frames per audio period
    pub block_size: usize,
    /// Channels captured from the input device (stored in the buffer)
    pub input_channels: u16,
    /// Channels sent to the output device
    pub output_channels: u16,
    /// Input device name substring, or the host default
    pub input_device: Option<String>,
    /// Output device name substring, or the host default
    pub output_device: Option<String>,
}

/// Control front end configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Distance of one backward/forward step
    pub seek_step: SeekStep,
    /// Status refresh period while paused, in milliseconds
    pub refresh_interval_ms: u64,
    /// How long transient messages stay visible, in seconds
    pub message_hold_secs: f32,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            past_seconds: 60.0,
            future_seconds: 300.0,
            live_delay_secs: DEFAULT_LIVE_DELAY_SECS,
            pause_overflow: PauseOverflow::Clamp,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            block_size: 1024,
            input_channels: 1,
            output_channels: 2,
            input_device: None,
            output_device: None,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            seek_step: SeekStep::default(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            message_hold_secs: DEFAULT_MESSAGE_HOLD_SECS,
        }
    }
}

impl BufferConfig {
    /// Check the buffer section on its own
    pub fn validate(&self) -> Result<()> {
        if !(self.past_seconds > 0.0) || !self.past_seconds.is_finite() {
            return Err(TimeShiftError::Config(format!(
                "past_seconds must be positive, got {}",
                self.past_seconds
            )));
        }
        if !(self.future_seconds > 0.0) || !self.future_seconds.is_finite() {
            return Err(TimeShiftError::Config(format!(
                "future_seconds must be positive, got {}",
                self.future_seconds
            )));
        }
        if !(self.live_delay_secs >= 0.0) || !self.live_delay_secs.is_finite() {
            return Err(TimeShiftError::Config(format!(
                "live_delay_secs must be zero or positive, got {}",
                self.live_delay_secs
            )));
        }
        Ok(())
    }

    /// Total ring capacity N in frames
    pub fn capacity_frames(&self, sample_rate: u32) -> usize {
        ((self.past_seconds + self.future_seconds) * sample_rate as f32).round() as usize
    }

    /// Maximum shift behind live in frames
    pub fn past_capacity_frames(&self, sample_rate: u32) -> usize {
        (self.past_seconds * sample_rate as f32).round() as usize
    }

    /// Live read delay in frames
    pub fn live_delay_frames(&self, sample_rate: u32) -> usize {
        (self.live_delay_secs * sample_rate as f32).round() as usize
    }
}

impl TimeShiftConfig {
    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TimeShiftError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| TimeShiftError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the buffer cannot be built from
    pub fn validate(&self) -> Result<()> {
        self.buffer.validate()?;
        if self.audio.sample_rate == 0 {
            return Err(TimeShiftError::Config(
                "sample_rate must be positive".to_string(),
            ));
        }
        if self.audio.input_channels == 0 || self.audio.output_channels == 0 {
            return Err(TimeShiftError::Config(
                "channel counts must be positive".to_string(),
            ));
        }
        if self.audio.block_size == 0 {
            return Err(TimeShiftError::Config(
                "block_size must be positive".to_string(),
            ));
        }
        let capacity = self.buffer.capacity_frames(self.audio.sample_rate);
        if self.audio.block_size > capacity {
            return Err(TimeShiftError::Config(format!(
                "block_size {} exceeds buffer capacity of {} frames",
                self.audio.block_size, capacity
            )));
        }
        if self.control.refresh_interval_ms == 0 {
            return Err(TimeShiftError::Config(
                "refresh_interval_ms must be positive".to_string(),
            ));
        }
        if Duration::try_from_secs_f32(self.control.message_hold_secs).is_err() {
            return Err(TimeShiftError::Config(format!(
                "message_hold_secs must be a zero or positive duration, got {}",
                self.control.message_hold_secs
            )));
        }
        let live_delay = self.buffer.live_delay_frames(self.audio.sample_rate);
        if live_delay < self.audio.block_size {
            log::warn!(
                "Live delay of {} frames is shorter than a {}-frame block; live playback will read unwritten frames",
                live_delay,
                self.audio.block_size
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_step_seconds() {
        let step: SeekStep = "0.5s".parse().unwrap();
        assert_eq!(step, SeekStep::Seconds(0.5));
        assert_eq!(step.to_frames(44100), 22050);
    }

    #[test]
    fn test_seek_step_millis() {
        let step: SeekStep = "250ms".parse().unwrap();
        assert_eq!(step.to_frames(48000), 12000);
    }

    #[test]
    fn test_seek_step_frames() {
        let step: SeekStep = "1000".parse().unwrap();
        assert_eq!(step, SeekStep::Frames(1000));
        assert_eq!(step.to_frames(44100), 1000);
    }

    #[test]
    fn test_seek_step_invalid() {
        assert!("abc".parse::<SeekStep>().is_err());
        assert!("-1s".parse::<SeekStep>().is_err());
        assert!("0ms".parse::<SeekStep>().is_err());
        assert!("0".parse::<SeekStep>().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = TimeShiftConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer.capacity_frames(44100), 360 * 44100);
        assert_eq!(config.buffer.live_delay_frames(44100), 4410);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let mut config = TimeShiftConfig::default();
        config.buffer.past_seconds = 0.0;
        assert!(matches!(config.validate(), Err(TimeShiftError::Config(_))));

        let mut config = TimeShiftConfig::default();
        config.audio.sample_rate = 0;
        assert!(config.validate().is_err());

        let mut config = TimeShiftConfig::default();
        config.audio.input_channels = 0;
        assert!(config.validate().is_err());

        let mut config = TimeShiftConfig::default();
        config.buffer.future_seconds = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unrepresentable_message_hold() {
        let mut config = TimeShiftConfig::default();
        config.control.message_hold_secs = 1e30;
        assert!(matches!(config.validate(), Err(TimeShiftError::Config(_))));

        config.control.message_hold_secs = -0.5;
        assert!(config.validate().is_err());

        config.control.message_hold_secs = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = TimeShiftConfig::from_toml_str(
            r#"
            [buffer]
            past_seconds = 2
            future_seconds = 2
            pause_overflow = "resume-live"

            [control]
            seek_step = "100ms"
            "#,
        )
        .unwrap();

        assert_eq!(config.buffer.past_seconds, 2.0);
        assert_eq!(config.buffer.pause_overflow, PauseOverflow::ResumeLive);
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.control.seek_step, SeekStep::Seconds(0.1));
    }

    #[test]
    fn test_invalid_toml_step() {
        let result = TimeShiftConfig::from_toml_str(
            r#"
            [control]
            seek_step = "fast"
            "#,
        );
        assert!(result.is_err());
    }
}
