pub mod audio;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod control;
pub mod error;
pub mod output;
pub mod processing;
pub mod wav;

pub use buffer::{BufferStatus, PlaybackState, TimeShiftBuffer, TimeShiftState};
pub use config::TimeShiftConfig;
pub use error::{Result, TimeShiftError};
pub use processing::TimeShiftProcessor;
pub use wav::save_wav;
