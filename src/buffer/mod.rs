pub mod cursor;
pub mod ring;
pub mod status;
pub mod timeshift;

pub use ring::RingStore;
pub use status::{BufferStatus, PlaybackState};
pub use timeshift::{TimeShiftBuffer, TimeShiftState};
