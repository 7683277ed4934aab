pub mod capture;
pub mod channels;
pub mod device;
pub mod playback;
pub mod source;

pub use capture::AudioCapture;
pub use channels::remap_channels;
pub use device::list_devices;
pub use playback::AudioPlayback;
pub use source::{AudioSource, WavFileSource};
