use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::channels::remap_channels;
use super::device::{describe, find_device};
use crate::buffer::TimeShiftBuffer;
use crate::config::AudioConfig;
use crate::error::{Result, TimeShiftError};

/// Output stream draining a time-shift buffer to the speakers
///
/// The cpal callback is the buffer's single consumer. It reads exactly as
/// many frames as the device asks for (silence while paused) and remaps
/// them from the buffer's channel count to the device's.
pub struct AudioPlayback {
    stream: cpal::Stream,
}

impl AudioPlayback {
    /// Open the output device and start reading from `buffer`
    pub fn new(config: &AudioConfig, buffer: Arc<TimeShiftBuffer>) -> Result<Self> {
        let host = cpal::default_host();

        let device = match config.output_device.as_deref() {
            Some(name) => find_device(host.output_devices(), name)?,
            None => host
                .default_output_device()
                .ok_or_else(|| TimeShiftError::AudioDevice("No output device found".into()))?,
        };
        log::info!("Output device: {}", describe(&device));

        let stream_config = cpal::StreamConfig {
            channels: config.output_channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.block_size as u32),
        };

        let in_channels = buffer.channels();
        let out_channels = config.output_channels as usize;
        let mut scratch: Vec<i16> = vec![0; config.block_size * in_channels];

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    if in_channels == out_channels {
                        if let Err(e) = buffer.read_into(data) {
                            log::error!("Playback read failed: {}", e);
                            data.fill(0);
                        }
                        return;
                    }

                    let frames = data.len() / out_channels;
                    // Only grows when the host hands us a larger period than configured
                    if scratch.len() < frames * in_channels {
                        scratch.resize(frames * in_channels, 0);
                    }
                    let block = &mut scratch[..frames * in_channels];
                    if let Err(e) = buffer.read_into(block) {
                        log::error!("Playback read failed: {}", e);
                        block.fill(0);
                    }
                    remap_channels(block, in_channels, data, out_channels);
                },
                |err| log::warn!("Output stream error: {}", err),
                None,
            )
            .map_err(|e| TimeShiftError::AudioStream(format!("{}", e)))?;

        stream
            .play()
            .map_err(|e| TimeShiftError::AudioStream(format!("{}", e)))?;

        Ok(Self { stream })
    }
}

impl Drop for AudioPlayback {
    fn drop(&mut self) {
        let _ = self.stream.pause();
    }
}
