use std::sync::Arc;

use audio_thread_priority::RtPriorityHandle;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::device::{describe, find_device};
use crate::buffer::TimeShiftBuffer;
use crate::config::AudioConfig;
use crate::error::{Result, TimeShiftError};

/// Input stream feeding captured PCM into a time-shift buffer
///
/// The cpal callback is the buffer's single producer: every period it
/// calls [`TimeShiftBuffer::write`] with the block it was handed.
pub struct AudioCapture {
    stream: cpal::Stream,
    _rt_handle: Option<RtPriorityHandle>,
}

impl AudioCapture {
    /// Open the input device and start writing into `buffer`
    pub fn new(config: &AudioConfig, buffer: Arc<TimeShiftBuffer>) -> Result<Self> {
        let host = cpal::default_host();

        let device = match config.input_device.as_deref() {
            Some(name) => find_device(host.input_devices(), name)?,
            None => host
                .default_input_device()
                .ok_or_else(|| TimeShiftError::AudioDevice("No input device found".into()))?,
        };
        log::info!("Input device: {}", describe(&device));

        if buffer.channels() != config.input_channels as usize {
            return Err(TimeShiftError::Config(format!(
                "buffer stores {} channels but input is configured for {}",
                buffer.channels(),
                config.input_channels
            )));
        }

        let stream_config = cpal::StreamConfig {
            channels: config.input_channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.block_size as u32),
        };

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if let Err(e) = buffer.write(data) {
                        log::error!("Dropped capture block: {}", e);
                    }
                },
                |err| log::warn!("Input stream error: {}", err),
                None,
            )
            .map_err(|e| TimeShiftError::AudioStream(format!("{}", e)))?;

        // Attempt to promote to real-time priority
        let rt_handle = audio_thread_priority::promote_current_thread_to_real_time(
            config.block_size as u32,
            config.sample_rate,
        );

        let rt_handle = match rt_handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Could not set real-time priority: {}", e);
                None
            }
        };

        stream
            .play()
            .map_err(|e| TimeShiftError::AudioStream(format!("{}", e)))?;

        Ok(Self {
            stream,
            _rt_handle: rt_handle,
        })
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        let _ = self.stream.pause();
    }
}
