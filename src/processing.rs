use std::collections::VecDeque;
use std::sync::Arc;

use crate::buffer::{BufferStatus, TimeShiftBuffer};
use crate::config::TimeShiftConfig;
use crate::control::{Command, ControlEvent, Controller, Script, ScriptedCommand};
use crate::error::Result;

/// Command applied during offline processing
#[derive(Debug, Clone)]
pub struct AppliedCommand {
    /// Input frame index at which it was applied
    pub frame: usize,
    pub command: Command,
    pub event: ControlEvent,
}

/// Drives a time-shift buffer block by block, the way a full-duplex audio
/// callback would: each block is written and then the same number of
/// frames is read back, under one lock acquisition.
///
/// Scripted commands fire before the first block that starts at or after
/// their time.
pub struct TimeShiftProcessor {
    controller: Controller,
    pending: VecDeque<ScriptedCommand>,
    applied: Vec<AppliedCommand>,
    block_frames: usize,
    frames_processed: usize,
}

impl TimeShiftProcessor {
    pub fn new(config: &TimeShiftConfig, script: Script) -> Result<Self> {
        config.validate()?;
        let buffer = Arc::new(TimeShiftBuffer::from_config(config)?);
        Ok(Self {
            controller: Controller::new(buffer, config.control.seek_step),
            pending: script.into_entries().into(),
            applied: Vec::new(),
            block_frames: config.audio.block_size,
            frames_processed: 0,
        })
    }

    /// Write one block and return the block played in its place
    pub fn process_block(&mut self, input: &[i16]) -> Result<Vec<i16>> {
        self.apply_due_commands();

        let buffer = self.controller.buffer();
        let mut output = vec![0; input.len()];
        buffer.process(input, &mut output)?;
        self.frames_processed += input.len() / buffer.channels();
        Ok(output)
    }

    /// Process a whole interleaved signal in configured block sizes
    pub fn process_signal(&mut self, interleaved: &[i16]) -> Result<Vec<i16>> {
        let chunk_size = self.block_frames * self.controller.buffer().channels();
        let mut played = Vec::with_capacity(interleaved.len());
        for chunk in interleaved.chunks(chunk_size) {
            played.extend(self.process_block(chunk)?);
        }
        Ok(played)
    }

    fn apply_due_commands(&mut self) {
        let sample_rate = self.controller.buffer().sample_rate();
        while let Some(next) = self.pending.front() {
            if next.at_frame(sample_rate) > self.frames_processed {
                break;
            }
            let Some(entry) = self.pending.pop_front() else {
                break;
            };
            if entry.command == Command::Quit {
                log::warn!("Ignoring quit in script at {:.2}s", entry.at_secs);
                continue;
            }

            let event = self.controller.handle(entry.command);
            log::debug!(
                "{:.2}s: {} -> {:?}, shift {} frames",
                entry.at_secs,
                entry.command,
                event.status.state,
                event.status.shift_frames
            );
            self.applied.push(AppliedCommand {
                frame: self.frames_processed,
                command: entry.command,
                event,
            });
        }
    }

    /// Commands applied so far, in order
    pub fn applied(&self) -> &[AppliedCommand] {
        &self.applied
    }

    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }

    pub fn status(&self) -> BufferStatus {
        self.controller.buffer().status()
    }

    pub fn buffer(&self) -> &Arc<TimeShiftBuffer> {
        self.controller.buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PlaybackState;

    /// 1 kHz mono, 2 s past + 2 s future, 100-frame blocks and a live
    /// delay of exactly one block, so live output echoes each input block
    fn config() -> TimeShiftConfig {
        let mut config = TimeShiftConfig::default();
        config.audio.sample_rate = 1000;
        config.audio.block_size = 100;
        config.audio.input_channels = 1;
        config.buffer.past_seconds = 2.0;
        config.buffer.future_seconds = 2.0;
        config
    }

    fn ramp(len: usize) -> Vec<i16> {
        (1..=len as i16).collect()
    }

    #[test]
    fn test_no_script_passes_through() {
        let mut processor = TimeShiftProcessor::new(&config(), Script::default()).unwrap();
        let input = ramp(1000);
        let output = processor.process_signal(&input).unwrap();

        assert_eq!(output, input);
        assert_eq!(processor.frames_processed(), 1000);
        assert!(processor.status().is_live());
    }

    #[test]
    fn test_pause_then_play_delays_output() {
        let script: Script = "0.3:pause,0.5:play".parse().unwrap();
        let mut processor = TimeShiftProcessor::new(&config(), script).unwrap();
        let output = processor.process_signal(&ramp(1000)).unwrap();

        // Blocks 3 and 4 are silent, then playback resumes at frame 301
        assert_eq!(&output[..300], &ramp(300)[..]);
        assert!(output[300..500].iter().all(|&s| s == 0));
        assert_eq!(output[500], 301);
        assert_eq!(output[999], 800);

        assert_eq!(processor.status().state, PlaybackState::Shifted);
        assert_eq!(processor.status().shift_frames, 200);
        assert_eq!(processor.applied().len(), 2);
        assert_eq!(processor.applied()[1].frame, 500);
    }

    #[test]
    fn test_back_then_live() {
        let script: Script = "0.5:back 0.2s,0.8:live".parse().unwrap();
        let mut processor = TimeShiftProcessor::new(&config(), script).unwrap();
        let output = processor.process_signal(&ramp(1000)).unwrap();

        // Rewinding 0.2s at 0.5s replays from frame 301
        assert_eq!(output[500], 301);
        assert_eq!(output[799], 600);
        // Live again from 0.8s
        assert_eq!(output[800], 801);
        assert!(processor.status().is_live());
    }

    #[test]
    fn test_channel_mismatch_surfaces() {
        let mut config = config();
        config.audio.input_channels = 2;
        let mut processor = TimeShiftProcessor::new(&config, Script::default()).unwrap();
        assert!(processor.process_block(&[1, 2, 3]).is_err());
    }
}
