use parking_lot::{Mutex, MutexGuard};

use super::cursor;
use super::ring::RingStore;
use super::status::{BufferStatus, PlaybackState};
use crate::config::{BufferConfig, PauseOverflow, TimeShiftConfig};
use crate::constants::DEFAULT_LIVE_DELAY_SECS;
use crate::error::{Result, TimeShiftError};

/// Frozen playback point captured by `pause()`
#[derive(Debug, Clone, Copy)]
struct PausePoint {
    /// Read position at pause time, moved only by seeks while paused
    position: usize,
    /// Shift playback will resume with: the shift at pause time plus every
    /// frame written since, adjusted by seeks. Counted rather than derived
    /// from cursor distance so it stays exact after the ring wraps.
    lag: usize,
}

/// Time-shift state machine over a ring store
///
/// Holds the storage, both cursors and the shift/pause state. All methods
/// take `&mut self`; share it through [`TimeShiftBuffer`], which serializes
/// access with a single lock.
///
/// While playing, the read cursor trails the write cursor by
/// `live_delay + shift` frames and every write re-derives it from that lag.
/// Control operations only change `shift` (and the pause point), so seeking
/// is O(1) and never moves stored samples.
#[derive(Debug)]
pub struct TimeShiftState {
    store: RingStore,
    sample_rate: u32,
    live_delay: usize,
    past_capacity: usize,
    overflow: PauseOverflow,
    read_pos: usize,
    shift: usize,
    pause: Option<PausePoint>,
}

impl TimeShiftState {
    /// Build the state from a buffer configuration
    pub fn new(config: &BufferConfig, sample_rate: u32, channels: usize) -> Result<Self> {
        config.validate()?;
        if sample_rate == 0 {
            return Err(TimeShiftError::Config(
                "sample_rate must be positive".to_string(),
            ));
        }

        let capacity = config.capacity_frames(sample_rate);
        let store = RingStore::new(capacity, channels)?;

        let mut live_delay = config.live_delay_frames(sample_rate);
        if live_delay >= capacity {
            log::warn!(
                "Live delay of {} frames does not fit a {}-frame buffer, using {}",
                live_delay,
                capacity,
                capacity - 1
            );
            live_delay = capacity - 1;
        }
        let past_capacity = config.past_capacity_frames(sample_rate).min(capacity);

        log::debug!(
            "Time-shift buffer: {} frames x {} ch, past {} frames, live delay {} frames",
            capacity,
            channels,
            past_capacity,
            live_delay
        );

        let mut state = Self {
            store,
            sample_rate,
            live_delay,
            past_capacity,
            overflow: config.pause_overflow,
            read_pos: 0,
            shift: 0,
            pause: None,
        };
        state.read_pos = state.live_position();
        Ok(state)
    }

    /// Append captured frames and, while playing, keep the read lag constant
    pub fn write(&mut self, interleaved: &[i16]) -> Result<()> {
        let frames = self.store.write(interleaved)?;
        if frames == 0 {
            return Ok(());
        }

        match self.pause.as_mut() {
            None => self.read_pos = self.live_position(),
            Some(point) => {
                point.lag = point.lag.saturating_add(frames);
                if self.overflow == PauseOverflow::ResumeLive && point.lag > self.past_capacity {
                    log::warn!(
                        "Pause exceeded {:.1}s of history, returning to live",
                        self.past_capacity as f32 / self.sample_rate as f32
                    );
                    self.reset_to_live();
                }
            }
        }
        Ok(())
    }

    /// Fill `out` from the read cursor, or with silence while paused
    ///
    /// `out` must hold a whole number of frames.
    pub fn read_into(&mut self, out: &mut [i16]) -> Result<()> {
        let frames = self.store.frames_in(out.len())?;
        self.play(out, frames);
        Ok(())
    }

    /// Return exactly `frame_count` frames of playback
    pub fn read(&mut self, frame_count: usize) -> Vec<i16> {
        let mut out = vec![0; frame_count * self.store.channels()];
        self.play(&mut out, frame_count);
        out
    }

    /// Write `input` then read `output.len()` samples, as one audio period
    ///
    /// Both slices are checked before any state changes.
    pub fn process(&mut self, input: &[i16], output: &mut [i16]) -> Result<()> {
        self.store.frames_in(input.len())?;
        let frames = self.store.frames_in(output.len())?;
        self.write(input)?;
        self.play(output, frames);
        Ok(())
    }

    fn play(&mut self, out: &mut [i16], frames: usize) {
        if self.pause.is_some() {
            out.fill(0);
            return;
        }
        self.store.copy_out(self.read_pos, out);
        self.read_pos = cursor::advance(self.read_pos, frames, self.store.capacity());
    }

    /// Freeze playback at the current read position
    pub fn pause(&mut self) {
        if self.pause.is_some() {
            log::debug!("pause() while already paused ignored");
            return;
        }

        self.pause = Some(PausePoint {
            position: self.read_pos,
            lag: self.shift,
        });
    }

    /// Continue playback from the pause point
    ///
    /// Frames written during the pause become shift. If the pause point has
    /// fallen out of the seekable history, playback restarts from the
    /// oldest seekable frame instead.
    pub fn resume(&mut self) {
        let Some(point) = self.pause.take() else {
            log::debug!("resume() while playing ignored");
            return;
        };

        self.shift = point.lag.min(self.available());
        if self.shift == point.lag {
            self.read_pos = point.position;
        } else {
            log::info!(
                "Pause point lost, resuming {:.2}s behind live",
                self.frames_to_secs(self.shift)
            );
            self.read_pos = self.live_position();
        }
    }

    /// Toggle between paused and playing
    ///
    /// # Returns
    /// `true` if playback is now paused
    pub fn toggle_pause(&mut self) -> bool {
        if self.pause.is_some() {
            self.resume();
            false
        } else {
            self.pause();
            true
        }
    }

    /// Increase the shift by up to `frames`, stopping at the oldest
    /// seekable frame
    pub fn move_backward(&mut self, frames: usize) {
        let available = self.available();
        self.shift = self.shift.saturating_add(frames).min(available);

        match self.pause.as_mut() {
            None => self.read_pos = self.live_position(),
            Some(point) => {
                // Seek the frozen point too, within the same history bound
                let target = point.lag.saturating_add(frames).min(available);
                let applied = target.saturating_sub(point.lag);
                point.position = cursor::retreat(point.position, applied, self.store.capacity());
                point.lag += applied;
            }
        }
    }

    /// Decrease the shift by up to `frames`, stopping at live
    pub fn move_forward(&mut self, frames: usize) {
        self.shift -= frames.min(self.shift);

        match self.pause.as_mut() {
            None => self.read_pos = self.live_position(),
            Some(point) => {
                let applied = frames.min(point.lag);
                point.position = cursor::advance(point.position, applied, self.store.capacity());
                point.lag -= applied;
            }
        }
    }

    /// Drop any shift and pause and play from live
    pub fn reset_to_live(&mut self) {
        self.shift = 0;
        self.pause = None;
        self.read_pos = self.live_position();
    }

    /// Frames of history the shift may reach into
    pub fn available(&self) -> usize {
        self.store.stored().min(self.past_capacity)
    }

    fn live_position(&self) -> usize {
        cursor::live_read_position(
            self.store.write_position(),
            self.live_delay,
            self.shift,
            self.store.capacity(),
        )
    }

    fn pending_shift(&self) -> usize {
        match self.pause {
            Some(point) => point.lag.min(self.available()),
            None => self.shift,
        }
    }

    fn frames_to_secs(&self, frames: usize) -> f32 {
        frames as f32 / self.sample_rate as f32
    }

    pub fn state(&self) -> PlaybackState {
        if self.pause.is_some() {
            PlaybackState::Paused
        } else if self.shift == 0 {
            PlaybackState::Live
        } else {
            PlaybackState::Shifted
        }
    }

    pub fn is_live(&self) -> bool {
        self.state() == PlaybackState::Live
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    pub fn get_buffer_time(&self) -> f32 {
        self.frames_to_secs(self.store.stored())
    }

    pub fn get_delayed_time(&self) -> f32 {
        self.frames_to_secs(self.shift)
    }

    pub fn get_future_buffer_time(&self) -> f32 {
        self.frames_to_secs(self.store.stored().saturating_sub(self.shift))
    }

    pub fn get_remaining_buffer_time(&self) -> f32 {
        self.frames_to_secs(self.pending_shift())
    }

    pub fn status(&self) -> BufferStatus {
        BufferStatus {
            state: self.state(),
            sample_rate: self.sample_rate,
            capacity_frames: self.store.capacity(),
            stored_frames: self.store.stored(),
            shift_frames: self.shift,
            pending_shift_frames: self.pending_shift(),
            write_position: self.store.write_position(),
            read_position: self.read_position(),
        }
    }

    /// Effective read position; the pause point while paused
    pub fn read_position(&self) -> usize {
        self.pause.map_or(self.read_pos, |point| point.position)
    }

    pub fn write_position(&self) -> usize {
        self.store.write_position()
    }

    pub fn stored_frames(&self) -> usize {
        self.store.stored()
    }

    pub fn shift_frames(&self) -> usize {
        self.shift
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn live_delay_frames(&self) -> usize {
        self.live_delay
    }

    pub fn past_capacity_frames(&self) -> usize {
        self.past_capacity
    }

    pub fn channels(&self) -> usize {
        self.store.channels()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Thread-safe time-shift buffer
///
/// One `parking_lot::Mutex` guards the whole [`TimeShiftState`]; every
/// public operation holds it for its full duration and none blocks or
/// performs I/O while holding it. Share between the producer, consumer
/// and control contexts as `Arc<TimeShiftBuffer>`.
///
/// # Example
/// ```
/// use timeshift::TimeShiftBuffer;
///
/// let buffer = TimeShiftBuffer::new(2.0, 2.0, 44100, 1).unwrap();
/// buffer.write(&[0i16; 1024]).unwrap();
/// buffer.move_backward(22050);
/// assert!(!buffer.is_live());
/// buffer.reset_to_live();
/// assert!(buffer.is_live());
/// ```
#[derive(Debug)]
pub struct TimeShiftBuffer {
    state: Mutex<TimeShiftState>,
    sample_rate: u32,
    channels: usize,
}

impl TimeShiftBuffer {
    /// Create a buffer holding `past_seconds + future_seconds` of audio
    /// with the default live delay
    pub fn new(
        past_seconds: f32,
        future_seconds: f32,
        sample_rate: u32,
        channels: usize,
    ) -> Result<Self> {
        let config = BufferConfig {
            past_seconds,
            future_seconds,
            live_delay_secs: DEFAULT_LIVE_DELAY_SECS,
            pause_overflow: PauseOverflow::Clamp,
        };
        Self::with_buffer_config(&config, sample_rate, channels)
    }

    /// Create a buffer sized for the configured input stream
    pub fn from_config(config: &TimeShiftConfig) -> Result<Self> {
        Self::with_buffer_config(
            &config.buffer,
            config.audio.sample_rate,
            config.audio.input_channels as usize,
        )
    }

    pub fn with_buffer_config(
        config: &BufferConfig,
        sample_rate: u32,
        channels: usize,
    ) -> Result<Self> {
        let state = TimeShiftState::new(config, sample_rate, channels)?;
        Ok(Self {
            state: Mutex::new(state),
            sample_rate,
            channels,
        })
    }

    /// Hold the lock across several operations
    pub fn lock(&self) -> MutexGuard<'_, TimeShiftState> {
        self.state.lock()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn write(&self, interleaved: &[i16]) -> Result<()> {
        self.state.lock().write(interleaved)
    }

    pub fn read(&self, frame_count: usize) -> Vec<i16> {
        self.state.lock().read(frame_count)
    }

    pub fn read_into(&self, out: &mut [i16]) -> Result<()> {
        self.state.lock().read_into(out)
    }

    pub fn process(&self, input: &[i16], output: &mut [i16]) -> Result<()> {
        self.state.lock().process(input, output)
    }

    pub fn pause(&self) {
        self.state.lock().pause();
    }

    pub fn resume(&self) {
        self.state.lock().resume();
    }

    pub fn toggle_pause(&self) -> bool {
        self.state.lock().toggle_pause()
    }

    pub fn move_backward(&self, frames: usize) {
        self.state.lock().move_backward(frames);
    }

    pub fn move_forward(&self, frames: usize) {
        self.state.lock().move_forward(frames);
    }

    pub fn reset_to_live(&self) {
        self.state.lock().reset_to_live();
    }

    pub fn is_live(&self) -> bool {
        self.state.lock().is_live()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().is_paused()
    }

    pub fn get_buffer_time(&self) -> f32 {
        self.state.lock().get_buffer_time()
    }

    pub fn get_delayed_time(&self) -> f32 {
        self.state.lock().get_delayed_time()
    }

    pub fn get_future_buffer_time(&self) -> f32 {
        self.state.lock().get_future_buffer_time()
    }

    pub fn get_remaining_buffer_time(&self) -> f32 {
        self.state.lock().get_remaining_buffer_time()
    }

    pub fn status(&self) -> BufferStatus {
        self.state.lock().status()
    }
}
