use super::cursor;
use crate::error::{Result, TimeShiftError};

/// Fixed-capacity circular store of interleaved i16 frames
///
/// Owns the sample storage and the write cursor. Frames are `channels`
/// samples wide; every position and count here is in frames, never in
/// samples. Storage is allocated once and never resized or moved.
#[derive(Debug)]
pub struct RingStore {
    samples: Vec<i16>,
    capacity: usize,
    channels: usize,
    write_pos: usize,
    stored: usize,
}

impl RingStore {
    /// Create a zero-filled store of `capacity` frames
    ///
    /// # Arguments
    /// * `capacity` - Ring size N in frames (must be positive)
    /// * `channels` - Samples per frame (must be positive)
    pub fn new(capacity: usize, channels: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TimeShiftError::Config(
                "buffer capacity must be at least one frame".to_string(),
            ));
        }
        if channels == 0 {
            return Err(TimeShiftError::Config(
                "channel count must be positive".to_string(),
            ));
        }
        Ok(Self {
            samples: vec![0; capacity * channels],
            capacity,
            channels,
            write_pos: 0,
            stored: 0,
        })
    }

    /// Number of whole frames in an interleaved slice of `len` samples
    pub fn frames_in(&self, len: usize) -> Result<usize> {
        if len % self.channels != 0 {
            return Err(TimeShiftError::ChannelMismatch {
                samples: len,
                channels: self.channels,
            });
        }
        Ok(len / self.channels)
    }

    /// Append interleaved frames at the write cursor
    ///
    /// Overwrites the oldest frames once the ring is full. A block longer
    /// than the ring keeps only its trailing `capacity` frames, but the
    /// write cursor still advances by the full block length.
    ///
    /// # Returns
    /// Number of frames in `interleaved`
    pub fn write(&mut self, interleaved: &[i16]) -> Result<usize> {
        let frames = self.frames_in(interleaved.len())?;
        if frames == 0 {
            return Ok(0);
        }

        let kept = frames.min(self.capacity);
        let tail = &interleaved[(frames - kept) * self.channels..];
        let start = cursor::advance(self.write_pos, frames - kept, self.capacity);

        let (first, second) = cursor::split_run(start, kept, self.capacity);
        let ch = self.channels;
        self.samples[start * ch..(start + first) * ch].copy_from_slice(&tail[..first * ch]);
        self.samples[..second * ch].copy_from_slice(&tail[first * ch..]);

        self.write_pos = cursor::advance(self.write_pos, frames, self.capacity);
        self.stored = (self.stored + frames).min(self.capacity);
        Ok(frames)
    }

    /// Copy frames starting at `start` into `dest`, wrapping as needed
    ///
    /// `dest` must hold a whole number of frames. Requests longer than the
    /// ring wrap around it more than once.
    pub fn copy_out(&self, start: usize, dest: &mut [i16]) {
        debug_assert!(start < self.capacity);
        debug_assert_eq!(dest.len() % self.channels, 0);

        let ch = self.channels;
        let mut pos = start;
        for chunk in dest.chunks_mut(self.capacity * ch) {
            let len = chunk.len() / ch;
            let (first, second) = cursor::split_run(pos, len, self.capacity);
            chunk[..first * ch].copy_from_slice(&self.samples[pos * ch..(pos + first) * ch]);
            chunk[first * ch..].copy_from_slice(&self.samples[..second * ch]);
            pos = cursor::advance(pos, len, self.capacity);
        }
    }

    /// Ring size N in frames
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples per frame
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Index the next frame will be written to
    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Count of valid frames, saturating at capacity
    pub fn stored(&self) -> usize {
        self.stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(store: &RingStore, start: usize, frames: usize) -> Vec<i16> {
        let mut out = vec![0; frames * store.channels()];
        store.copy_out(start, &mut out);
        out
    }

    #[test]
    fn test_write_and_copy_out() {
        let mut store = RingStore::new(8, 1).unwrap();
        assert_eq!(store.write(&[1, 2, 3]).unwrap(), 3);

        assert_eq!(store.write_position(), 3);
        assert_eq!(store.stored(), 3);
        assert_eq!(read_all(&store, 0, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_write_wraps_and_saturates() {
        let mut store = RingStore::new(4, 1).unwrap();
        store.write(&[1, 2, 3]).unwrap();
        store.write(&[4, 5, 6]).unwrap();

        assert_eq!(store.write_position(), 2);
        assert_eq!(store.stored(), 4);
        // Oldest retained frame sits at the write cursor
        assert_eq!(read_all(&store, 2, 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_oversized_write_keeps_tail() {
        let mut store = RingStore::new(3, 1).unwrap();
        store.write(&[9]).unwrap();
        store.write(&[1, 2, 3, 4, 5]).unwrap();

        assert_eq!(store.write_position(), (1 + 5) % 3);
        assert_eq!(store.stored(), 3);
        assert_eq!(read_all(&store, store.write_position(), 3), vec![3, 4, 5]);
    }

    #[test]
    fn test_stereo_frames() {
        let mut store = RingStore::new(3, 2).unwrap();
        store.write(&[1, -1, 2, -2]).unwrap();
        store.write(&[3, -3, 4, -4]).unwrap();

        assert_eq!(store.write_position(), 1);
        assert_eq!(read_all(&store, 1, 3), vec![2, -2, 3, -3, 4, -4]);
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let mut store = RingStore::new(4, 2).unwrap();
        let err = store.write(&[1, 2, 3]).unwrap_err();

        assert!(matches!(
            err,
            TimeShiftError::ChannelMismatch {
                samples: 3,
                channels: 2
            }
        ));
        assert_eq!(store.write_position(), 0);
        assert_eq!(store.stored(), 0);
    }

    #[test]
    fn test_copy_out_longer_than_ring() {
        let mut store = RingStore::new(3, 1).unwrap();
        store.write(&[1, 2, 3]).unwrap();
        assert_eq!(read_all(&store, 1, 7), vec![2, 3, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(RingStore::new(0, 1).is_err());
        assert!(RingStore::new(16, 0).is_err());
    }
}
