mod test_signals;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use timeshift::TimeShiftBuffer;

const BLOCK_FRAMES: usize = 256;
const CHANNELS: usize = 2;
const BLOCKS: usize = 400;

/// Producer, consumer and control contexts hammering one buffer, the
/// way the capture callback, playback callback and command loop do
#[test]
fn test_producer_consumer_control_threads() {
    let buffer = Arc::new(TimeShiftBuffer::new(1.0, 1.0, 8000, CHANNELS).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let producer = {
        let buffer = buffer.clone();
        thread::spawn(move || {
            let left = test_signals::ramp(0, BLOCK_FRAMES);
            let right = test_signals::constant(7, BLOCK_FRAMES);
            let block = test_signals::interleave(&[left, right]);
            for _ in 0..BLOCKS {
                buffer.write(&block).unwrap();
            }
        })
    };

    let consumer = {
        let buffer = buffer.clone();
        thread::spawn(move || {
            let mut out = vec![0i16; BLOCK_FRAMES * CHANNELS];
            for _ in 0..BLOCKS {
                buffer.read_into(&mut out).unwrap();
                // Right channel is 7 wherever anything was written
                for frame in out.chunks_exact(CHANNELS) {
                    assert!(frame[1] == 7 || frame == [0, 0]);
                }
                assert_eq!(buffer.read(BLOCK_FRAMES).len(), BLOCK_FRAMES * CHANNELS);
            }
        })
    };

    let control = {
        let buffer = buffer.clone();
        let done = done.clone();
        thread::spawn(move || {
            let mut step = 0usize;
            while !done.load(Ordering::Relaxed) {
                match step % 6 {
                    0 => buffer.move_backward(3000),
                    1 => buffer.pause(),
                    2 => buffer.move_forward(1000),
                    3 => buffer.resume(),
                    4 => {
                        buffer.toggle_pause();
                    }
                    _ => buffer.reset_to_live(),
                }

                let status = buffer.status();
                let available = status.stored_frames.min(8000);
                assert!(status.shift_frames <= available);
                assert!(status.pending_shift_frames <= available);
                assert!(status.read_position < status.capacity_frames);
                assert!(status.write_position < status.capacity_frames);
                step += 1;
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();
    done.store(true, Ordering::Relaxed);
    control.join().unwrap();

    let status = buffer.status();
    assert_eq!(status.stored_frames, (BLOCK_FRAMES * BLOCKS).min(16_000));
    assert_eq!(status.write_position, BLOCK_FRAMES * BLOCKS % 16_000);
}

#[test]
fn test_locked_period_is_atomic() {
    let buffer = Arc::new(TimeShiftBuffer::new(1.0, 1.0, 1000, 1).unwrap());
    buffer.write(&test_signals::ramp(1, 800)).unwrap();

    let seeker = {
        let buffer = buffer.clone();
        thread::spawn(move || {
            for _ in 0..1000 {
                buffer.move_backward(10);
                buffer.reset_to_live();
            }
        })
    };

    // Write and read under one acquisition: nothing can seek in between,
    // so the live read is always the contiguous run behind the block
    for i in 0..200 {
        let block = test_signals::ramp((801 + i * 100) as i16, 100);
        let mut state = buffer.lock();
        if state.shift_frames() != 0 {
            state.reset_to_live();
        }
        let mut out = vec![0; 100];
        state.process(&block, &mut out).unwrap();
        drop(state);

        assert!(out.windows(2).all(|w| w[1] == w[0].wrapping_add(1)));
    }

    seeker.join().unwrap();
}
