use std::f32::consts::PI;

/// Mono ramp `start, start + 1, ...` of `frames` samples, wrapping at i16
pub fn ramp(start: i16, frames: usize) -> Vec<i16> {
    (0..frames)
        .map(|i| start.wrapping_add(i as i16))
        .collect()
}

pub fn constant(value: i16, frames: usize) -> Vec<i16> {
    vec![value; frames]
}

/// Interleave equal-length channel buffers [c0, c1, c0, c1, ...]
pub fn interleave(channels: &[Vec<i16>]) -> Vec<i16> {
    let frames = channels.first().map_or(0, Vec::len);
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        for channel in channels {
            out.push(channel[i]);
        }
    }
    out
}

/// Sine tone at `amplitude` (0.0-1.0 of full scale)
pub fn tone(freq_hz: f32, amplitude: f32, duration_secs: f32, sample_rate: u32) -> Vec<i16> {
    let frames = (duration_secs * sample_rate as f32) as usize;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (amplitude * (2.0 * PI * freq_hz * t).sin() * i16::MAX as f32) as i16
        })
        .collect()
}
