/// Copy interleaved frames between channel layouts
///
/// Mono input is duplicated to every output channel and mono output is the
/// average of all input channels. Otherwise channels map by index and extra
/// output channels are silent. Output frames beyond the input are zeroed.
///
/// # Arguments
/// * `input` - Interleaved samples with `in_channels` per frame
/// * `in_channels` - Input frame width
/// * `output` - Interleaved destination with `out_channels` per frame
/// * `out_channels` - Output frame width
pub fn remap_channels(input: &[i16], in_channels: usize, output: &mut [i16], out_channels: usize) {
    debug_assert!(in_channels > 0 && out_channels > 0);

    let mut out_frames = output.chunks_exact_mut(out_channels);
    for (src, dst) in input.chunks_exact(in_channels).zip(&mut out_frames) {
        if in_channels == out_channels {
            dst.copy_from_slice(src);
        } else if in_channels == 1 {
            dst.fill(src[0]);
        } else if out_channels == 1 {
            let sum: i32 = src.iter().map(|&s| s as i32).sum();
            dst[0] = (sum / in_channels as i32) as i16;
        } else {
            for (c, sample) in dst.iter_mut().enumerate() {
                *sample = src.get(c).copied().unwrap_or(0);
            }
        }
    }
    for dst in out_frames {
        dst.fill(0);
    }
}
