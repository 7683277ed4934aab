use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::WavReader;

/// Block-wise supplier of interleaved i16 PCM
pub trait AudioSource: Send {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<i16>>>;
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
}

/// WAV file read fully into memory and handed out `chunk_frames` at a time
pub struct WavFileSource {
    samples: Vec<i16>,
    position: usize,
    chunk_size: usize,
    sample_rate: u32,
    channels: u16,
}

impl WavFileSource {
    pub fn new<P: AsRef<Path>>(path: P, chunk_frames: usize) -> anyhow::Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if chunk_frames == 0 {
            anyhow::bail!("chunk size must be at least one frame");
        }

        let samples = Self::read_samples(reader, &spec)?;

        Ok(Self {
            samples,
            position: 0,
            chunk_size: chunk_frames * spec.channels as usize,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// Total length in frames
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    fn read_samples(
        mut reader: WavReader<BufReader<File>>,
        spec: &hound::WavSpec,
    ) -> anyhow::Result<Vec<i16>> {
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int if spec.bits_per_sample == 16 => {
                reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?
            }
            // hound leaves narrow samples at their native scale
            hound::SampleFormat::Int if spec.bits_per_sample < 16 => {
                let shift = 16 - spec.bits_per_sample as u32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| (v << shift) as i16))
                    .collect::<Result<Vec<_>, _>>()?
            }
            hound::SampleFormat::Int => {
                let shift = spec.bits_per_sample as u32 - 16;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| (v >> shift) as i16))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(samples)
    }
}

impl AudioSource for WavFileSource {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<i16>>> {
        if self.position >= self.samples.len() {
            return Ok(None);
        }

        let end = (self.position + self.chunk_size).min(self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;

        Ok(Some(chunk))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::save_wav;

    #[test]
    fn test_wav_source_chunks() {
        let path = std::env::temp_dir().join("timeshift_source_chunks.wav");
        let samples: Vec<i16> = (0..10).collect();
        save_wav(&path, &samples, 2, 8000).unwrap();

        let mut source = WavFileSource::new(&path, 2).unwrap();
        assert_eq!(source.sample_rate(), 8000);
        assert_eq!(source.channels(), 2);
        assert_eq!(source.frames(), 5);

        assert_eq!(source.next_buffer().unwrap(), Some(vec![0, 1, 2, 3]));
        assert_eq!(source.next_buffer().unwrap(), Some(vec![4, 5, 6, 7]));
        assert_eq!(source.next_buffer().unwrap(), Some(vec![8, 9]));
        assert_eq!(source.next_buffer().unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_wav_source_scales_8bit_to_16bit() {
        let path = std::env::temp_dir().join("timeshift_source_8bit.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for sample in [127i8, -128, 0, 64] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let mut source = WavFileSource::new(&path, 4).unwrap();
        assert_eq!(
            source.next_buffer().unwrap(),
            Some(vec![32512, -32768, 0, 16384])
        );

        let _ = std::fs::remove_file(&path);
    }
}
