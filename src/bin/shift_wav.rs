use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use timeshift::audio::{AudioSource, WavFileSource};
use timeshift::config::{PauseOverflow, SeekStep, TimeShiftConfig};
use timeshift::control::Script;
use timeshift::{TimeShiftProcessor, save_wav};

#[derive(Parser, Debug)]
#[command(name = "shift_wav")]
#[command(about = "Run a WAV file through the time-shift buffer with scripted controls")]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file (16-bit PCM)
    output: PathBuf,

    /// Commands as "time:command" entries (e.g., "1.0:pause,2.5:play,3:back 1s")
    #[arg(short, long, default_value = "")]
    script: String,

    /// Read commands from a file, one "time:command" entry per line
    #[arg(long, conflicts_with = "script")]
    script_file: Option<PathBuf>,

    /// TOML configuration file; buffer and control sections apply
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per processing block
    #[arg(short, long, default_value_t = 1024)]
    block_size: usize,

    /// Seconds of history reachable behind live
    #[arg(long)]
    past: Option<f32>,

    /// Extra seconds of storage beyond the seekable history
    #[arg(long)]
    future: Option<f32>,

    /// Live playback delay in seconds
    #[arg(long)]
    live_delay: Option<f32>,

    /// Behavior when a pause outlasts the history: clamp, resume-live
    #[arg(long, value_enum)]
    pause_overflow: Option<PauseOverflow>,

    /// Default back/forward step (e.g., "0.5s", "500ms", "22050")
    #[arg(long)]
    seek_step: Option<SeekStep>,

    /// Print buffer state after every applied command
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let script_text = match &args.script_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .collect::<Vec<_>>()
            .join(","),
        None => args.script.clone(),
    };
    let script: Script = script_text.parse()?;

    let mut source = WavFileSource::new(&args.input, args.block_size)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let mut config = match &args.config {
        Some(path) => TimeShiftConfig::load(path)?,
        None => TimeShiftConfig::default(),
    };
    config.audio.sample_rate = source.sample_rate();
    config.audio.input_channels = source.channels();
    config.audio.output_channels = source.channels();
    config.audio.block_size = args.block_size;
    if let Some(past) = args.past {
        config.buffer.past_seconds = past;
    }
    if let Some(future) = args.future {
        config.buffer.future_seconds = future;
    }
    if let Some(delay) = args.live_delay {
        config.buffer.live_delay_secs = delay;
    }
    if let Some(policy) = args.pause_overflow {
        config.buffer.pause_overflow = policy;
    }
    if let Some(step) = args.seek_step {
        config.control.seek_step = step;
    }

    println!(
        "Input: {} ({} Hz, {} ch, {:.2}s)",
        args.input.display(),
        source.sample_rate(),
        source.channels(),
        source.frames() as f32 / source.sample_rate() as f32
    );
    println!("Scripted commands: {}", script.entries().len());

    let mut processor = TimeShiftProcessor::new(&config, script)?;
    let mut played = Vec::with_capacity(source.frames() * source.channels() as usize);
    while let Some(block) = source.next_buffer()? {
        played.extend(processor.process_block(&block)?);
    }

    for applied in processor.applied() {
        let status = &applied.event.status;
        let mut line = format!(
            "{:>8.3}s  {:<12} -> {:?}",
            applied.frame as f32 / config.audio.sample_rate as f32,
            applied.command.to_string(),
            status.state
        );
        if args.verbose {
            line.push_str(&format!(
                " (delay {:.2}s, pending {:.2}s, history {:.2}s)",
                status.delayed_time(),
                status.remaining_buffer_time(),
                status.future_buffer_time()
            ));
        }
        println!("{}", line);
    }

    save_wav(
        &args.output,
        &played,
        source.channels(),
        source.sample_rate(),
    )?;

    let status = processor.status();
    println!(
        "Wrote {} ({} frames), final state {:?}, {:.2}s behind live",
        args.output.display(),
        processor.frames_processed(),
        status.state,
        status.remaining_buffer_time()
    );

    Ok(())
}
