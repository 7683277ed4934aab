use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{Receiver, Sender, bounded, select, tick};

use timeshift::TimeShiftBuffer;
use timeshift::audio::{AudioCapture, AudioPlayback, list_devices};
use timeshift::config::{PauseOverflow, SeekStep, TimeShiftConfig};
use timeshift::control::{Command, Controller};
use timeshift::output::{OutputFormat, StatusDisplay, create_formatter};

#[derive(Parser, Debug)]
#[command(name = "timeshift")]
#[command(about = "Live audio time-shift: pause, rewind and catch up to live", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Seconds of history reachable behind live
    #[arg(long)]
    past: Option<f32>,

    /// Extra seconds of storage beyond the seekable history
    #[arg(long)]
    future: Option<f32>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Frames per audio period
    #[arg(long)]
    block_size: Option<usize>,

    /// Channels captured from the input device
    #[arg(long)]
    input_channels: Option<u16>,

    /// Channels sent to the output device
    #[arg(long)]
    output_channels: Option<u16>,

    /// Input device name (substring match)
    #[arg(long)]
    input_device: Option<String>,

    /// Output device name (substring match)
    #[arg(long)]
    output_device: Option<String>,

    /// Seek step (e.g., "0.5s", "500ms", "22050")
    #[arg(long)]
    seek_step: Option<SeekStep>,

    /// Live playback delay in seconds
    #[arg(long)]
    live_delay: Option<f32>,

    /// Behavior when a pause outlasts the history: clamp, resume-live
    #[arg(long, value_enum)]
    pause_overflow: Option<PauseOverflow>,

    /// Status output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show buffer details on every status line
    #[arg(short = 'v', long)]
    verbose: bool,

    /// List audio devices and exit
    #[arg(long)]
    list_devices: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<TimeShiftConfig> {
        let mut config = match &self.config {
            Some(path) => TimeShiftConfig::load(path)?,
            None => TimeShiftConfig::default(),
        };

        if let Some(past) = self.past {
            config.buffer.past_seconds = past;
        }
        if let Some(future) = self.future {
            config.buffer.future_seconds = future;
        }
        if let Some(delay) = self.live_delay {
            config.buffer.live_delay_secs = delay;
        }
        if let Some(policy) = self.pause_overflow {
            config.buffer.pause_overflow = policy;
        }
        if let Some(rate) = self.sample_rate {
            config.audio.sample_rate = rate;
        }
        if let Some(block_size) = self.block_size {
            config.audio.block_size = block_size;
        }
        if let Some(channels) = self.input_channels {
            config.audio.input_channels = channels;
        }
        if let Some(channels) = self.output_channels {
            config.audio.output_channels = channels;
        }
        if self.input_device.is_some() {
            config.audio.input_device = self.input_device;
        }
        if self.output_device.is_some() {
            config.audio.output_device = self.output_device;
        }
        if let Some(step) = self.seek_step {
            config.control.seek_step = step;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    if args.list_devices {
        let (inputs, outputs) = list_devices()?;
        println!("Input devices:");
        for name in inputs {
            println!("  {}", name);
        }
        println!("Output devices:");
        for name in outputs {
            println!("  {}", name);
        }
        return Ok(());
    }

    let format = args.format;
    let verbose = args.verbose;
    let config = args.into_config()?;

    println!("=== Timeshift - Live Audio Time-Shift ===");
    println!("Sample rate: {} Hz", config.audio.sample_rate);
    println!(
        "History: {:.1}s seekable, {:.1}s total",
        config.buffer.past_seconds,
        config.buffer.past_seconds + config.buffer.future_seconds
    );
    println!(
        "Channels: {} in, {} out, {} frames per block",
        config.audio.input_channels, config.audio.output_channels, config.audio.block_size
    );
    println!("Seek step: {}", config.control.seek_step);
    println!("Commands: b/f [step], p (toggle), pause, play, l (live), s (status), q (quit)");
    println!();

    let buffer = Arc::new(TimeShiftBuffer::from_config(&config)?);

    println!("Starting audio streams...");
    let _capture = AudioCapture::new(&config.audio, buffer.clone())?;
    let _playback = AudioPlayback::new(&config.audio, buffer.clone())?;
    println!("Audio running.\n");

    let (command_tx, command_rx) = bounded(16);
    spawn_command_reader(command_tx)?;

    let controller = Controller::new(buffer, config.control.seek_step);
    run_control_loop(controller, command_rx, &config, format, verbose)
}

/// Parse stdin lines into commands; EOF quits
fn spawn_command_reader(tx: Sender<Command>) -> std::io::Result<()> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            let _ = tx.send(Command::Quit);
        })?;
    Ok(())
}

fn run_control_loop(
    controller: Controller,
    commands: Receiver<Command>,
    config: &TimeShiftConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let display = StatusDisplay::new(
        create_formatter(format, verbose),
        Duration::try_from_secs_f32(config.control.message_hold_secs)?,
    )?;
    let refresh = tick(Duration::from_millis(config.control.refresh_interval_ms));

    println!("{}", display.render(&controller.buffer().status()));
    let mut message_shown = false;

    loop {
        select! {
            recv(commands) -> command => {
                let command = match command {
                    Ok(Command::Quit) | Err(_) => break,
                    Ok(command) => command,
                };
                let event = controller.handle(command);
                if let Some(message) = event.message {
                    display.show_message(message);
                }
                println!("{}", display.render(&event.status));
                message_shown = display.has_message();
            }
            recv(refresh) -> _ => {
                let status = controller.buffer().status();
                // Paused lag keeps growing; an expired message needs one more line
                if status.is_paused() || message_shown {
                    println!("{}", display.render(&status));
                }
                message_shown = display.has_message();
            }
        }
    }

    println!("Stopping.");
    Ok(())
}
