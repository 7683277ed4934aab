mod display;
mod json;
mod text;

use chrono::Utc;

use crate::buffer::BufferStatus;

pub use self::display::StatusDisplay;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct StatusOutput<'a> {
    pub status: &'a BufferStatus,
    pub message: Option<&'a str>,
}

pub trait Formatter: Send {
    fn format(&self, output: &StatusOutput<'_>) -> String;
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Position label: `LIVE`, or how far
/// playback trails live (`-1.5s`)
pub fn position_label(status: &BufferStatus) -> String {
    if status.is_live() {
        "LIVE".to_string()
    } else {
        format!("-{:.1}s", status.remaining_buffer_time())
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
