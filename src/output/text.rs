use super::{Formatter, StatusOutput, position_label};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &StatusOutput<'_>) -> String {
        let status = output.status;
        let state = if status.is_paused() { "PAUSED" } else { "PLAYING" };
        let mut line = format!("{:<7} {:>7}", state, position_label(status));

        if self.verbose {
            line.push_str(&format!(
                " [buf: {:>6.1}s, delay: {:>5.1}s, history: {:>6.1}s, w: {}, r: {}]",
                status.buffer_time(),
                status.delayed_time(),
                status.future_buffer_time(),
                status.write_position,
                status.read_position
            ));
        }
        if let Some(message) = output.message {
            line.push_str("  ");
            line.push_str(message);
        }
        line
    }
}
