use std::str::FromStr;

use super::Command;
use crate::error::TimeShiftError;

/// A command scheduled at an offset into the input stream
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedCommand {
    /// Seconds of input after which the command is applied
    pub at_secs: f32,
    pub command: Command,
}

impl ScriptedCommand {
    /// Frame index at which the command fires
    pub fn at_frame(&self, sample_rate: u32) -> usize {
        (self.at_secs * sample_rate as f32).round() as usize
    }
}

/// Timed command list, ordered by time
///
/// Written as comma-separated `time:command` entries, e.g.
/// `"1.0:pause, 2.5:play, 3:back 1s, 4:live"`. Entries at the same time
/// keep their written order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    entries: Vec<ScriptedCommand>,
}

impl Script {
    pub fn entries(&self) -> &[ScriptedCommand] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ScriptedCommand> {
        self.entries
    }
}

impl FromStr for Script {
    type Err = TimeShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut entries = Vec::new();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = |reason: String| TimeShiftError::Script {
                entry: entry.to_string(),
                reason,
            };

            let (time, command) = entry
                .split_once(':')
                .ok_or_else(|| invalid("expected time:command".to_string()))?;
            let at_secs: f32 = time
                .trim()
                .parse()
                .map_err(|_| invalid(format!("invalid time {:?}", time.trim())))?;
            if !(at_secs >= 0.0) || !at_secs.is_finite() {
                return Err(invalid("time must be zero or positive".to_string()));
            }
            let command: Command = command.parse().map_err(invalid)?;

            entries.push(ScriptedCommand { at_secs, command });
        }

        // Stable sort keeps same-time entries in written order
        entries.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Ok(Self { entries })
    }
}
