use serde::Serialize;

use super::{Formatter, StatusOutput, iso8601_timestamp};
use crate::buffer::PlaybackState;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonStatus<'a> {
    ts: String,
    state: PlaybackState,
    buffer_time: f32,
    delayed_time: f32,
    future_buffer_time: f32,
    remaining_buffer_time: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl Formatter for JsonFormatter {
    fn format(&self, output: &StatusOutput<'_>) -> String {
        let status = output.status;
        let record = JsonStatus {
            ts: iso8601_timestamp(),
            state: status.state,
            buffer_time: status.buffer_time(),
            delayed_time: status.delayed_time(),
            future_buffer_time: status.future_buffer_time(),
            remaining_buffer_time: status.remaining_buffer_time(),
            message: output.message,
        };
        serde_json::to_string(&record).unwrap_or_else(|e| {
            log::error!("Failed to serialize status: {}", e);
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::status;

    #[test]
    fn test_json_fields() {
        let status = status(PlaybackState::Shifted, 1500, 1500);
        let output = StatusOutput {
            status: &status,
            message: Some("+0.5s"),
        };
        let line = JsonFormatter.format(&output);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["state"], "shifted");
        assert_eq!(value["delayed_time"], 1.5);
        assert_eq!(value["buffer_time"], 4.0);
        assert_eq!(value["message"], "+0.5s");
        assert!(value["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_json_omits_missing_message() {
        let status = status(PlaybackState::Live, 0, 0);
        let output = StatusOutput {
            status: &status,
            message: None,
        };
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format(&output)).unwrap();
        assert!(value.get("message").is_none());
    }
}
