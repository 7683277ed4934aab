use std::fmt;
use std::str::FromStr;

use crate::config::SeekStep;

/// Control request from the input front end
///
/// # Parsing formats
/// - `back [step]`, `b [step]` - rewind (default step from config)
/// - `forward [step]`, `f [step]` - fast-forward
/// - `pause`, `play` / `resume`, `toggle` / `p`
/// - `live` / `l`, `status` / `s`, `quit` / `q`
///
/// # Example
/// ```
/// use timeshift::config::SeekStep;
/// use timeshift::control::Command;
///
/// let cmd: Command = "back 2s".parse().unwrap();
/// assert_eq!(cmd, Command::Backward(Some(SeekStep::Seconds(2.0))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Backward(Option<SeekStep>),
    Forward(Option<SeekStep>),
    Pause,
    Resume,
    TogglePause,
    Live,
    Status,
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backward(None) => write!(f, "back"),
            Self::Backward(Some(step)) => write!(f, "back {}", step),
            Self::Forward(None) => write!(f, "forward"),
            Self::Forward(Some(step)) => write!(f, "forward {}", step),
            Self::Pause => write!(f, "pause"),
            Self::Resume => write!(f, "play"),
            Self::TogglePause => write!(f, "toggle"),
            Self::Live => write!(f, "live"),
            Self::Status => write!(f, "status"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument: {}", extra));
        }

        let step = || arg.map(str::parse::<SeekStep>).transpose();

        let command = match verb.to_lowercase().as_str() {
            "b" | "back" | "backward" | "rewind" => Self::Backward(step()?),
            "f" | "fwd" | "forward" => Self::Forward(step()?),
            verb => {
                if let Some(arg) = arg {
                    return Err(format!("{} takes no argument, got {}", verb, arg));
                }
                match verb {
                    "pause" => Self::Pause,
                    "play" | "resume" => Self::Resume,
                    "p" | "toggle" => Self::TogglePause,
                    "l" | "live" => Self::Live,
                    "s" | "status" => Self::Status,
                    "q" | "quit" | "exit" => Self::Quit,
                    _ => return Err(format!("unknown command: {}", verb)),
                }
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_forms() {
        assert_eq!("b".parse(), Ok(Command::Backward(None)));
        assert_eq!("f".parse(), Ok(Command::Forward(None)));
        assert_eq!("p".parse(), Ok(Command::TogglePause));
        assert_eq!("l".parse(), Ok(Command::Live));
        assert_eq!("s".parse(), Ok(Command::Status));
        assert_eq!("q".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_steps() {
        assert_eq!(
            "back 1.5s".parse(),
            Ok(Command::Backward(Some(SeekStep::Seconds(1.5))))
        );
        assert_eq!(
            "  Forward   4410 ".parse(),
            Ok(Command::Forward(Some(SeekStep::Frames(4410))))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Command>().is_err());
        assert!("jump".parse::<Command>().is_err());
        assert!("back soon".parse::<Command>().is_err());
        assert!("back 1s 2s".parse::<Command>().is_err());
        assert!("live now".parse::<Command>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for cmd in [
            Command::Backward(Some(SeekStep::Frames(10))),
            Command::Forward(None),
            Command::Resume,
            Command::TogglePause,
            Command::Quit,
        ] {
            assert_eq!(cmd.to_string().parse(), Ok(cmd));
        }
    }
}
