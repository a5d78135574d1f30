//! Developer console command parser
//!
//! Parsing never touches game state; a malformed line is rejected with a
//! message for the user and nothing changes.

use thiserror::Error;

/// Cheat flags that can be flipped by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cheat {
    Float,
    Invincible,
    InfiniteJump,
    GemEveryBlock,
}

/// Parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetScore(f64),
    AddScore(f64),
    ClearBestScore,
    SetInfiniteJump(bool),
    /// `false` makes the player invincible
    SetDeath(bool),
    SpeedReset,
    SpeedSet(f32),
    SpeedAdd(f32),
    Die,
    Toggle(Cheat),
}

/// Rejected console input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a number: {0}")]
    InvalidNumber(String),
    #[error("expected true or false, got {0}")]
    InvalidBool(String),
    #[error("unknown game rule: {0}")]
    UnknownRule(String),
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

/// Parse a finite number; `inf`, `NaN` and out-of-range literals are rejected
fn number<T>(arg: Option<&str>, usage: &'static str) -> Result<T, ConsoleError>
where
    T: std::str::FromStr + Copy + Into<f64>,
{
    let raw = arg.ok_or(ConsoleError::Usage(usage))?;
    raw.parse::<T>()
        .ok()
        .filter(|value| Into::<f64>::into(*value).is_finite())
        .ok_or_else(|| ConsoleError::InvalidNumber(raw.to_string()))
}

fn boolean(arg: Option<&str>, usage: &'static str) -> Result<bool, ConsoleError> {
    match arg {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(ConsoleError::InvalidBool(other.to_string())),
        None => Err(ConsoleError::Usage(usage)),
    }
}

/// Parse one console line. A leading `/` is optional.
pub fn parse(line: &str) -> Result<Command, ConsoleError> {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ConsoleError::Empty);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "score" => {
            const USAGE: &str = "/score set|add <n>";
            match words.next() {
                Some("set") => Command::SetScore(number(words.next(), USAGE)?),
                Some("add") => Command::AddScore(number(words.next(), USAGE)?),
                _ => return Err(ConsoleError::Usage(USAGE)),
            }
        }
        "clear" => match words.next() {
            Some("bestScore") => Command::ClearBestScore,
            Some(other) => return Err(ConsoleError::UnknownKey(other.to_string())),
            None => return Err(ConsoleError::Usage("/clear bestScore")),
        },
        "gamerule" => match words.next() {
            Some("infiniteJump") => {
                Command::SetInfiniteJump(boolean(words.next(), "/gamerule infiniteJump <true|false>")?)
            }
            Some("death") => Command::SetDeath(boolean(words.next(), "/gamerule death <true|false>")?),
            Some("speed") => {
                const USAGE: &str = "/gamerule speed reset|set|add [n]";
                match words.next() {
                    Some("reset") => Command::SpeedReset,
                    Some("set") => Command::SpeedSet(number(words.next(), USAGE)?),
                    Some("add") => Command::SpeedAdd(number(words.next(), USAGE)?),
                    _ => return Err(ConsoleError::Usage(USAGE)),
                }
            }
            Some(other) => return Err(ConsoleError::UnknownRule(other.to_string())),
            None => return Err(ConsoleError::Usage("/gamerule <rule> <value>")),
        },
        "die" => Command::Die,
        "float" => Command::Toggle(Cheat::Float),
        "invincible" => Command::Toggle(Cheat::Invincible),
        "infinitejump" => Command::Toggle(Cheat::InfiniteJump),
        "gemeveryblock" => Command::Toggle(Cheat::GemEveryBlock),
        _ => return Err(ConsoleError::UnknownCommand(head.to_string())),
    };

    if let Some(extra) = words.next() {
        log::debug!("ignoring trailing console input starting at {extra:?}");
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_commands() {
        assert_eq!(parse("/score set 120"), Ok(Command::SetScore(120.0)));
        assert_eq!(parse("score add 2.5"), Ok(Command::AddScore(2.5)));
        assert_eq!(parse("/score add lots"), Err(ConsoleError::InvalidNumber("lots".into())));
        assert!(matches!(parse("/score"), Err(ConsoleError::Usage(_))));
    }

    #[test]
    fn test_gamerules() {
        assert_eq!(parse("/gamerule infiniteJump true"), Ok(Command::SetInfiniteJump(true)));
        assert_eq!(parse("/gamerule death false"), Ok(Command::SetDeath(false)));
        assert_eq!(parse("/gamerule speed reset"), Ok(Command::SpeedReset));
        assert_eq!(parse("/gamerule speed set 2"), Ok(Command::SpeedSet(2.0)));
        assert_eq!(parse("/gamerule speed add -0.5"), Ok(Command::SpeedAdd(-0.5)));
        assert_eq!(parse("/gamerule death maybe"), Err(ConsoleError::InvalidBool("maybe".into())));
        assert_eq!(parse("/gamerule gravity 2"), Err(ConsoleError::UnknownRule("gravity".into())));
    }

    #[test]
    fn test_toggles_and_misc() {
        assert_eq!(parse("float"), Ok(Command::Toggle(Cheat::Float)));
        assert_eq!(parse("/InfiniteJump"), Ok(Command::Toggle(Cheat::InfiniteJump)));
        assert_eq!(parse("  /die "), Ok(Command::Die));
        assert_eq!(parse("/clear bestScore"), Ok(Command::ClearBestScore));
        assert_eq!(parse("/clear settings"), Err(ConsoleError::UnknownKey("settings".into())));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse(""), Err(ConsoleError::Empty));
        assert_eq!(parse("/"), Err(ConsoleError::Empty));
        assert_eq!(parse("/fly"), Err(ConsoleError::UnknownCommand("fly".into())));
    }

    #[test]
    fn test_rejects_non_finite_numbers() {
        assert_eq!(parse("/gamerule speed set inf"), Err(ConsoleError::InvalidNumber("inf".into())));
        assert_eq!(parse("/gamerule speed add NaN"), Err(ConsoleError::InvalidNumber("NaN".into())));
        assert_eq!(parse("/gamerule speed set 1e39"), Err(ConsoleError::InvalidNumber("1e39".into())));
        assert_eq!(parse("/score set -inf"), Err(ConsoleError::InvalidNumber("-inf".into())));
        assert_eq!(parse("/gamerule speed set 1e10"), Ok(Command::SpeedSet(1e10)));
    }
}
