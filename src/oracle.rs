mod builtin;
mod process;
mod script;

pub use builtin::BuiltinOracle;
pub use process::{ProcessOracle, ProcessOracleConfig};
pub use script::{ScriptError, ScriptedOracle};

use std::fmt;
use std::io;
use std::time::Duration;

use crate::game_logic::IllegalMove;
use crate::notation::MoveParseError;

/// Strength label handed to a move oracle.
///
/// Labels outside the known three are kept verbatim and passed through
/// to external engines unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    /// Label as passed on an engine command line.
    pub fn label(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(label) => label,
        }
    }
}

impl From<&str> for Difficulty {
    fn from(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(label.to_owned()),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error types for move oracles.
///
/// Any of these ends the game: the automated side has no move to play.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The oracle ran but produced no move
    #[error("no move was produced")]
    NoMove,
    /// The oracle produced text that is not a move
    #[error("unreadable move: {0}")]
    Malformed(#[from] MoveParseError),
    /// The engine process did not finish in time
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
    /// The engine process could not be started
    #[error("failed to start engine '{program}': {source}")]
    Spawn { program: String, source: io::Error },
    /// Exchange file or process handling failed
    #[error("engine I/O failed: {0}")]
    Io(#[from] io::Error),
    /// A scripted oracle ran out of moves
    #[error("no scripted moves left")]
    Exhausted,
    /// The proposed move breaks the ownership rule
    #[error("engine proposed an illegal move: {0}")]
    IllegalProposal(#[from] IllegalMove),
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("easy", Difficulty::Easy)]
    #[test_case("Medium", Difficulty::Medium)]
    #[test_case("HARD", Difficulty::Hard)]
    #[test_case("grandmaster", Difficulty::Other("grandmaster".to_owned()))]
    #[test_case("", Difficulty::Other(String::new()); "empty")]
    fn test_difficulty_from_label(label: &str, expected: Difficulty) {
        assert_eq!(Difficulty::from(label), expected);
    }

    #[test]
    fn test_unknown_label_passed_verbatim() {
        let difficulty = Difficulty::from("Nightmare");
        assert_eq!(difficulty.label(), "Nightmare");
        assert_eq!(difficulty.to_string(), "Nightmare");
    }

    #[test]
    fn test_default_is_easy() {
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }
}
