use std::io;

use crate::MoveOracle;
use crate::game_logic::{GameState, MoveLog};
use crate::oracle::Difficulty;
use crate::session::{GameConfig, GameLoop, Outcome, SessionError, read_difficulty};

use super::{DisplayError, TerminalRenderer};

/// Settings for one interactive game on the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Skip the difficulty prompt and use this label
    pub difficulty: Option<Difficulty>,
    /// Check oracle moves before applying them
    pub strict_oracle: bool,
    /// Refuse new moves once this many are recorded
    pub history_limit: Option<usize>,
    /// Disable ANSI highlighting
    pub plain: bool,
}

/// Runs a game on stdin/stdout with White at the keyboard and `oracle`
/// playing Black.
pub fn run_interactive_terminal(
    oracle: impl MoveOracle,
    options: SessionOptions,
) -> Result<Outcome, SessionError<DisplayError>> {
    let mut renderer = TerminalRenderer::stdout();
    if options.plain {
        renderer = renderer.plain();
    }
    let mut input = io::stdin().lock();

    let difficulty = match options.difficulty {
        Some(difficulty) => difficulty,
        None => read_difficulty(&mut input, &mut renderer)?,
    };
    log::info!("starting game, AI difficulty {difficulty}");

    let log = options.history_limit.map_or_else(MoveLog::new, MoveLog::with_limit);
    let state = GameState::new().with_log(log);
    let config = GameConfig {
        difficulty,
        strict_oracle: options.strict_oracle,
    };

    GameLoop::from_state(state, config, input, oracle, renderer).run()
}
