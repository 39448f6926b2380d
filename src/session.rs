//! Turn-by-turn driver for a game between a human (White) and a move
//! oracle (Black).

use std::io::{self, BufRead};

use shakmaty::Color;

use crate::game_logic::{GameState, HistoryError, IllegalMove};
use crate::notation::{Move, SquareParseError, parse_square};
use crate::oracle::{Difficulty, OracleError};
use crate::{MoveOracle, Renderer};

/// Token that takes back the last oracle move and the last human move.
pub const UNDO_TOKEN: &str = "u";

/// Options for a single game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameConfig {
    /// Label handed to the oracle on every turn
    pub difficulty: Difficulty,
    /// Check oracle moves with the same rule as human moves. Off by
    /// default: oracle moves are applied as proposed.
    pub strict_oracle: bool,
}

/// How a game ended.
#[derive(Debug)]
pub enum Outcome {
    /// A king left the board; `winner` is the side that still has one
    KingCaptured { winner: Color },
    /// The oracle could not supply a move
    AiFailure(OracleError),
    /// The move history refused the oracle's move
    HistoryFull(HistoryError),
    /// The player's input ended
    InputClosed,
}

/// Where the game loop currently stands.
#[derive(Debug)]
pub enum Phase {
    AwaitingWhiteInput,
    AwaitingBlackAiMove,
    GameOver(Outcome),
}

impl Phase {
    /// Phase that lets `side` move next.
    fn turn_of(side: Color) -> Self {
        match side {
            Color::White => Phase::AwaitingWhiteInput,
            Color::Black => Phase::AwaitingBlackAiMove,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

/// Why a human move was not played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("invalid input, use format like e2 e4: {0}")]
    Parse(#[from] SquareParseError),
    #[error("invalid move: {0}")]
    Illegal(#[from] IllegalMove),
    #[error("cannot record move: {0}")]
    History(#[from] HistoryError),
    #[error("invalid input, the line is not valid text")]
    Unreadable,
    #[error("invalid input, unexpected text after the move")]
    TrailingInput,
}

/// Input the player is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// The oracle difficulty
    Difficulty,
    /// The square to move from, or the undo token
    From,
    /// The square to move to
    To,
}

/// Something the renderer should tell the player.
#[derive(Debug)]
pub enum Notice<'a> {
    Prompt(Prompt),
    Rejected(Rejection),
    Undone(Move),
    NothingToUndo,
    AiThinking(&'a Difficulty),
    AiMoved(Move),
    GameOver(&'a Outcome),
}

/// One line of player input.
enum Line {
    Text(String),
    /// The bytes were not UTF-8
    Unreadable,
    Closed,
}

/// Read a line as raw bytes so undecodable input can be rejected and
/// asked for again instead of failing the session.
fn read_input_line(input: &mut impl BufRead) -> io::Result<Line> {
    let mut raw = Vec::new();
    if input.read_until(b'\n', &mut raw)? == 0 {
        return Ok(Line::Closed);
    }
    Ok(String::from_utf8(raw).map_or(Line::Unreadable, Line::Text))
}

/// Ask for a difficulty label on `input`.
///
/// Any text is accepted and kept verbatim; an empty line or closed input
/// keeps the default. Undecodable lines are rejected and asked again.
pub fn read_difficulty<R: Renderer>(
    input: &mut impl BufRead,
    renderer: &mut R,
) -> Result<Difficulty, SessionError<R::Error>> {
    loop {
        renderer
            .notify(&Notice::Prompt(Prompt::Difficulty))
            .map_err(SessionError::Render)?;
        match read_input_line(input)? {
            Line::Text(text) => {
                return Ok(text
                    .split_whitespace()
                    .next()
                    .map(Difficulty::from)
                    .unwrap_or_default());
            }
            Line::Closed => return Ok(Difficulty::default()),
            Line::Unreadable => renderer
                .notify(&Notice::Rejected(Rejection::Unreadable))
                .map_err(SessionError::Render)?,
        }
    }
}

/// Error types for running a session.
///
/// Game events never show up here; only the player-facing I/O failing.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<E: std::fmt::Debug + std::fmt::Display> {
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
    #[error("failed to render: {0}")]
    Render(E),
}

/// Game loop wiring the state machine to input, oracle and renderer.
#[derive(Debug)]
pub struct GameLoop<I, O, R> {
    state: GameState,
    phase: Phase,
    config: GameConfig,
    input: I,
    oracle: O,
    renderer: R,
}

impl<I: BufRead, O: MoveOracle, R: Renderer> GameLoop<I, O, R> {
    /// Loop over a fresh game.
    pub fn new(config: GameConfig, input: I, oracle: O, renderer: R) -> Self {
        Self::from_state(GameState::new(), config, input, oracle, renderer)
    }

    /// Loop over an existing state; the side to move picks the phase.
    pub fn from_state(
        state: GameState,
        config: GameConfig,
        input: I,
        oracle: O,
        renderer: R,
    ) -> Self {
        let phase = match state.winner() {
            Some(winner) => Phase::GameOver(Outcome::KingCaptured { winner }),
            None => Phase::turn_of(state.side_to_move()),
        };
        Self {
            state,
            phase,
            config,
            input,
            oracle,
            renderer,
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[inline]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Play until the game is over and return how it ended.
    pub fn run(mut self) -> Result<Outcome, SessionError<R::Error>> {
        let outcome = loop {
            if let Phase::GameOver(outcome) = self.phase {
                break outcome;
            }
            self.step()?;
        };
        self.renderer
            .show(&self.state)
            .map_err(SessionError::Render)?;
        log::info!("game over: {outcome:?}");
        self.renderer
            .notify(&Notice::GameOver(&outcome))
            .map_err(SessionError::Render)?;
        Ok(outcome)
    }

    /// Advance the state machine by one transition.
    ///
    /// Does nothing once the game is over.
    pub fn step(&mut self) -> Result<(), SessionError<R::Error>> {
        match self.phase {
            Phase::AwaitingWhiteInput => {
                self.render()?;
                self.human_turn()
            }
            Phase::AwaitingBlackAiMove => {
                self.render()?;
                self.oracle_turn()
            }
            Phase::GameOver(_) => Ok(()),
        }
    }

    fn render(&mut self) -> Result<(), SessionError<R::Error>> {
        self.renderer.show(&self.state).map_err(SessionError::Render)
    }

    fn notify(&mut self, notice: Notice<'_>) -> Result<(), SessionError<R::Error>> {
        self.renderer.notify(&notice).map_err(SessionError::Render)
    }

    /// Prompt and read one non-blank line, split into tokens.
    ///
    /// `None` when input is exhausted. Lines that are not valid UTF-8 are
    /// rejected and prompted again.
    fn prompt(&mut self, prompt: Prompt) -> Result<Option<Vec<String>>, SessionError<R::Error>> {
        loop {
            self.notify(Notice::Prompt(prompt))?;
            let line = match read_input_line(&mut self.input)? {
                Line::Text(line) => line,
                Line::Unreadable => {
                    self.notify(Notice::Rejected(Rejection::Unreadable))?;
                    continue;
                }
                Line::Closed => return Ok(None),
            };
            let tokens: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
            if !tokens.is_empty() {
                return Ok(Some(tokens));
            }
        }
    }

    fn human_turn(&mut self) -> Result<(), SessionError<R::Error>> {
        let Some(tokens) = self.prompt(Prompt::From)? else {
            self.phase = Phase::GameOver(Outcome::InputClosed);
            return Ok(());
        };

        if tokens.len() > 2 {
            return self.notify(Notice::Rejected(Rejection::TrailingInput));
        }
        if tokens[0] == UNDO_TOKEN && tokens.len() == 1 {
            return self.undo_pair();
        }

        let (from, to) = match (tokens[0].as_str(), tokens.get(1)) {
            (both, None) if both.chars().count() == 4 => {
                let mid = both.char_indices().nth(2).map_or(both.len(), |(idx, _)| idx);
                let (from, to) = both.split_at(mid);
                (from.to_owned(), to.to_owned())
            }
            (from, Some(to)) => (from.to_owned(), to.clone()),
            (from, None) => {
                if let Err(e) = parse_square(from) {
                    return self.notify(Notice::Rejected(e.into()));
                }
                let from = from.to_owned();
                let Some(tokens) = self.prompt(Prompt::To)? else {
                    self.phase = Phase::GameOver(Outcome::InputClosed);
                    return Ok(());
                };
                if tokens.len() > 1 {
                    return self.notify(Notice::Rejected(Rejection::TrailingInput));
                }
                (from, tokens[0].clone())
            }
        };

        let parsed = parse_square(&from)
            .and_then(|from| parse_square(&to).map(|to| Move::new(from, to)));
        let mv = match parsed {
            Ok(mv) => mv,
            Err(e) => return self.notify(Notice::Rejected(e.into())),
        };
        if let Err(e) = self.state.check(mv) {
            log::debug!("rejected {mv}: {e}");
            return self.notify(Notice::Rejected(e.into()));
        }
        if let Err(e) = self.state.apply(mv) {
            return self.notify(Notice::Rejected(e.into()));
        }
        self.after_move();
        Ok(())
    }

    /// Take back up to two moves, flipping the turn once per move undone.
    fn undo_pair(&mut self) -> Result<(), SessionError<R::Error>> {
        for _ in 0..2 {
            match self.state.undo() {
                Ok(mv) => self.notify(Notice::Undone(mv))?,
                Err(_) => {
                    self.notify(Notice::NothingToUndo)?;
                    break;
                }
            }
        }
        self.phase = Phase::turn_of(self.state.side_to_move());
        Ok(())
    }

    fn oracle_turn(&mut self) -> Result<(), SessionError<R::Error>> {
        self.renderer
            .notify(&Notice::AiThinking(&self.config.difficulty))
            .map_err(SessionError::Render)?;

        let mv = match self.oracle.propose(self.state.board(), &self.config.difficulty) {
            Ok(mv) => mv,
            Err(e) => {
                log::warn!("oracle failed: {e}");
                self.phase = Phase::GameOver(Outcome::AiFailure(e));
                return Ok(());
            }
        };

        if self.config.strict_oracle
            && let Err(e) = self.state.check(mv)
        {
            log::warn!("oracle proposed illegal move {mv}: {e}");
            self.phase = Phase::GameOver(Outcome::AiFailure(e.into()));
            return Ok(());
        }

        if let Err(e) = self.state.apply(mv) {
            self.phase = Phase::GameOver(Outcome::HistoryFull(e));
            return Ok(());
        }
        self.notify(Notice::AiMoved(mv))?;
        self.after_move();
        Ok(())
    }

    /// Pick the next phase after a move was applied.
    fn after_move(&mut self) {
        self.phase = match self.state.winner() {
            Some(winner) => Phase::GameOver(Outcome::KingCaptured { winner }),
            None => Phase::turn_of(self.state.side_to_move()),
        };
    }
}
