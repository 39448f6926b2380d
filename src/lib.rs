pub mod board;
pub mod feedback;
pub mod game_logic;
pub mod notation;
pub mod oracle;
pub mod session;
pub mod terminal;

use board::Board;
use notation::Move;
use oracle::{Difficulty, OracleError};
use session::Notice;

/// Trait for obtaining moves for the side not under human control.
///
/// Abstracts over an external engine process and in-process players,
/// providing a uniform interface for [`session::GameLoop`].
pub trait MoveOracle {
    /// Propose the next move for the given position.
    ///
    /// The proposal is a candidate only; the caller decides whether to
    /// check it before applying.
    fn propose(&mut self, board: &Board, difficulty: &Difficulty) -> Result<Move, OracleError>;
}

impl<O: MoveOracle + ?Sized> MoveOracle for Box<O> {
    fn propose(&mut self, board: &Board, difficulty: &Difficulty) -> Result<Move, OracleError> {
        (**self).propose(board, difficulty)
    }
}

impl<O: MoveOracle + ?Sized> MoveOracle for &mut O {
    fn propose(&mut self, board: &Board, difficulty: &Difficulty) -> Result<Move, OracleError> {
        (**self).propose(board, difficulty)
    }
}

/// Trait for presenting the game to the player.
///
/// Abstracts over the terminal and recording renderers used in tests.
/// Mirrors [`MoveOracle`] on the output side of the game loop.
pub trait Renderer {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Draw the board, highlighting whatever [`feedback::compute_feedback`]
    /// reports for the current state.
    fn show(&mut self, state: &game_logic::GameState) -> Result<(), Self::Error>;

    /// Tell the player about a prompt, a rejection or a change of phase.
    fn notify(&mut self, notice: &Notice<'_>) -> Result<(), Self::Error>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    type Error = R::Error;

    fn show(&mut self, state: &game_logic::GameState) -> Result<(), Self::Error> {
        (**self).show(state)
    }

    fn notify(&mut self, notice: &Notice<'_>) -> Result<(), Self::Error> {
        (**self).notify(notice)
    }
}
