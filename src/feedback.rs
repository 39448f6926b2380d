use shakmaty::Square;

use crate::game_logic::GameState;
use crate::notation::Move;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// The last move started here
    Origin,
    /// The last move ended here
    Destination,
    /// The last move took a king here
    KingLost,
}

/// Contains the set of squares and their associated feedback types for the current board state.
///
/// `BoardFeedback` is computed by `compute_feedback()` and consumed by renderers to
/// highlight squares for the player.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any existing entry
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == square) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((square, feedback)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

/// Game state information needed to compute feedback
pub trait FeedbackSource {
    /// The most recently applied move still on record
    fn last_move(&self) -> Option<Move>;

    /// Square where a move captured a king, if the game just ended that way
    fn captured_king(&self) -> Option<Square>;
}

impl FeedbackSource for GameState {
    fn last_move(&self) -> Option<Move> {
        self.log().last()
    }

    fn captured_king(&self) -> Option<Square> {
        self.winner()
            .and_then(|_| self.log().last())
            .map(|mv| mv.to)
    }
}

/// Compute visual feedback based on current game state.
///
/// Marks both ends of the last move. When that move took a king its
/// destination is marked [`SquareFeedback::KingLost`] instead.
pub fn compute_feedback(source: &impl FeedbackSource) -> BoardFeedback {
    let mut feedback = BoardFeedback::new();
    if let Some(mv) = source.last_move() {
        feedback.set(mv.from, SquareFeedback::Origin);
        feedback.set(mv.to, SquareFeedback::Destination);
    }
    if let Some(square) = source.captured_king() {
        feedback.set(square, SquareFeedback::KingLost);
    }
    feedback
}
