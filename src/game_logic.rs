mod history;
mod validator;

pub use history::{HistoryError, MoveLog};
pub use validator::{IllegalMove, check, is_legal};

use shakmaty::{Color, Piece, Square};

use crate::board::Board;
use crate::notation::Move;

/// Everything that changes while a game is played.
///
/// The board, the history needed for undo, and whose turn it is live
/// together here so there is exactly one mutable owner of the game.
#[derive(Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    log: MoveLog,
    side_to_move: Color,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Starting position, White to move, unbounded history.
    #[inline]
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    /// Creates a state from an arbitrary placement.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            log: MoveLog::new(),
            side_to_move,
        }
    }

    /// Replace the history with `log`, keeping board and turn.
    pub fn with_log(mut self, log: MoveLog) -> Self {
        self.log = log;
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Get the piece at a given square, if any
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get(square)
    }

    /// Check `mv` against the ownership rule for the side to move.
    pub fn check(&self, mv: Move) -> Result<(), IllegalMove> {
        check(&self.board, mv.from, mv.to, self.side_to_move)
    }

    /// Play a move without validating it and pass the turn.
    ///
    /// Whatever stood on the destination is overwritten. The move is
    /// recorded before the board changes, so a full history leaves the
    /// position untouched.
    pub fn apply(&mut self, mv: Move) -> Result<(), HistoryError> {
        self.log.record(mv)?;
        let piece = self.board.get(mv.from);
        self.board.set(mv.to, piece);
        self.board.set(mv.from, None);
        self.side_to_move = !self.side_to_move;
        log::debug!("applied {mv}, {:?} to move", self.side_to_move);
        Ok(())
    }

    /// Take back the most recent move and pass the turn back.
    ///
    /// The moved piece returns to its source and the destination is left
    /// empty. A piece captured by the undone move is not restored.
    pub fn undo(&mut self) -> Result<Move, HistoryError> {
        let mv = self.log.pop_last()?;
        let piece = self.board.get(mv.to);
        self.board.set(mv.from, piece);
        self.board.set(mv.to, None);
        self.side_to_move = !self.side_to_move;
        log::debug!("undid {mv}, {:?} to move", self.side_to_move);
        Ok(mv)
    }

    /// Winner by king capture, if a king is missing.
    ///
    /// A missing White king is reported first, so if both kings are
    /// gone Black is the winner.
    pub fn winner(&self) -> Option<Color> {
        if !self.board.king_present(Color::White) {
            Some(Color::Black)
        } else if !self.board.king_present(Color::Black) {
            Some(Color::White)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("board", &self.board)
            .field("side_to_move", &self.side_to_move)
            .field("moves", &self.log.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Role;
    use test_case::test_case;

    fn assert_piece(state: &GameState, square: &str, role: Role, color: Color) {
        let sq: Square = square.parse().expect("asserted square is invalid");
        let expected = Piece { role, color };
        assert_eq!(
            state.piece_at(sq),
            Some(expected),
            "Expected {:?} at {}, found {:?}",
            expected,
            square,
            state.piece_at(sq)
        );
    }

    fn assert_empty(state: &GameState, square: &str) {
        let sq: Square = square.parse().expect("asserted square is invalid");
        assert_eq!(
            state.piece_at(sq),
            None,
            "Expected empty at {}, found {:?}",
            square,
            state.piece_at(sq)
        );
    }

    /// Helper to play a sequence of moves without validation.
    fn play(state: &mut GameState, moves: &[&str]) {
        for text in moves {
            let mv: Move = text.parse().expect("test move should be valid");
            state.apply(mv).expect("history should not be full");
        }
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.side_to_move(), Color::White);
        assert!(state.log().is_empty());
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_simple_move() {
        let mut state = GameState::new();

        play(&mut state, &["e2e4"]);

        assert_empty(&state, "e2");
        assert_piece(&state, "e4", Role::Pawn, Color::White);
        assert_eq!(state.side_to_move(), Color::Black);
        assert_eq!(state.log().len(), 1);
    }

    #[test]
    fn test_game_sequence() {
        let mut state = GameState::new();

        play(&mut state, &["e2e4", "e7e5", "g1f3", "b8c6"]);

        assert_piece(&state, "e4", Role::Pawn, Color::White);
        assert_piece(&state, "e5", Role::Pawn, Color::Black);
        assert_piece(&state, "f3", Role::Knight, Color::White);
        assert_piece(&state, "c6", Role::Knight, Color::Black);
        assert_eq!(state.side_to_move(), Color::White);
    }

    #[test_case("e2e4")]
    #[test_case("g1f3")]
    #[test_case("d1h5")]
    fn test_undo_restores_quiet_move(text: &str) {
        let mut state = GameState::new();
        let before = state.clone();

        play(&mut state, &[text]);
        let undone = state.undo().expect("one move recorded");

        assert_eq!(undone.to_string(), text);
        assert_eq!(state, before);
    }

    #[test]
    fn test_undo_loses_captured_piece() {
        let mut state = GameState::new();
        play(&mut state, &["e2e4", "d7d5", "e4d5"]);
        assert_piece(&state, "d5", Role::Pawn, Color::White);

        state.undo().expect("capture recorded");

        assert_piece(&state, "e4", Role::Pawn, Color::White);
        assert_empty(&state, "d5");
        assert_eq!(state.board().count(Color::Black), 15);
        assert_eq!(state.side_to_move(), Color::White);
    }

    #[test]
    fn test_undo_empty_history() {
        let mut state = GameState::new();
        assert_eq!(state.undo(), Err(HistoryError::Empty));
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_full_history_leaves_board_untouched() {
        let mut state = GameState::new().with_log(MoveLog::with_limit(1));
        play(&mut state, &["e2e4"]);
        let before = state.clone();

        let result = state.apply("e7e5".parse().unwrap());

        assert_eq!(result, Err(HistoryError::Full { capacity: 1 }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_check_uses_side_to_move() {
        let mut state = GameState::new();
        let black_move: Move = "e7e5".parse().unwrap();
        assert_eq!(
            state.check(black_move),
            Err(IllegalMove::NotYourPiece(Square::E7))
        );

        play(&mut state, &["e2e4"]);
        assert_eq!(state.check(black_move), Ok(()));
    }

    #[test]
    fn test_king_capture_winner() {
        let mut state = GameState::new();
        play(&mut state, &["d1e8"]);
        assert_eq!(state.winner(), Some(Color::White));

        let mut state = GameState::new();
        play(&mut state, &["e2e3", "d8e1"]);
        assert_eq!(state.winner(), Some(Color::Black));
    }

    #[test]
    fn test_both_kings_missing_reports_black() {
        let mut board = Board::new();
        board.set(Square::E1, None);
        board.set(Square::E8, None);
        let state = GameState::from_board(board, Color::White);
        assert_eq!(state.winner(), Some(Color::Black));
    }

    #[test]
    fn test_apply_from_empty_square_moves_nothing() {
        let mut state = GameState::new();
        play(&mut state, &["e4e5"]);
        assert_empty(&state, "e4");
        assert_empty(&state, "e5");
        assert_eq!(state.side_to_move(), Color::Black);
    }
}
