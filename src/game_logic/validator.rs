use shakmaty::{Color, Square};

use crate::board::Board;

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("no piece on {0}")]
    EmptySource(Square),
    #[error("the piece on {0} belongs to the opponent")]
    NotYourPiece(Square),
    #[error("{0} is occupied by your own piece")]
    OwnPieceAtDestination(Square),
}

/// Check the ownership and occupancy rule for a move by `mover`.
///
/// This is the whole rule set: the source must hold one of the mover's
/// pieces and the destination must not. Piece movement patterns, blocked
/// paths and king safety are not considered, so a pawn may move backwards
/// and a rook may jump. Moving a piece onto its own square is refused
/// because the destination then holds an own piece.
pub fn check(board: &Board, from: Square, to: Square, mover: Color) -> Result<(), IllegalMove> {
    let piece = board.get(from).ok_or(IllegalMove::EmptySource(from))?;
    if piece.color != mover {
        return Err(IllegalMove::NotYourPiece(from));
    }
    if board.get(to).is_some_and(|dest| dest.color == mover) {
        return Err(IllegalMove::OwnPieceAtDestination(to));
    }
    Ok(())
}

/// Boolean form of [`check`].
#[inline]
pub fn is_legal(board: &Board, from: Square, to: Square, mover: Color) -> bool {
    check(board, from, to, mover).is_ok()
}
