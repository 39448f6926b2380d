use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use shakmaty::{Color, Role};

use super::{Difficulty, OracleError};
use crate::MoveOracle;
use crate::board::{BOARD_SIZE, Board, row_col, square_at};
use crate::notation::Move;

/// Material value of a captured piece, used to rank candidate moves.
fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 100,
    }
}

/// In-process opponent that only moves pawns.
///
/// Pawns step one square forward onto an empty square, two squares from
/// their starting row when both are empty, and capture diagonally
/// forward. Difficulty picks among those:
///
/// - easy, or any unknown label: uniformly at random
/// - medium: biggest capture, then the destination closest to the centre
/// - hard: biggest capture, small bonuses for moving forward and for
///   central files
#[derive(Debug, Clone)]
pub struct BuiltinOracle {
    color: Color,
    rng: StdRng,
}

impl BuiltinOracle {
    /// Oracle playing `color`, seeded from the operating system.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Oracle with a fixed seed, for reproducible easy games.
    pub fn with_seed(color: Color, seed: u64) -> Self {
        Self {
            color,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// All pawn moves for this oracle's color, in scan order.
    ///
    /// Squares are scanned from the top row down and left to right; each
    /// pawn yields its single step, double step, then left and right
    /// captures.
    pub fn candidates(&self, board: &Board) -> Vec<Move> {
        let pawn = self.color.pawn();
        let (step, home_row): (i32, u32) = match self.color {
            Color::White => (-1, BOARD_SIZE - 2),
            Color::Black => (1, 1),
        };
        let size = BOARD_SIZE as i32;
        let at = |row: i32, col: i32| {
            let on_board = (0..size).contains(&row) && (0..size).contains(&col);
            on_board.then(|| square_at(row as u32, col as u32))
        };

        let mut moves = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let from = square_at(row, col);
                if board.get(from) != Some(pawn) {
                    continue;
                }
                let (r, c) = (row as i32, col as i32);

                if let Some(one) = at(r + step, c)
                    && board.get(one).is_none()
                {
                    moves.push(Move::new(from, one));
                    if row == home_row
                        && let Some(two) = at(r + 2 * step, c)
                        && board.get(two).is_none()
                    {
                        moves.push(Move::new(from, two));
                    }
                }

                for dc in [-1, 1] {
                    if let Some(to) = at(r + step, c + dc)
                        && board.get(to).is_some_and(|victim| victim.color != self.color)
                    {
                        moves.push(Move::new(from, to));
                    }
                }
            }
        }
        moves
    }

    fn capture_value(board: &Board, mv: Move) -> i32 {
        board.get(mv.to).map_or(0, |piece| piece_value(piece.role))
    }

    /// Medium ranking: capture value, then closeness to the centre.
    ///
    /// Distances are measured in half squares so the centre (3.5, 3.5)
    /// stays integral.
    fn medium_score(board: &Board, mv: Move) -> (i32, i32) {
        let (row, col) = row_col(mv.to);
        let dr = 2 * row as i32 - 7;
        let dc = 2 * col as i32 - 7;
        (Self::capture_value(board, mv), -(dr * dr + dc * dc))
    }

    /// Hard ranking on a scale of 2000 per pawn: 200 for a forward move,
    /// up to 400 for a central destination file.
    fn hard_score(&self, board: &Board, mv: Move) -> i32 {
        let (from_row, _) = row_col(mv.from);
        let (to_row, to_col) = row_col(mv.to);
        let forward = match self.color {
            Color::White => to_row < from_row,
            Color::Black => to_row > from_row,
        };
        let centre = 8 - (7 - 2 * to_col as i32).abs();
        Self::capture_value(board, mv) * 2000 + if forward { 200 } else { 0 } + centre * 50
    }

    /// Pick one of `moves`, `None` when there are none.
    fn choose(&mut self, board: &Board, moves: &[Move], difficulty: &Difficulty) -> Option<Move> {
        match difficulty {
            Difficulty::Medium => first_best(moves, |mv| Self::medium_score(board, mv)),
            Difficulty::Hard => first_best(moves, |mv| self.hard_score(board, mv)),
            Difficulty::Easy | Difficulty::Other(_) => moves.choose(&mut self.rng).copied(),
        }
    }
}

/// Highest scoring move; ties go to the earliest candidate.
fn first_best<K: Ord>(moves: &[Move], mut score: impl FnMut(Move) -> K) -> Option<Move> {
    let mut best: Option<(Move, K)> = None;
    for &mv in moves {
        let candidate = score(mv);
        if best.as_ref().is_none_or(|(_, best_score)| candidate > *best_score) {
            best = Some((mv, candidate));
        }
    }
    best.map(|(mv, _)| mv)
}

impl MoveOracle for BuiltinOracle {
    fn propose(&mut self, board: &Board, difficulty: &Difficulty) -> Result<Move, OracleError> {
        let moves = self.candidates(board);
        let Some(mv) = self.choose(board, &moves, difficulty) else {
            log::warn!("builtin oracle has no pawn moves for {:?}", self.color);
            return Err(OracleError::NoMove);
        };
        log::debug!("builtin oracle ({difficulty}) chose {mv} from {} candidates", moves.len());
        Ok(mv)
    }
}
