use std::fmt;
use std::str::FromStr;

use shakmaty::{Color, File, Piece, Rank, Role, Square};

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u32 = 8;

/// Square at the given row and column.
///
/// Row 0 is the eighth rank (the first line of the export format),
/// column 0 is the a-file.
///
/// # Panics
///
/// Panics if either coordinate is outside `0..8`.
pub fn square_at(row: u32, col: u32) -> Square {
    assert!(
        row < BOARD_SIZE && col < BOARD_SIZE,
        "coordinates ({row}, {col}) are off the board"
    );
    Square::from_coords(File::new(col), Rank::new(BOARD_SIZE - 1 - row))
}

/// Row and column of a square, inverse of [`square_at`].
pub fn row_col(square: Square) -> (u32, u32) {
    let rank = square.rank() as u32;
    let file = square.file() as u32;
    (BOARD_SIZE - 1 - rank, file)
}

/// Piece placement for the whole game.
///
/// Only placement is tracked: no castling rights, no en passant square,
/// no king-count invariant. A color may end up with zero kings, which is
/// exactly what ends the game.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    inner: shakmaty::Board,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Board in the standard starting arrangement.
    pub fn new() -> Self {
        Self {
            inner: shakmaty::Board::new(),
        }
    }

    /// Board with no pieces at all.
    pub fn empty() -> Self {
        Self {
            inner: shakmaty::Board::empty(),
        }
    }

    /// Put every piece back on its starting square and clear the rest.
    pub fn reset(&mut self) {
        self.inner = shakmaty::Board::new();
    }

    /// Occupant of a square, if any.
    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.inner.piece_at(square)
    }

    /// Overwrite a square. `None` clears it.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        match piece {
            Some(piece) => self.inner.set_piece_at(square, piece),
            None => self.inner.discard_piece_at(square),
        }
    }

    /// Whether at least one king of `color` is still on the board.
    pub fn king_present(&self, color: Color) -> bool {
        !(self.inner.by_role(Role::King) & self.inner.by_color(color)).is_empty()
    }

    /// Number of pieces of `color` on the board.
    pub fn count(&self, color: Color) -> usize {
        self.inner.by_color(color).count()
    }

    /// Serialize into the exchange format read by external move oracles.
    ///
    /// Eight lines of eight characters, eighth rank first. White pieces
    /// are uppercase, black pieces lowercase, empty squares `.`.
    pub fn export(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in Rank::ALL.iter().rev() {
            for file in File::ALL {
                let square = Square::from_coords(file, *rank);
                out.push(self.get(square).map_or('.', |piece| piece.char()));
            }
            out.push('\n');
        }
        out
    }
}

/// Parses the export format produced by [`Board::export`].
///
/// Trailing whitespace on each line is ignored, blank lines are skipped.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(BoardParseError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, line) in (0..).zip(&rows) {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != BOARD_SIZE as usize {
                return Err(BoardParseError::RowWidth {
                    row,
                    width: cells.len(),
                });
            }
            for (col, ch) in (0..).zip(cells) {
                if ch == '.' {
                    continue;
                }
                let piece = Piece::from_char(ch).ok_or(BoardParseError::BadPiece(ch))?;
                board.set(square_at(row, col), Some(piece));
            }
        }
        Ok(board)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("placement", &self.inner.to_string())
            .finish()
    }
}

/// Error when reading a board in the export format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {row} has {width} cells, expected 8")]
    RowWidth { row: u32, width: usize },
    #[error("unknown piece letter '{0}'")]
    BadPiece(char),
}
