use std::fmt;
use std::str::FromStr;

use shakmaty::{File, Rank, Square};

/// Parse a square in coordinate notation like `"e4"`.
///
/// The file must be a lowercase letter `a`-`h`.
///
/// # Examples
/// ```
/// # use oracle_chess::notation::parse_square;
/// # use shakmaty::Square;
/// assert_eq!(parse_square("e4"), Ok(Square::E4));
/// assert!(parse_square("z9").is_err());
/// assert!(parse_square("E4").is_err());
/// ```
pub fn parse_square(s: &str) -> Result<Square, SquareParseError> {
    let mut chars = s.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(SquareParseError::WrongLength);
    };

    if !('a'..='h').contains(&file) {
        return Err(SquareParseError::BadFile);
    }
    let rank = rank
        .to_digit(10)
        .filter(|rank| (1..=8).contains(rank))
        .ok_or(SquareParseError::BadRank)?;

    Ok(Square::from_coords(
        File::new(u32::from(file) - u32::from('a')),
        Rank::new(rank - 1),
    ))
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    /// Square notation must be exactly 2 characters
    #[error("square must be 2 characters (e.g., 'e4')")]
    WrongLength,
    /// File must be a letter from a-h
    #[error("file must be a-h")]
    BadFile,
    /// Rank must be a digit from 1-8
    #[error("rank must be 1-8")]
    BadRank,
}

/// A piece transfer from one square to another.
///
/// Carries no information about what was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

/// Parses the four-character exchange format, e.g. `"e2e4"`.
impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != 4 {
            return Err(MoveParseError::WrongLength(s.to_owned()));
        }
        let mid = s.char_indices().nth(2).map_or(s.len(), |(idx, _)| idx);
        let (from, to) = s.split_at(mid);
        Ok(Move {
            from: parse_square(from).map_err(MoveParseError::From)?,
            to: parse_square(to).map_err(MoveParseError::To)?,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Error type for parsing a move in the exchange format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("move '{0}' must be 4 characters (e.g., 'e2e4')")]
    WrongLength(String),
    #[error("bad source square: {0}")]
    From(SquareParseError),
    #[error("bad destination square: {0}")]
    To(SquareParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a1", Square::A1)]
    #[test_case("h1", Square::H1)]
    #[test_case("a8", Square::A8)]
    #[test_case("h8", Square::H8)]
    #[test_case("e4", Square::E4)]
    fn test_parse_square(text: &str, expected: Square) {
        assert_eq!(parse_square(text), Ok(expected));
    }

    #[test_case("", SquareParseError::WrongLength; "empty")]
    #[test_case("a", SquareParseError::WrongLength; "one char")]
    #[test_case("abc", SquareParseError::WrongLength; "three chars")]
    #[test_case("z9", SquareParseError::BadFile; "bad file")]
    #[test_case("i1", SquareParseError::BadFile; "file past h")]
    #[test_case("a9", SquareParseError::BadRank; "rank past 8")]
    #[test_case("a0", SquareParseError::BadRank; "rank zero")]
    #[test_case("ab", SquareParseError::BadRank; "letter rank")]
    #[test_case("é4", SquareParseError::BadFile; "non ascii")]
    #[test_case("E4", SquareParseError::BadFile; "uppercase file")]
    #[test_case("H8", SquareParseError::BadFile; "uppercase corner")]
    fn test_parse_square_invalid(text: &str, expected: SquareParseError) {
        assert_eq!(parse_square(text), Err(expected));
    }

    #[test]
    fn test_square_display_roundtrip() {
        for square in Square::ALL {
            assert_eq!(parse_square(&square.to_string()), Ok(square));
        }
    }

    #[test]
    fn test_parse_move() {
        let mv: Move = "e2e4".parse().expect("valid move");
        assert_eq!(mv, Move::new(Square::E2, Square::E4));
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn test_parse_move_errors() {
        assert_eq!(
            "e2e".parse::<Move>(),
            Err(MoveParseError::WrongLength("e2e".to_owned()))
        );
        assert_eq!(
            "x2e4".parse::<Move>(),
            Err(MoveParseError::From(SquareParseError::BadFile))
        );
        assert_eq!(
            "e2e9".parse::<Move>(),
            Err(MoveParseError::To(SquareParseError::BadRank))
        );
    }

    #[test]
    fn test_parse_move_uppercase_rejected() {
        assert_eq!(
            "E7E5".parse::<Move>(),
            Err(MoveParseError::From(SquareParseError::BadFile))
        );
        assert_eq!(
            "e7E5".parse::<Move>(),
            Err(MoveParseError::To(SquareParseError::BadFile))
        );
    }

    #[test]
    fn test_parse_move_multibyte_is_rejected_not_split() {
        assert_eq!(
            "a€e4".parse::<Move>(),
            Err(MoveParseError::From(SquareParseError::BadRank))
        );
    }
}
