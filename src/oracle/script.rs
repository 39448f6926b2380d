use std::collections::VecDeque;

use thiserror::Error;

use super::{Difficulty, OracleError};
use crate::MoveOracle;
use crate::board::Board;
use crate::notation::Move;

/// Error when parsing a move script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid move in script: '{0}'")]
pub struct ScriptError(String);

/// An oracle that replays a fixed list of moves.
///
/// Moves are returned in script order regardless of the position. When
/// the script runs out the oracle fails with [`OracleError::Exhausted`].
/// Every board it is asked about is kept in export form for inspection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    pending: VecDeque<Move>,
    seen: Vec<String>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the moves of `script` queued.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let mut oracle = Self::new();
        oracle.push_script(script)?;
        Ok(oracle)
    }

    /// Parse and queue additional moves.
    ///
    /// Format:
    /// - Moves are 4 characters (e.g., "e7e5")
    /// - Whitespace or periods separate moves
    ///
    /// Examples:
    /// - `"e7e5 d7d5"`
    /// - `"e7e5. d7d5."`
    ///
    /// On error nothing from this script is queued.
    pub fn push_script(&mut self, script: &str) -> Result<(), ScriptError> {
        let moves = script
            .split(|c: char| c == '.' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| token.parse().map_err(|_| ScriptError(token.to_owned())))
            .collect::<Result<Vec<Move>, _>>()?;
        self.pending.extend(moves);
        Ok(())
    }

    /// Number of moves still queued.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Boards this oracle was consulted on, in export format.
    #[inline]
    pub fn seen(&self) -> &[String] {
        &self.seen
    }
}

impl MoveOracle for ScriptedOracle {
    fn propose(&mut self, board: &Board, _difficulty: &Difficulty) -> Result<Move, OracleError> {
        self.seen.push(board.export());
        self.pending.pop_front().ok_or(OracleError::Exhausted)
    }
}
