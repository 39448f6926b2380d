use crate::notation::Move;

/// Error types for move history operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// Undo requested with no recorded moves
    #[error("no moves to undo")]
    Empty,
    /// The configured capacity limit has been reached
    #[error("move history is full ({capacity} moves)")]
    Full { capacity: usize },
}

/// Applied moves in the order they were played.
///
/// Unbounded by default. With [`MoveLog::with_limit`] the log refuses new
/// entries once full instead of evicting old ones, so every recorded move
/// stays undoable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLog {
    moves: Vec<Move>,
    limit: Option<usize>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that holds at most `limit` moves.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            moves: Vec::with_capacity(limit),
            limit: Some(limit),
        }
    }

    /// Append a move. Nothing is recorded when the log is full.
    pub fn record(&mut self, mv: Move) -> Result<(), HistoryError> {
        if let Some(capacity) = self.limit
            && self.moves.len() >= capacity
        {
            return Err(HistoryError::Full { capacity });
        }
        self.moves.push(mv);
        Ok(())
    }

    /// Remove and return the most recent move.
    pub fn pop_last(&mut self) -> Result<Move, HistoryError> {
        self.moves.pop().ok_or(HistoryError::Empty)
    }

    #[inline]
    pub fn last(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Recorded moves, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Square;

    fn mv(text: &str) -> Move {
        text.parse().expect("test move should be valid")
    }

    #[test]
    fn test_pop_empty() {
        let mut log = MoveLog::new();
        assert_eq!(log.pop_last(), Err(HistoryError::Empty));
        assert!(log.is_empty());
    }

    #[test]
    fn test_pop_returns_most_recent() {
        let mut log = MoveLog::new();
        log.record(mv("e2e4")).unwrap();
        log.record(mv("e7e5")).unwrap();

        assert_eq!(log.pop_last(), Ok(mv("e7e5")));
        assert_eq!(log.pop_last(), Ok(mv("e2e4")));
        assert_eq!(log.pop_last(), Err(HistoryError::Empty));
    }

    #[test]
    fn test_len_after_records_and_undo() {
        let mut log = MoveLog::new();
        for text in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4"] {
            log.record(mv(text)).unwrap();
        }
        assert_eq!(log.len(), 5);

        log.pop_last().unwrap();
        assert_eq!(log.len(), 4);
        assert_eq!(log.last(), Some(mv("b8c6")));
    }

    #[test]
    fn test_iter_in_play_order() {
        let mut log = MoveLog::new();
        log.record(mv("e2e4")).unwrap();
        log.record(mv("e7e5")).unwrap();

        let played: Vec<String> = log.iter().map(ToString::to_string).collect();
        assert_eq!(played, ["e2e4", "e7e5"]);
    }

    #[test]
    fn test_unbounded_grows_past_hundred() {
        let mut log = MoveLog::new();
        for _ in 0..250 {
            log.record(Move::new(Square::A2, Square::A3)).unwrap();
        }
        assert_eq!(log.len(), 250);
        assert_eq!(log.limit(), None);
    }

    #[test]
    fn test_limit_rejects_when_full() {
        let mut log = MoveLog::with_limit(2);
        log.record(mv("e2e4")).unwrap();
        log.record(mv("e7e5")).unwrap();

        assert_eq!(
            log.record(mv("g1f3")),
            Err(HistoryError::Full { capacity: 2 })
        );
        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some(mv("e7e5")));
    }

    #[test]
    fn test_limit_frees_after_pop() {
        let mut log = MoveLog::with_limit(1);
        log.record(mv("e2e4")).unwrap();
        log.pop_last().unwrap();
        assert_eq!(log.record(mv("d2d4")), Ok(()));
    }
}
