use std::io::{self, Write};

use shakmaty::{Color, File, Piece, Rank, Role, Square};

use crate::Renderer;
use crate::feedback::{SquareFeedback, compute_feedback};
use crate::game_logic::GameState;
use crate::session::{Notice, Outcome, Prompt};

/// Terminal-based board display.
///
/// Draws the board with chess glyphs and ANSI color-coded squares for
/// the last move, and prints prompts and game messages as plain lines.
#[derive(Debug)]
pub struct TerminalRenderer<W = io::Stdout> {
    out: W,
    color: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Renderer writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, color: true }
    }

    /// Turn ANSI highlighting off.
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    type Error = DisplayError;

    fn show(&mut self, state: &GameState) -> Result<(), Self::Error> {
        render_board(&mut self.out, state, self.color)
    }

    fn notify(&mut self, notice: &Notice<'_>) -> Result<(), Self::Error> {
        write_notice(&mut self.out, notice)
    }
}

/// Render the board to any writer. Extracted for testability.
fn render_board(w: &mut impl Write, state: &GameState, color: bool) -> Result<(), DisplayError> {
    let feedback = compute_feedback(state);

    writeln!(w, "  a b c d e f g h")?;
    for rank in Rank::ALL.iter().rev() {
        write!(w, "{} ", rank.char())?;
        for file in File::ALL {
            let square = Square::from_coords(file, *rank);
            let cell = glyph(state.piece_at(square));
            match feedback.get(square).filter(|_| color) {
                Some(kind) => write!(w, "{}{cell} \x1b[0m", highlight(kind))?,
                None => write!(w, "{cell} ")?,
            }
        }
        writeln!(w)?;
    }
    writeln!(w, "  a b c d e f g h")?;
    w.flush()?;
    Ok(())
}

/// Glyph for a square's occupant.
///
/// White pieces use the filled glyphs, which read as light pieces on
/// dark terminal backgrounds.
fn glyph(piece: Option<Piece>) -> char {
    let Some(piece) = piece else {
        return '.';
    };
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♚',
        (Color::White, Role::Queen) => '♛',
        (Color::White, Role::Rook) => '♜',
        (Color::White, Role::Bishop) => '♝',
        (Color::White, Role::Knight) => '♞',
        (Color::White, Role::Pawn) => '♟',
        (Color::Black, Role::King) => '♔',
        (Color::Black, Role::Queen) => '♕',
        (Color::Black, Role::Rook) => '♖',
        (Color::Black, Role::Bishop) => '♗',
        (Color::Black, Role::Knight) => '♘',
        (Color::Black, Role::Pawn) => '♙',
    }
}

/// Map a feedback variant to an ANSI background.
fn highlight(feedback: SquareFeedback) -> &'static str {
    match feedback {
        SquareFeedback::Origin => "\x1b[42m",
        SquareFeedback::Destination => "\x1b[44m",
        SquareFeedback::KingLost => "\x1b[41m",
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn write_notice(w: &mut impl Write, notice: &Notice<'_>) -> Result<(), DisplayError> {
    match notice {
        Notice::Prompt(Prompt::Difficulty) => {
            write!(w, "Choose AI difficulty (easy, medium, hard): ")?
        }
        Notice::Prompt(Prompt::From) => {
            write!(w, "White's move (e.g. e2 e4) or 'u' to undo double move: ")?
        }
        Notice::Prompt(Prompt::To) => write!(w, "to: ")?,
        Notice::Rejected(rejection) => writeln!(w, "{rejection}")?,
        Notice::Undone(mv) => writeln!(w, "Undid move: {mv}")?,
        Notice::NothingToUndo => writeln!(w, "No moves to undo.")?,
        Notice::AiThinking(difficulty) => writeln!(w, "AI ({difficulty}) is thinking...")?,
        Notice::AiMoved(mv) => writeln!(w, "AI played {mv}")?,
        Notice::GameOver(Outcome::KingCaptured { winner }) => writeln!(
            w,
            "{} wins! {} king was captured.",
            color_name(*winner),
            color_name(!*winner)
        )?,
        Notice::GameOver(Outcome::AiFailure(e)) => writeln!(w, "AI move failed: {e}")?,
        Notice::GameOver(Outcome::HistoryFull(e)) => writeln!(w, "Game stopped: {e}")?,
        Notice::GameOver(Outcome::InputClosed) => writeln!(w, "Input closed, leaving the game.")?,
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::IllegalMove;
    use crate::oracle::{Difficulty, OracleError};
    use crate::session::Rejection;

    fn render_to_string(state: &GameState) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.show(state).expect("rendering to buffer should succeed");
        String::from_utf8(renderer.into_inner()).expect("output should be valid UTF-8")
    }

    fn notice_to_string(notice: &Notice<'_>) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.notify(notice).expect("rendering to buffer should succeed");
        String::from_utf8(renderer.into_inner()).expect("output should be valid UTF-8")
    }

    #[test]
    fn show_start_position() {
        let output = render_to_string(&GameState::new());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[1], "8 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ ");
        assert_eq!(lines[2], "7 ♙ ♙ ♙ ♙ ♙ ♙ ♙ ♙ ");
        assert_eq!(lines[5], "4 . . . . . . . . ");
        assert_eq!(lines[8], "1 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ ");
        assert_eq!(lines[9], "  a b c d e f g h");
    }

    #[test]
    fn start_position_has_no_ansi_codes() {
        let output = render_to_string(&GameState::new());
        assert!(!output.contains("\x1b["), "no move yet, nothing to highlight");
    }

    #[test]
    fn last_move_highlighted() {
        let mut state = GameState::new();
        state.apply("e2e4".parse().unwrap()).unwrap();

        let output = render_to_string(&state);

        assert!(output.contains("\x1b[42m. \x1b[0m"), "origin should be green");
        assert!(output.contains("\x1b[44m♟ \x1b[0m"), "destination should be blue");
    }

    #[test]
    fn king_capture_highlighted_red() {
        let mut state = GameState::new();
        state.apply("d1e8".parse().unwrap()).unwrap();

        let output = render_to_string(&state);

        assert!(output.contains("\x1b[41m♛ \x1b[0m"));
    }

    #[test]
    fn plain_renderer_has_no_ansi_codes() {
        let mut state = GameState::new();
        state.apply("e2e4".parse().unwrap()).unwrap();
        let mut renderer = TerminalRenderer::new(Vec::new()).plain();

        renderer.show(&state).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn game_over_messages() {
        let white = Outcome::KingCaptured {
            winner: Color::White,
        };
        let black = Outcome::KingCaptured {
            winner: Color::Black,
        };
        let failed = Outcome::AiFailure(OracleError::NoMove);

        assert_eq!(
            notice_to_string(&Notice::GameOver(&white)),
            "White wins! Black king was captured.\n"
        );
        assert_eq!(
            notice_to_string(&Notice::GameOver(&black)),
            "Black wins! White king was captured.\n"
        );
        assert_eq!(
            notice_to_string(&Notice::GameOver(&failed)),
            "AI move failed: no move was produced\n"
        );
    }

    #[test]
    fn prompts_stay_on_the_same_line() {
        assert_eq!(notice_to_string(&Notice::Prompt(Prompt::To)), "to: ");
        assert!(!notice_to_string(&Notice::Prompt(Prompt::From)).ends_with('\n'));
    }

    #[test]
    fn rejection_and_progress_messages() {
        let rejected = Notice::Rejected(Rejection::Illegal(IllegalMove::EmptySource(Square::E4)));
        assert_eq!(notice_to_string(&rejected), "invalid move: no piece on e4\n");

        let hard = Difficulty::Hard;
        assert_eq!(
            notice_to_string(&Notice::AiThinking(&hard)),
            "AI (hard) is thinking...\n"
        );
        assert_eq!(notice_to_string(&Notice::NothingToUndo), "No moves to undo.\n");
    }
}
