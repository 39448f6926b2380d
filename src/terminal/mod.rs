mod display;
mod interactive;

pub use display::{DisplayError, TerminalRenderer};
pub use interactive::{SessionOptions, run_interactive_terminal};
