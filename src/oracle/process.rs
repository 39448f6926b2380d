use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::{Difficulty, OracleError};
use crate::MoveOracle;
use crate::board::Board;
use crate::notation::Move;

/// How to run an external engine and where to exchange files with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOracleConfig {
    /// Executable to run
    pub program: String,
    /// Arguments placed before the exchange file names
    pub args: Vec<String>,
    /// Working directory of the engine; exchange files live here
    pub exchange_dir: PathBuf,
    /// File the board is written to
    pub board_file: String,
    /// File the engine writes its move to
    pub move_file: String,
    /// How long the engine may run before it is killed
    pub timeout: Duration,
    /// How often to check whether the engine has exited
    pub poll_interval: Duration,
}

impl Default for ProcessOracleConfig {
    fn default() -> Self {
        Self {
            program: "python".to_owned(),
            args: vec!["ai.py".to_owned()],
            exchange_dir: PathBuf::from("."),
            board_file: "board.txt".to_owned(),
            move_file: "move.txt".to_owned(),
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Oracle backed by an external engine process.
///
/// Each call writes the board to the board file, runs
/// `<program> <args...> <board file> <move file> <difficulty>` inside the
/// exchange directory and reads the first token of the move file. The
/// move file is deleted beforehand so an engine that writes nothing
/// cannot replay the previous answer.
#[derive(Debug, Clone, Default)]
pub struct ProcessOracle {
    config: ProcessOracleConfig,
}

impl ProcessOracle {
    pub fn new(config: ProcessOracleConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ProcessOracleConfig {
        &self.config
    }

    fn board_path(&self) -> PathBuf {
        self.config.exchange_dir.join(&self.config.board_file)
    }

    fn move_path(&self) -> PathBuf {
        self.config.exchange_dir.join(&self.config.move_file)
    }

    fn spawn(&self, difficulty: &Difficulty) -> Result<Child, OracleError> {
        Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(&self.config.board_file)
            .arg(&self.config.move_file)
            .arg(difficulty.label())
            .current_dir(&self.config.exchange_dir)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                program: self.config.program.clone(),
                source,
            })
    }

    /// Wait for the engine, killing it once the timeout has passed.
    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus, OracleError> {
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if start.elapsed() >= self.config.timeout {
                log::warn!(
                    "engine '{}' exceeded {:?}, killing it",
                    self.config.program,
                    self.config.timeout
                );
                if let Err(e) = child.kill() {
                    log::warn!("failed to kill engine: {e}");
                }
                child.wait()?;
                return Err(OracleError::Timeout(self.config.timeout));
            }
            thread::sleep(self.config.poll_interval);
        }
    }
}

/// Read the engine's answer from the move file.
///
/// A missing or blank file means no move; the first whitespace-delimited
/// token must be exactly one move.
fn read_move(path: &Path) -> Result<Move, OracleError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(OracleError::NoMove),
        Err(e) => return Err(e.into()),
    };
    let token = text.split_whitespace().next().ok_or(OracleError::NoMove)?;
    Ok(token.parse()?)
}

fn remove_stale(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl MoveOracle for ProcessOracle {
    fn propose(&mut self, board: &Board, difficulty: &Difficulty) -> Result<Move, OracleError> {
        let move_path = self.move_path();
        remove_stale(&move_path)?;
        fs::write(self.board_path(), board.export())?;

        log::debug!(
            "running engine '{}' {:?} at {difficulty}",
            self.config.program,
            self.config.args
        );
        let mut child = self.spawn(difficulty)?;
        let status = self.wait_with_timeout(&mut child)?;
        if !status.success() {
            log::warn!("engine '{}' exited with {status}", self.config.program);
        }

        read_move(&move_path)
    }
}
