pub mod answer;
pub mod config;
pub mod game;
pub mod masker;
pub mod pie;
pub mod puzzle;
pub mod ring;
pub mod timer;
pub mod word_bank;

pub use answer::Verdict;
pub use config::{Config, GameConfig};
pub use game::Session;
pub use masker::{LetterPuzzle, Tile};
pub use pie::PiePuzzle;
pub use puzzle::{Direction, GameKind, Puzzle};
pub use ring::RingPuzzle;
pub use timer::{Timer, TimerDriver};
pub use word_bank::WordBank;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] anyhow::Error),
    #[error("invalid word {word:?}: expected {expected} letters, found {actual}")]
    WordLength {
        word: String,
        expected: usize,
        actual: usize,
    },
    #[error("puzzle error: {0}")]
    Puzzle(String),
    #[error("game error: {0}")]
    Game(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
