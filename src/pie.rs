//! Taartpunt: a nine-letter word spread over the slices of a pie, with one
//! interior letter blanked out.

use crate::config::GameConfig;
use crate::puzzle::{Direction, GameKind, Puzzle, letters_of};
use crate::{Error, Result};
use rand::Rng;
use serde::Serialize;
use std::fmt;

pub const N_LETTERS: usize = 9;

/// Shown in the slice of the omitted letter
pub const PLACEHOLDER: char = '?';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PiePuzzle {
    word: String,
    direction: Direction,
    start_position: usize,
    omitted_index: usize,
    slices: Vec<char>,
}

impl PiePuzzle {
    pub fn new(
        word: &str,
        start_position: usize,
        direction: Direction,
        omitted_index: usize,
    ) -> Result<Self> {
        let slices = rotate(word, start_position, direction, omitted_index)?;
        Ok(PiePuzzle {
            word: word.to_string(),
            direction,
            start_position,
            omitted_index,
            slices,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn start_position(&self) -> usize {
        self.start_position
    }

    pub fn omitted_index(&self) -> usize {
        self.omitted_index
    }

    /// Letters in display order, one per slice
    pub fn slices(&self) -> &[char] {
        &self.slices
    }

    /// The letter hidden behind the placeholder
    pub fn omitted_letter(&self) -> Option<char> {
        self.word.chars().nth(self.omitted_index)
    }
}

impl Puzzle for PiePuzzle {
    const KIND: GameKind = GameKind::Taartpunt;

    fn generate<R: Rng + ?Sized>(word: &str, _config: &GameConfig, rng: &mut R) -> Result<Self> {
        let direction = Direction::random(rng);
        let start_position = rng.random_range(0..N_LETTERS - 1);
        // never the first or last letter
        let omitted_index = 1 + rng.random_range(0..N_LETTERS - 2);
        tracing::debug!(%direction, start_position, omitted_index, "new taartpunt");
        PiePuzzle::new(word, start_position, direction, omitted_index)
    }

    fn word(&self) -> &str {
        &self.word
    }
}

impl fmt::Display for PiePuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: Vec<String> = self
            .slices
            .iter()
            .map(|c| c.to_uppercase().to_string())
            .collect();
        writeln!(f, " ( {} )", letters.join(" "))
    }
}

/// Blank the omitted letter, rotate by `start_position`, then reverse for
/// counter-clockwise puzzles.
pub fn rotate(
    word: &str,
    start_position: usize,
    direction: Direction,
    omitted_index: usize,
) -> Result<Vec<char>> {
    let mut letters = letters_of(word, N_LETTERS)?;
    let len = letters.len();
    if start_position >= len {
        return Err(Error::Puzzle(format!(
            "start position {} outside 0..{}",
            start_position, len
        )));
    }
    if omitted_index == 0 || omitted_index > len - 2 {
        return Err(Error::Puzzle(format!(
            "omitted index {} must be an interior letter",
            omitted_index
        )));
    }

    letters[omitted_index] = PLACEHOLDER;
    let mut slices: Vec<char> = (0..len).map(|i| letters[(i + start_position) % len]).collect();
    if direction == Direction::CounterClockwise {
        slices.reverse();
    }
    Ok(slices)
}

/// Undo [`rotate`]: reverse first if needed, then rotate back
pub fn unrotate(slices: &[char], start_position: usize, direction: Direction) -> Vec<char> {
    let mut chars = slices.to_vec();
    if direction == Direction::CounterClockwise {
        chars.reverse();
    }
    let len = chars.len();
    if len == 0 {
        return chars;
    }
    let shift = len - start_position % len;
    (0..len).map(|i| chars[(i + shift) % len]).collect()
}
