//! Paardensprong: an eight-letter word laid out on the outer cells of a 3x3
//! grid, read in knight's-move order.
//!
//! Cells are numbered row by row, skipping the centre:
//!
//! ```text
//! 0 1 2
//! 3 . 4
//! 5 6 7
//! ```

use crate::config::GameConfig;
use crate::puzzle::{Direction, GameKind, Puzzle, letters_of};
use crate::{Error, Result};
use rand::Rng;
use serde::Serialize;
use std::fmt;

pub const N_LETTERS: usize = 8;

/// Knight's-move traversal of the outer cells
pub const RING: [usize; N_LETTERS] = [0, 4, 5, 1, 7, 3, 2, 6];

/// Start cells are drawn from `0..START_CELLS`, so cell 7 never starts a ring
pub const START_CELLS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RingPuzzle {
    word: String,
    direction: Direction,
    start: usize,
    cells: [char; N_LETTERS],
}

impl RingPuzzle {
    pub fn new(word: &str, direction: Direction, start: usize) -> Result<Self> {
        let cells = scramble(word, direction, start)?;
        Ok(RingPuzzle {
            word: word.to_string(),
            direction,
            start,
            cells,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Letters per outer cell
    pub fn cells(&self) -> &[char; N_LETTERS] {
        &self.cells
    }

    /// The 3x3 board; the centre is never assigned a letter
    pub fn grid(&self) -> [[Option<char>; 3]; 3] {
        let c = &self.cells;
        [
            [Some(c[0]), Some(c[1]), Some(c[2])],
            [Some(c[3]), None, Some(c[4])],
            [Some(c[5]), Some(c[6]), Some(c[7])],
        ]
    }
}

impl Puzzle for RingPuzzle {
    const KIND: GameKind = GameKind::Paardensprong;

    fn generate<R: Rng + ?Sized>(word: &str, _config: &GameConfig, rng: &mut R) -> Result<Self> {
        let direction = Direction::random(rng);
        let start = rng.random_range(0..START_CELLS);
        tracing::debug!(%direction, start, "new paardensprong");
        RingPuzzle::new(word, direction, start)
    }

    fn word(&self) -> &str {
        &self.word
    }
}

impl fmt::Display for RingPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or("·".to_string(), |c| c.to_uppercase().to_string()))
                .collect();
            writeln!(f, " {}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Place the letters of `word` on the ring, starting at cell `start`
pub fn scramble(word: &str, direction: Direction, start: usize) -> Result<[char; N_LETTERS]> {
    let letters = letters_of(word, N_LETTERS)?;
    let mut index = ring_index(start)?;
    let mut cells = [' '; N_LETTERS];
    for letter in letters {
        cells[RING[index]] = letter;
        index = advance(index, direction);
    }
    Ok(cells)
}

/// Read the word back off the ring
pub fn unscramble(cells: &[char; N_LETTERS], direction: Direction, start: usize) -> Result<String> {
    let mut index = ring_index(start)?;
    let mut word = String::with_capacity(N_LETTERS);
    for _ in 0..N_LETTERS {
        word.push(cells[RING[index]]);
        index = advance(index, direction);
    }
    Ok(word)
}

fn ring_index(start: usize) -> Result<usize> {
    RING.iter()
        .position(|&cell| cell == start)
        .ok_or_else(|| Error::Puzzle(format!("start cell {} is not on the ring", start)))
}

fn advance(index: usize, direction: Direction) -> usize {
    (index as isize + direction.step()).rem_euclid(N_LETTERS as isize) as usize
}
