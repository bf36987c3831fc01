//! TwaalfLetterWoord: twelve letter tiles in shuffled order, some of them
//! hidden until the player pays to reveal them.

use crate::config::GameConfig;
use crate::puzzle::{GameKind, Puzzle, letters_of};
use crate::{Error, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;

pub const N_LETTERS: usize = 12;

/// One letter slot of the puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub letter: char,
    /// Position in the scrambled riddle row
    pub riddle_index: usize,
    /// Position in the answer
    pub final_word_index: usize,
    /// Not shown in the riddle row
    pub hidden: bool,
    /// Bought by the player and shown at its home position
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterPuzzle {
    word: String,
    known_letters: usize,
    tiles: Vec<Tile>,
}

impl LetterPuzzle {
    pub fn new<R: Rng + ?Sized>(word: &str, known_letters: usize, rng: &mut R) -> Result<Self> {
        let tiles = mask(word, known_letters, rng)?;
        Ok(LetterPuzzle {
            word: word.to_string(),
            known_letters,
            tiles,
        })
    }

    pub fn known_letters(&self) -> usize {
        self.known_letters
    }

    /// Tiles in answer order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn hidden_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.hidden).count()
    }

    /// Reveal the hidden tile whose home is `final_word_index`
    pub fn reveal(&mut self, final_word_index: usize) -> Result<&Tile> {
        let tile = self.tiles.get_mut(final_word_index).ok_or_else(|| {
            Error::Puzzle(format!(
                "letter {} outside 1..={}",
                final_word_index + 1,
                N_LETTERS
            ))
        })?;
        if tile.checked {
            return Err(Error::Puzzle(format!(
                "letter {} is already revealed",
                final_word_index + 1
            )));
        }
        if !tile.hidden {
            return Err(Error::Puzzle(format!(
                "letter {} is already visible",
                final_word_index + 1
            )));
        }

        tile.hidden = false;
        tile.checked = true;
        Ok(tile)
    }

    /// Visible letters in riddle order; hidden and revealed tiles are blank
    pub fn riddle_row(&self) -> Vec<Option<char>> {
        let mut row = vec![None; self.tiles.len()];
        for tile in &self.tiles {
            if !tile.hidden && !tile.checked {
                row[tile.riddle_index] = Some(tile.letter);
            }
        }
        row
    }

    /// Revealed letters at their home positions
    pub fn answer_row(&self) -> Vec<Option<char>> {
        self.tiles
            .iter()
            .map(|tile| tile.checked.then_some(tile.letter))
            .collect()
    }
}

impl Puzzle for LetterPuzzle {
    const KIND: GameKind = GameKind::TwaalfLetterWoord;

    fn generate<R: Rng + ?Sized>(word: &str, config: &GameConfig, rng: &mut R) -> Result<Self> {
        tracing::debug!(known_letters = config.known_letters, "new twaalf-letter-woord");
        LetterPuzzle::new(word, config.known_letters, rng)
    }

    fn word(&self) -> &str {
        &self.word
    }
}

impl fmt::Display for LetterPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |cell: &Option<char>, blank: &str| {
            cell.map_or(blank.to_string(), |c| c.to_uppercase().to_string())
        };
        let riddle: Vec<String> = self.riddle_row().iter().map(|c| show(c, "_")).collect();
        let answer: Vec<String> = self.answer_row().iter().map(|c| show(c, ".")).collect();
        let numbers: Vec<String> = (1..=self.tiles.len()).map(|i| (i % 10).to_string()).collect();
        writeln!(f, " {}", riddle.join(" "))?;
        writeln!(f)?;
        writeln!(f, " {}", answer.join(" "))?;
        writeln!(f, " {}", numbers.join(" "))
    }
}

/// Shuffle the display ranks of `word` and hide all but `known` letters.
///
/// Both the rank order and the hidden mask are independent Fisher-Yates
/// shuffles.
pub fn mask<R: Rng + ?Sized>(word: &str, known: usize, rng: &mut R) -> Result<Vec<Tile>> {
    let letters = letters_of(word, N_LETTERS)?;
    if known > N_LETTERS {
        return Err(Error::Puzzle(format!(
            "known letters {} outside 0..={}",
            known, N_LETTERS
        )));
    }

    let mut ranks: Vec<usize> = (0..N_LETTERS).collect();
    ranks.shuffle(rng);

    let mut hidden: Vec<bool> = (0..N_LETTERS).map(|i| i < N_LETTERS - known).collect();
    hidden.shuffle(rng);

    Ok(letters
        .into_iter()
        .enumerate()
        .map(|(i, letter)| Tile {
            letter,
            riddle_index: ranks[i],
            final_word_index: i,
            hidden: hidden[i],
            checked: false,
        })
        .collect())
}
