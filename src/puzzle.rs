use crate::config::GameConfig;
use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reading direction around a ring or pie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Index step when walking in this direction
    pub fn step(self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => write!(f, "met de klok mee"),
            Direction::CounterClockwise => write!(f, "tegen de klok in"),
        }
    }
}

/// The three games of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Paardensprong,
    Taartpunt,
    TwaalfLetterWoord,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [
        GameKind::TwaalfLetterWoord,
        GameKind::Paardensprong,
        GameKind::Taartpunt,
    ];

    /// Fixed number of letters every word of this game has
    pub fn word_length(self) -> usize {
        match self {
            GameKind::Paardensprong => 8,
            GameKind::Taartpunt => 9,
            GameKind::TwaalfLetterWoord => 12,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            GameKind::Paardensprong => "paardensprong",
            GameKind::Taartpunt => "taartpunt",
            GameKind::TwaalfLetterWoord => "twaalf-letter-woord",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Paardensprong => "Paardensprong",
            GameKind::Taartpunt => "Taartpunt",
            GameKind::TwaalfLetterWoord => "12-letterwoord",
        }
    }

    pub fn default_word_list(self) -> &'static str {
        match self {
            GameKind::Paardensprong => "achtletterwoorden.csv",
            GameKind::Taartpunt => "negenletterwoorden.csv",
            GameKind::TwaalfLetterWoord => "twaalfletterwoorden.csv",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted || kind.slug().replace('-', "") == wanted)
            .ok_or_else(|| format!("unknown game '{}'", s))
    }
}

/// A freshly generated puzzle for one round of a game.
///
/// Puzzles are value objects: a new round replaces the old puzzle instead of
/// mutating it.
pub trait Puzzle: Sized + fmt::Display + Serialize {
    const KIND: GameKind;

    /// Build a puzzle for `word`, drawing all random parameters from `rng`
    fn generate<R: Rng + ?Sized>(word: &str, config: &GameConfig, rng: &mut R) -> Result<Self>;

    /// The word the player has to find
    fn word(&self) -> &str;
}

/// Split `word` into letters, rejecting it unless it has exactly `expected`
pub(crate) fn letters_of(word: &str, expected: usize) -> Result<Vec<char>> {
    let letters: Vec<char> = word.chars().collect();
    if letters.len() != expected {
        return Err(Error::WordLength {
            word: word.to_string(),
            expected,
            actual: letters.len(),
        });
    }
    Ok(letters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_from_slug() {
        assert_eq!("taartpunt".parse::<GameKind>(), Ok(GameKind::Taartpunt));
        assert_eq!(
            "Twaalf-Letter-Woord".parse::<GameKind>(),
            Ok(GameKind::TwaalfLetterWoord)
        );
        assert_eq!(
            "twaalfletterwoord".parse::<GameKind>(),
            Ok(GameKind::TwaalfLetterWoord)
        );
        assert!("galgje".parse::<GameKind>().is_err());
    }

    #[test]
    fn test_word_lengths() {
        assert_eq!(GameKind::Paardensprong.word_length(), 8);
        assert_eq!(GameKind::Taartpunt.word_length(), 9);
        assert_eq!(GameKind::TwaalfLetterWoord.word_length(), 12);
    }

    #[test]
    fn test_letters_of_rejects_wrong_length() {
        assert_eq!(letters_of("kat", 3).unwrap(), vec!['k', 'a', 't']);
        match letters_of("kat", 4) {
            Err(Error::WordLength {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
