use crate::puzzle::GameKind;
use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub log: LogConfig,
    pub words: WordsConfig,
    pub paardensprong: GameConfig,
    pub taartpunt: GameConfig,
    pub twaalf_letter_woord: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordsConfig {
    /// Directory holding the word lists
    pub dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    pub word_list: String,
    /// Countdown length; absent or 0 means the timer counts up
    pub timeout_seconds: Option<u32>,
    /// Tiles visible at the start of a twaalf-letter-woord round
    pub known_letters: usize,
    pub starting_score: u32,
    /// Price of revealing one hidden letter
    pub reveal_cost: u32,
}

impl GameConfig {
    /// Built-in settings for `kind`
    pub fn for_game(kind: GameKind) -> Self {
        let (timeout_seconds, known_letters, starting_score, reveal_cost) = match kind {
            GameKind::Paardensprong => (Some(30), 0, 0, 0),
            GameKind::Taartpunt => (None, 0, 0, 0),
            GameKind::TwaalfLetterWoord => (None, 6, 60, 10),
        };
        GameConfig {
            word_list: kind.default_word_list().to_string(),
            timeout_seconds,
            known_letters,
            starting_score,
            reveal_cost,
        }
    }

    pub fn timeout(&self) -> Option<u32> {
        self.timeout_seconds.filter(|&seconds| seconds > 0)
    }
}

fn section(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Paardensprong => "paardensprong",
        GameKind::Taartpunt => "taartpunt",
        GameKind::TwaalfLetterWoord => "twaalf_letter_woord",
    }
}

impl Config {
    /// Defaults, then `config.toml` (or `path`), then `TVT_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("log.level", "info")?
            .set_default("words.dir", "words")?;

        for kind in GameKind::ALL {
            let defaults = GameConfig::for_game(kind);
            let key = |field: &str| format!("{}.{}", section(kind), field);
            builder = builder
                .set_default(key("word_list"), defaults.word_list)?
                .set_default(key("known_letters"), defaults.known_letters as i64)?
                .set_default(key("starting_score"), defaults.starting_score as i64)?
                .set_default(key("reveal_cost"), defaults.reveal_cost as i64)?;
            if let Some(seconds) = defaults.timeout_seconds {
                builder = builder.set_default(key("timeout_seconds"), seconds as i64)?;
            }
        }

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = builder
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("TVT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config = config.try_deserialize::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no puzzle could be generated from
    fn validate(&self) -> Result<()> {
        for kind in GameKind::ALL {
            let known = self.game(kind).known_letters;
            if known > kind.word_length() {
                anyhow::bail!(
                    "{}.known_letters = {} exceeds the {} letters of a word",
                    section(kind),
                    known,
                    kind.word_length()
                );
            }
        }
        Ok(())
    }

    /// Initialise the global configuration
    pub fn init(path: Option<&Path>) -> Result<()> {
        let config = Self::load(path)?;
        CONFIG
            .set(config)
            .map_err(|_| anyhow::anyhow!("configuration already initialised"))?;
        Ok(())
    }

    /// The global configuration
    pub fn get() -> crate::Result<&'static Config> {
        CONFIG.get().ok_or_else(|| {
            crate::Error::Config("configuration not initialised, call Config::init() first".into())
        })
    }

    pub fn game(&self, kind: GameKind) -> &GameConfig {
        match kind {
            GameKind::Paardensprong => &self.paardensprong,
            GameKind::Taartpunt => &self.taartpunt,
            GameKind::TwaalfLetterWoord => &self.twaalf_letter_woord,
        }
    }

    pub fn word_list_path(&self, kind: GameKind) -> PathBuf {
        Path::new(&self.words.dir).join(&self.game(kind).word_list)
    }

    pub fn log_filter(&self) -> String {
        format!("tvt_puzzels={}", self.log.level)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log: LogConfig {
                level: "info".to_string(),
            },
            words: WordsConfig {
                dir: "words".to_string(),
            },
            paardensprong: GameConfig::for_game(GameKind::Paardensprong),
            taartpunt: GameConfig::for_game(GameKind::Taartpunt),
            twaalf_letter_woord: GameConfig::for_game(GameKind::TwaalfLetterWoord),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_timeout_zero_means_count_up() {
        let mut config = GameConfig::for_game(GameKind::Paardensprong);
        assert_eq!(config.timeout(), Some(30));
        config.timeout_seconds = Some(0);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[log]\nlevel = \"debug\"\n\n[taartpunt]\ntimeout_seconds = 45\n\n\
             [twaalf_letter_woord]\nreveal_cost = 5"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.log_filter(), "tvt_puzzels=debug");
        assert_eq!(config.taartpunt.timeout(), Some(45));
        assert_eq!(config.taartpunt.word_list, "negenletterwoorden.csv");
        assert_eq!(config.twaalf_letter_woord.reveal_cost, 5);
        assert_eq!(config.twaalf_letter_woord.known_letters, 6);
        assert_eq!(config.paardensprong, GameConfig::for_game(GameKind::Paardensprong));
    }

    #[test]
    fn test_rejects_too_many_known_letters() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[twaalf_letter_woord]\nknown_letters = 13").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("known_letters = 13"), "{}", err);
    }

    #[test]
    fn test_word_list_path() {
        let config = Config::default();
        assert_eq!(
            config.word_list_path(GameKind::Paardensprong),
            Path::new("words").join("achtletterwoorden.csv")
        );
    }
}
