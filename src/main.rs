use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tvt_puzzels::*;

#[derive(Parser)]
#[clap(name = "tvt-puzzels", version, about = "2 voor 12 oefeningen in de terminal")]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[clap(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play rounds of a game
    Play {
        /// paardensprong, taartpunt or twaalf-letter-woord
        game: GameKind,
        /// Seed for reproducible puzzles
        #[clap(long)]
        seed: Option<u64>,
        /// Word list to use instead of the configured one
        #[clap(long)]
        words: Option<PathBuf>,
    },
    /// Generate and print a single puzzle
    Show {
        game: GameKind,
        #[clap(long)]
        seed: Option<u64>,
        #[clap(long)]
        words: Option<PathBuf>,
        /// Print the puzzle, including the answer, as JSON
        #[clap(long)]
        json: bool,
    },
    /// List the available games
    List,
}

/// Game-specific commands on top of answering
trait Playable: Puzzle {
    fn handle_command(_session: &mut Session<Self>, _input: &str) -> Option<Result<String>> {
        None
    }

    fn status(_session: &Session<Self>) -> Option<String> {
        None
    }
}

impl Playable for RingPuzzle {}

impl Playable for PiePuzzle {}

impl Playable for LetterPuzzle {
    fn handle_command(session: &mut Session<Self>, input: &str) -> Option<Result<String>> {
        let rest = input
            .strip_prefix("koop ")
            .or_else(|| input.strip_prefix("k "))?;
        let result = match rest.trim().parse::<usize>() {
            Ok(position) if position >= 1 => session
                .reveal(position - 1)
                .map(|letter| format!("Letter {} is '{}'", position, letter.to_uppercase())),
            _ => Err(Error::Game(format!("'{}' is geen letterpositie", rest.trim()))),
        };
        Some(result)
    }

    fn status(session: &Session<Self>) -> Option<String> {
        let wallet = session.wallet();
        Some(format!(
            "score {} | letter kopen kost {} (koop <positie>)",
            wallet.balance(),
            wallet.reveal_cost()
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_config(cli.config.as_deref())?;
    let config = Config::get()?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("configuration loaded: {:?}", config);

    match cli.command {
        Command::List => {
            list_games(config);
            Ok(())
        }
        Command::Show {
            game,
            seed,
            words,
            json,
        } => match game {
            GameKind::Paardensprong => show::<RingPuzzle>(config, seed, words, json).await,
            GameKind::Taartpunt => show::<PiePuzzle>(config, seed, words, json).await,
            GameKind::TwaalfLetterWoord => show::<LetterPuzzle>(config, seed, words, json).await,
        },
        Command::Play { game, seed, words } => match game {
            GameKind::Paardensprong => play::<RingPuzzle>(config, seed, words).await,
            GameKind::Taartpunt => play::<PiePuzzle>(config, seed, words).await,
            GameKind::TwaalfLetterWoord => play::<LetterPuzzle>(config, seed, words).await,
        },
    }
}

fn init_config(path: Option<&std::path::Path>) -> Result<()> {
    Config::init(path).map_err(|e| Error::Config(format!("{:#}", e)))
}

fn list_games(config: &Config) {
    println!("Beschikbare spellen:");
    for kind in GameKind::ALL {
        let game = config.game(kind);
        let timer = match game.timeout() {
            Some(seconds) => format!("{} seconden", seconds),
            None => "telt op".to_string(),
        };
        println!(
            "  {:<20} {} ({} letters, tijd: {})",
            kind.slug(),
            kind.title(),
            kind.word_length(),
            timer
        );
    }
}

fn open_session<P: Puzzle>(
    config: &Config,
    seed: Option<u64>,
    words: Option<PathBuf>,
) -> Result<Session<P>> {
    let path = words.unwrap_or_else(|| config.word_list_path(P::KIND));
    let bank = WordBank::for_game(P::KIND, &path)?;
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Session::new(bank, config.game(P::KIND).clone(), rng)
}

async fn show<P: Puzzle>(
    config: &Config,
    seed: Option<u64>,
    words: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut session = open_session::<P>(config, seed, words)?;
    if !session.new_puzzle().await? {
        println!("Geen woorden geladen.");
        return Ok(());
    }
    let Some(puzzle) = session.puzzle() else {
        return Ok(());
    };

    if json {
        let text = serde_json::to_string_pretty(puzzle)
            .map_err(|e| Error::Puzzle(format!("cannot serialize puzzle: {}", e)))?;
        println!("{}", text);
    } else {
        println!("{}", P::KIND);
        print!("{}", puzzle);
    }
    Ok(())
}

async fn print_round<P: Playable>(session: &Session<P>) {
    let Some(puzzle) = session.puzzle() else {
        return;
    };
    println!();
    println!("{} | tijd {}", P::KIND, session.timer_display().await);
    print!("{}", puzzle);
    if let Some(status) = P::status(session) {
        println!("{}", status);
    }
}

async fn play<P: Playable>(
    config: &Config,
    seed: Option<u64>,
    words: Option<PathBuf>,
) -> Result<()> {
    let mut session = open_session::<P>(config, seed, words)?;
    let timeout = session.timeout_notifier();

    println!("Typ je antwoord. Commando's: n (nieuw), t (tijd), p (pauze), v (verder), q (stop)");
    if !session.new_puzzle().await? {
        println!("Geen woorden geladen.");
        return Ok(());
    }
    print_round(&session).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = timeout.notified() => {
                // permit left over from a round that was replaced meanwhile
                if !session.has_timed_out() {
                    continue;
                }
                if let Some(puzzle) = session.puzzle() {
                    println!("De tijd is om! Het woord was: {}", puzzle.word().to_uppercase());
                }
                println!("Typ 'n' voor een nieuwe puzzel.");
            }
            line = lines.next_line() => {
                let Some(line) = line.map_err(anyhow::Error::from)? else {
                    break;
                };
                let input = line.trim();
                match input {
                    "" => {}
                    "q" | "stop" => break,
                    "n" | "nieuw" => {
                        session.new_puzzle().await?;
                        print_round(&session).await;
                    }
                    "t" | "tijd" => println!("Tijd: {}", session.timer_display().await),
                    "p" | "pauze" => {
                        session.pause().await;
                        println!("Gepauzeerd op {}", session.timer_display().await);
                    }
                    "v" | "verder" => {
                        session.resume().await;
                        print_round(&session).await;
                    }
                    _ => {
                        if let Some(result) = P::handle_command(&mut session, input) {
                            match result {
                                Ok(message) => {
                                    println!("{}", message);
                                    print_round(&session).await;
                                }
                                Err(e) => println!("{}", e),
                            }
                            continue;
                        }
                        if session.is_round_over() {
                            println!("Deze ronde is voorbij. Typ 'n' voor een nieuwe puzzel.");
                            continue;
                        }
                        match session.submit(Some(input)).await {
                            Verdict::Correct => {
                                println!("Goed! Tijd: {}", session.timer_display().await);
                                if let Some(status) = P::status(&session) {
                                    println!("{}", status);
                                }
                            }
                            Verdict::Incorrect => {
                                if let Some(puzzle) = session.puzzle() {
                                    let word = puzzle.word().to_uppercase();
                                    println!("Fout. Het woord was: {}", word);
                                }
                            }
                            Verdict::Unknown => {}
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_bad_config_is_a_config_error() {
        let result = init_config(Some(Path::new("does/not/exist.toml")));
        assert!(matches!(result, Err(Error::Config(_))), "{:?}", result);
    }
}
