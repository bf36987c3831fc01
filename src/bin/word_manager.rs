use clap::{App, Arg, SubCommand};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tvt_puzzels::{Config, GameKind, WordBank};

fn game_arg() -> Arg<'static> {
    Arg::with_name("game")
        .help("paardensprong, taartpunt of twaalf-letter-woord")
        .required(true)
        .index(1)
}

fn main() -> ExitCode {
    let matches = App::new("woordenlijstbeheer")
        .version("1.0")
        .about("Beheer de woordenlijsten van de 2 voor 12 oefeningen")
        .subcommand(
            SubCommand::with_name("list")
                .about("Toon alle woorden")
                .arg(game_arg()),
        )
        .subcommand(
            SubCommand::with_name("stats")
                .about("Toon statistieken van een woordenlijst")
                .arg(game_arg()),
        )
        .subcommand(
            SubCommand::with_name("validate")
                .about("Controleer een woordenlijst")
                .arg(game_arg()),
        )
        .subcommand(
            SubCommand::with_name("export")
                .about("Schrijf een gecontroleerde woordenlijst naar een bestand")
                .arg(game_arg())
                .arg(
                    Arg::with_name("file")
                        .help("Uitvoerbestand")
                        .required(true)
                        .index(2),
                ),
        )
        .get_matches();

    if let Err(e) = Config::init(None) {
        eprintln!("Configuratie laden mislukt: {}", e);
        return ExitCode::FAILURE;
    }
    let config = match Config::get() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some((command, args)) = matches.subcommand() else {
        eprintln!("Geen commando opgegeven, zie --help");
        return ExitCode::FAILURE;
    };

    let kind = match args.value_of("game").unwrap_or_default().parse::<GameKind>() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let path = config.word_list_path(kind);
    let bank = match WordBank::for_game(kind, &path) {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("Woordenlijst {} afgekeurd: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match command {
        "list" => {
            println!("{} ({} woorden):", kind, bank.len());
            for word in bank.words() {
                println!("  {}", word);
            }
        }
        "stats" => {
            let stats = bank.stats();
            println!("Woordenlijst: {}", path.display());
            println!("  Woordlengte: {}", stats.word_length);
            println!("  Woorden: {}", stats.total_words);
            println!("  Unieke woorden: {}", stats.unique_words);
            println!("  Letterfrequentie:");
            for (letter, count) in &stats.letter_counts {
                println!("    {}: {}", letter, count);
            }
        }
        "validate" => {
            let problems = bank.validate();
            if problems.is_empty() {
                println!("Woordenlijst is in orde ({} woorden)", bank.len());
            } else {
                println!("Problemen gevonden:");
                for problem in &problems {
                    println!("  - {}", problem);
                }
                return ExitCode::FAILURE;
            }
        }
        "export" => {
            let file = args.value_of("file").unwrap_or_default();
            if let Err(e) = bank.save_to_file(file) {
                eprintln!("Exporteren mislukt: {}", e);
                return ExitCode::FAILURE;
            }
            println!("{} woorden geëxporteerd naar {}", bank.len(), file);
        }
        other => {
            eprintln!("Onbekend commando: {}", other);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
