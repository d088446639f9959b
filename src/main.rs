use std::process;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use castellan::board::Board;
use castellan::console::Console;
use castellan::{perft, Player, SearchOptions, START_FEN};

#[derive(Parser)]
#[command(name = "castellan", version, author, about = "A toy-project chess engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count the leaves of the move tree, one line per depth
    Perft {
        depth: u8,
        #[arg(long, default_value = START_FEN)]
        fen: String,
    },
    /// Play a game in the terminal
    Play {
        #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
        white: PlayerKind,
        #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
        black: PlayerKind,
        /// Seconds the engine may think per move, decimals allowed
        #[arg(long, default_value_t = 2.0)]
        timespan: f64,
        #[arg(long, default_value = START_FEN)]
        fen: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Human,
    Random,
    Engine,
}

impl PlayerKind {
    fn into_player(self, move_time: Duration) -> Player {
        match self {
            PlayerKind::Human => Player::Human,
            PlayerKind::Random => Player::random(),
            PlayerKind::Engine => {
                let mut options = SearchOptions::default();
                options.set_time(Some(move_time));
                Player::engine(options)
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("castellan v{}, by {}", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));

    match Cli::parse().command {
        Command::Perft { depth, fen } => run_perft(load(&fen), depth),
        Command::Play {
            white,
            black,
            timespan,
            fen,
        } => {
            let move_time = Duration::try_from_secs_f64(timespan).unwrap_or_else(|err| {
                eprintln!("invalid timespan {}: {}", timespan, err);
                process::exit(1)
            });
            let board = load(&fen);
            Console::new(board, white.into_player(move_time), black.into_player(move_time)).run()
        }
    }
}

// A position that cannot be loaded leaves nothing to play with
fn load(fen: &str) -> Board {
    Board::from_fen(fen).unwrap_or_else(|err| {
        eprintln!("could not load FEN \"{}\": {}", fen, err);
        process::exit(1)
    })
}

fn run_perft(mut board: Board, depth: u8) {
    println!("{}", board);
    println!("depth nodes\n--------");
    for d in 0..=depth {
        let start = Instant::now();
        let nodes = perft(&mut board, d);
        let elapsed = start.elapsed();
        println!(
            "{}     {} ({}s, {} nps)",
            d,
            nodes,
            elapsed.as_secs_f32(),
            (nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64
        );
    }
}
