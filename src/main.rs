use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rummy_solver::game::Game;
use rummy_solver::report::SolveReport;
use rummy_solver::solver::{find_best_move, find_best_move_strict, Decomposition};
use rummy_solver::TileCollection;

#[derive(Parser, Debug)]
#[command(
    name = "rummy-solver",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_COMMIT"), ")"),
    about = "Tile-rummy hand solver"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a single hand given in dot notation, e.g. r1.r2.r3.y8
    Solve {
        /// The hand to decompose
        hand: String,
        /// Emit the result as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Reject set candidates that repeat a color
        #[arg(long)]
        strict: bool,
    },
    /// Run a self-playing demo game
    Play {
        /// Player names
        #[arg(long, value_delimiter = ',', default_value = "Michael,Thomas,Lucas,Jian")]
        players: Vec<String>,
        /// Stop after this many rounds even if nobody has won
        #[arg(long, default_value_t = 200)]
        max_rounds: usize,
        /// Seed for the tile bag; omit for a random game
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    match Cli::parse().command {
        Command::Solve { hand, json, strict } => solve(&hand, json, strict),
        Command::Play {
            players,
            max_rounds,
            seed,
        } => play(&players, max_rounds, seed),
    }
}

fn solve(hand: &str, json: bool, strict: bool) -> anyhow::Result<()> {
    let hand: TileCollection = hand.parse()?;
    let best = if strict {
        find_best_move_strict(&hand)
    } else {
        find_best_move(&hand)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&SolveReport::from(&best))?);
    } else {
        print_decomposition("By tile count", &best.by_count);
        print_decomposition("By point sum", &best.by_sum);
    }
    Ok(())
}

fn print_decomposition(label: &str, decomposition: &Decomposition) {
    println!("{label}:");
    if decomposition.melds.is_empty() {
        println!("  nothing playable");
    }
    for meld in &decomposition.melds {
        println!("  play {}", meld);
    }
    println!(
        "  leftover: {} ({} tiles, {} points)",
        if decomposition.residual.is_empty() {
            "none".to_string()
        } else {
            decomposition.residual.to_string()
        },
        decomposition.residual.len(),
        decomposition.residual.point_sum()
    );
}

fn play(players: &[String], max_rounds: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut game = Game::new(players, &mut rng);
    println!("{game}");

    for _ in 0..max_rounds {
        if game.is_over() {
            break;
        }
        game.play_round(&mut rng)?;
        println!("{game}");
    }

    match game.winner() {
        Some(winner) => println!("{} wins", winner.name()),
        None => println!("no winner after {max_rounds} rounds"),
    }
    Ok(())
}
