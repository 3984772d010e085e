//! Play generalized Connect-Four against the MCTS engine in a terminal.
//!
//! Run with: `cargo run --release --bin play -- --cols 8 --think-ms 500`

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use connect_mcts::{Game, GameConfig, MCTSConfig, MCTSSearch, Player, UNEXPLORED_WEIGHT};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Connect-Four against an MCTS opponent", long_about = None)]
struct Args {
    /// Number of columns
    #[arg(long, default_value_t = 7)]
    cols: usize,

    /// Number of rows
    #[arg(long, default_value_t = 6)]
    rows: usize,

    /// Tokens in a row needed to win
    #[arg(long, default_value_t = 4)]
    win_length: usize,

    /// Computer think time per move (milliseconds)
    #[arg(long, default_value_t = 1000)]
    think_ms: u64,

    /// Seed for the search RNG
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Let the computer make the first move
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    computer_first: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut game = Game::new(GameConfig::new(args.cols, args.rows, args.win_length))?;
    let mut search = MCTSSearch::new(MCTSConfig::default().with_seed(args.seed));
    let human = if args.computer_first { Player::Two } else { Player::One };
    let think = Duration::from_millis(args.think_ms);
    info!(?args, "starting game");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.over() {
        println!("{game}");
        if game.current_player() == human {
            if !human_move(&mut game, &mut lines)? {
                println!("bye");
                return Ok(());
            }
        } else {
            computer_move(&mut game, &mut search, think)?;
        }
    }

    println!("{game}");
    match game.winner() {
        Some(winner) if winner == human => println!("You win!"),
        Some(_) => println!("The computer wins."),
        None => println!("Draw."),
    }
    Ok(())
}

/// Prompt until the human makes a legal drop. Returns false on end of input.
fn human_move(game: &mut Game, lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<bool> {
    loop {
        let options = game
            .valid_moves()
            .iter()
            .map(|col| (col + 1).to_string())
            .collect::<Vec<_>>()
            .join(",");
        print!("What's your move? [{options}]: ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(false);
        };

        let column = match line.trim().parse::<usize>() {
            Ok(col) if col >= 1 => col - 1,
            _ => {
                println!("please enter a column number");
                continue;
            }
        };

        match game.drop(column) {
            Ok(_) => return Ok(true),
            Err(err) => println!("{err}"),
        }
    }
}

/// Think, report the move weights and play the best one.
fn computer_move(game: &mut Game, search: &mut MCTSSearch<Game>, think: Duration) -> Result<()> {
    print!("thinking...");
    io::stdout().flush()?;

    let weights = search.think(game, think)?;
    let stats = search.stats();
    let tree = search.tree().stats();
    info!(
        iterations = stats.iterations,
        per_second = stats.iterations_per_second() as u64,
        nodes = tree.node_count,
        max_depth = tree.max_depth,
        expansion = tree.expansion_ratio(),
        win_rate = stats.win_rate(),
        "search finished"
    );
    println!(
        " ran {} simulations; ({},{},{})",
        stats.simulations, stats.wins, stats.losses, stats.draws
    );
    println!(
        "{}",
        weights
            .iter()
            .map(|&(col, weight)| {
                if weight == UNEXPLORED_WEIGHT {
                    format!("{}: -", col + 1)
                } else {
                    format!("{}: {weight:.3}", col + 1)
                }
            })
            .collect::<Vec<_>>()
            .join("\t")
    );

    let best = weights
        .iter()
        .fold(None, |best: Option<(usize, f64)>, &(col, weight)| match best {
            Some((_, best_weight)) if best_weight >= weight => best,
            _ => Some((col, weight)),
        });

    if let Some((column, _)) = best {
        let row = game.drop(column)?;
        println!("computer plays {}", column + 1);
        info!(column, row, "computer move");
    }
    Ok(())
}
