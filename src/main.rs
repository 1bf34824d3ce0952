// Demo entry point: runs one move selection on the opening position
//
// Usage:
//   cargo run -- [options]
//
// Options:
//   --config <path>       Path to Othello.toml (default: Othello.toml)
//   --color <black|white> Side to move (default: black)
//   --size <n>            Board dimension (default: 8)
//   --budget-ms <ms>      Time budget per move (default: timing.default_time_budget_ms)

use log::{error, info};
use std::env;
use std::process;
use std::time::{Duration, Instant};

use othello_mcts::config::Config;
use othello_mcts::debug_logger::DebugLogger;
use othello_mcts::{Board, Bot, Color};

fn print_usage() {
    eprintln!("Othello MCTS move selector");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  othello-mcts [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --config <path>         Path to Othello.toml (default: Othello.toml)");
    eprintln!("  --color <black|white>   Side to move on the opening position (default: black)");
    eprintln!("  --size <n>              Board dimension (default: 8)");
    eprintln!("  --budget-ms <ms>        Time budget per move");
    eprintln!("  --help                  Show this help message");
}

struct Options {
    config_path: Option<String>,
    color: Color,
    size: usize,
    budget_ms: Option<u64>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config_path: None,
        color: Color::Black,
        size: 8,
        budget_ms: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("{} requires a value", flag));

        match flag {
            "--config" => options.config_path = Some(value?.clone()),
            "--color" => {
                let value = value?;
                options.color =
                    Color::parse(value).ok_or_else(|| format!("Invalid color: {}", value))?;
            }
            "--size" => {
                let value = value?;
                options.size = value
                    .parse()
                    .map_err(|e| format!("Invalid size '{}': {}", value, e))?;
            }
            "--budget-ms" => {
                let value = value?;
                options.budget_ms = Some(
                    value
                        .parse()
                        .map_err(|e| format!("Invalid budget '{}': {}", value, e))?,
                );
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 2;
    }

    Ok(options)
}

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    let config = match &options.config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    let board = match Board::initial(options.size) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let budget = Duration::from_millis(
        options
            .budget_ms
            .unwrap_or(config.timing.default_time_budget_ms),
    );
    let debug_logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let bot = Bot::new(config, options.size, options.color, budget).with_debug_logger(debug_logger);

    info!(
        "Selecting a move for {} on a {}x{} board",
        options.color.as_str(),
        options.size,
        options.size
    );

    let start = Instant::now();
    match bot.go(&board.to_rows()).await {
        Ok(report) => {
            let moves: Vec<String> = report
                .moves()
                .iter()
                .map(|c| format!("({}, {})", c.row, c.col))
                .collect();
            println!("[{}]", moves.join(", "));
            println!("{:.3}s", start.elapsed().as_secs_f64());
        }
        Err(e) => {
            error!("Move selection failed: {}", e);
            process::exit(1);
        }
    }

    // Let the fire-and-forget debug log task reach the disk
    tokio::time::sleep(Duration::from_millis(50)).await;
}
