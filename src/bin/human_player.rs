use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tile_connect::engine::{ClickOutcome, Game};
use tile_connect::level::{self, LevelConfig};
use tile_connect::reflow::ReflowMode;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play tile connect in the terminal", long_about = None)]
struct Args {
    /// Directory holding level{N}.json files
    #[clap(long)]
    level_dir: Option<PathBuf>,

    /// Level to start on
    #[clap(short, long, default_value_t = 1)]
    level: u32,

    /// Board rows, when no level directory is given
    #[clap(long, default_value_t = level::DEFAULT_ROWS)]
    rows: usize,

    /// Board columns, when no level directory is given
    #[clap(long, default_value_t = level::DEFAULT_COLS)]
    cols: usize,

    /// Reflow mode, when no level directory is given
    #[clap(short, long, default_value_t = ReflowMode::Normal)]
    mode: ReflowMode,

    /// Seed for reproducible boards
    #[clap(long)]
    seed: Option<u64>,

    /// Print debug logs
    #[clap(short, long)]
    verbose: bool,
}

impl Args {
    fn level_config(&self, level: u32) -> Result<LevelConfig> {
        match &self.level_dir {
            Some(dir) => level::load_level(dir, level)
                .with_context(|| format!("cannot load level {} from {}", level, dir.display())),
            None => Ok(LevelConfig::new(self.rows, self.cols, self.mode)?),
        }
    }
}

fn print_status(game: &Game) {
    let highlight: Vec<(usize, usize)> = game
        .selected()
        .map(|t| (t.row, t.col))
        .into_iter()
        .collect();
    println!("---------------------");
    println!(
        "Level {} ({}), matches: {}, tiles left: {}",
        game.level(),
        game.mode(),
        game.matches(),
        game.board().visible_count()
    );
    println!("{}", game.board().to_string_with_highlight(&highlight));
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let config = args.level_config(args.level)?;
    let mut game = match args.seed {
        Some(seed) => Game::new_with_seed(args.level, config, seed)?,
        None => Game::new(args.level, config)?,
    };
    println!("Welcome to Tile Connect!");

    loop {
        print_status(&game);

        if game.is_cleared() {
            println!("Level {} cleared in {} matches!", game.level(), game.matches());
            let next = game.level() + 1;
            match args.level_config(next) {
                Ok(config) if args.level_dir.is_some() => {
                    game.change_level(next, config)?;
                    continue;
                }
                _ => {
                    println!("Thanks for playing!");
                    break;
                }
            }
        }
        if game.is_stuck() {
            println!("No pair can be connected. Enter 'n' for a new board or 'q' to quit.");
        }

        print!("Enter a tile (row col), 'h' for a hint, 'n' for a new board, 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "n" => {
                game.reset_game()?;
                continue;
            }
            "h" => {
                match game.hint() {
                    Some(hint) => println!(
                        "Try ({}, {}) and ({}, {})",
                        hint.first.row, hint.first.col, hint.second.row, hint.second.col
                    ),
                    None => println!("No moves left."),
                }
                continue;
            }
            _ => {}
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let (r, c) = match parts.as_slice() {
            [r, c] => match (r.parse::<usize>(), c.parse::<usize>()) {
                (Ok(r), Ok(c)) => (r, c),
                _ => {
                    println!(
                        "Invalid input: Please enter numbers for row and column (e.g., '3 4')."
                    );
                    continue;
                }
            },
            _ => {
                println!("Invalid input format. Use 'row col', 'h', 'n' or 'q'.");
                continue;
            }
        };

        match game.handle_tile_click(r, c) {
            ClickOutcome::Ignored => println!("No tile at ({}, {}).", r, c),
            ClickOutcome::Selected(tile) => println!("Selected {} at ({}, {}).", tile.value, r, c),
            ClickOutcome::Deselected(_) => println!("Selection cleared."),
            ClickOutcome::Mismatch => println!("Those tiles do not match."),
            ClickOutcome::NoPath => println!("Those tiles cannot be connected."),
            ClickOutcome::Matched(result) => {
                let cells = [
                    (result.first.row, result.first.col),
                    (result.second.row, result.second.col),
                ];
                println!("{}", game.board().to_string_with_highlight(&cells));
                let corners: Vec<String> = result
                    .path
                    .corners()
                    .iter()
                    .map(|p| {
                        let (row, col) = p.to_board();
                        format!("({}, {})", row, col)
                    })
                    .collect();
                println!("Connected with {} turns: {}", result.path.turns, corners.join(" -> "));
                game.complete_match();
            }
        }
    }
    Ok(())
}
