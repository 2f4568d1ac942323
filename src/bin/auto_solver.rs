use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tile_connect::engine::Board;
use tile_connect::reflow::ReflowMode;
use tile_connect::solver::solve_dfs;
use tile_connect::utils::board_from_str_array;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Search for a sequence of removals that clears a board", long_about = None)]
struct Args {
    /// Depth limit for the DFS solver
    #[clap(short, long)]
    depth: u32,

    /// Reflow mode applied after every removal
    #[clap(short, long, default_value_t = ReflowMode::Normal)]
    mode: ReflowMode,

    /// Print the solution as JSON
    #[clap(long)]
    json: bool,

    /// Print debug logs
    #[clap(short, long)]
    verbose: bool,

    /// Path to the board file: one row per line, cells separated by spaces,
    /// `.` for an empty cell
    board_file: PathBuf,
}

fn read_board_file(path: &Path) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    board_from_str_array(&lines).with_context(|| format!("invalid board in {}", path.display()))
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

    let board = read_board_file(&args.board_file)?;
    let solution = solve_dfs(&board, args.mode, args.depth);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }

    println!("Loaded board from {}\n", args.board_file.display());
    println!("Initial board state:\n{}", board);
    println!(
        "Searching with depth limit {} and mode {}...\n",
        args.depth, args.mode
    );

    println!("Moves ({}):", solution.pairs_removed);
    if solution.moves.is_empty() {
        println!("  No moves made.");
    } else {
        for (i, m) in solution.moves.iter().enumerate() {
            println!(
                "  Move {}: {} at ({}, {}) and ({}, {})",
                i + 1,
                m.value,
                m.first.0,
                m.first.1,
                m.second.0,
                m.second.1
            );
        }
    }
    if solution.cleared {
        println!("Board cleared.\n");
    } else {
        println!(
            "Board not cleared: {} tiles left.\n",
            solution.final_board.visible_count()
        );
    }
    println!("Final board state:\n{}", solution.final_board);
    Ok(())
}
