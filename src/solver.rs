//! Move search over a board.
//!
//! `available_matches` lists every pair the player could remove right now.
//! `solve_dfs` looks ahead through removals and reflows for a sequence that
//! clears the board, or else removes as many pairs as possible.
use crate::engine::{Board, MatchResult, Tile};
use crate::pathfinder;
use crate::reflow::{self, ReflowMode};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// One removal: the cells of the two tiles on the board as it was before the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PairMove {
    pub value: u32,
    pub first: (usize, usize),
    pub second: (usize, usize),
}

impl From<&MatchResult> for PairMove {
    fn from(m: &MatchResult) -> Self {
        PairMove {
            value: m.first.value,
            first: (m.first.row, m.first.col),
            second: (m.second.row, m.second.col),
        }
    }
}

/// Represents a solution found by the solver.
#[derive(Clone, Debug, Serialize)]
pub struct Solution {
    /// Removals in the order they are played.
    pub moves: Vec<PairMove>,
    pub pairs_removed: usize,
    /// `true` if the moves leave no visible tile.
    pub cleared: bool,
    /// Board after the last move and its reflow.
    pub final_board: Board,
}

impl Solution {
    fn at(board: Board, moves: Vec<PairMove>) -> Self {
        Solution {
            pairs_removed: moves.len(),
            cleared: board.is_cleared(),
            moves,
            final_board: board,
        }
    }
}

fn connectable_pairs(board: &Board) -> impl Iterator<Item = MatchResult> + '_ {
    let tiles: Vec<Tile> = board.visible_tiles().copied().collect();
    let n = tiles.len();
    (0..n)
        .flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
        .filter_map(move |(i, j)| {
            let (first, second) = (tiles[i], tiles[j]);
            if first.value != second.value {
                return None;
            }
            pathfinder::find_path(&first, &second, board).map(|path| MatchResult {
                first,
                second,
                path,
            })
        })
}

/// Every connectable pair on `board`, in row-major order of the first tile,
/// then of the second.
pub fn available_matches(board: &Board) -> Vec<MatchResult> {
    connectable_pairs(board).collect()
}

/// The first connectable pair in row-major order.
pub fn find_hint(board: &Board) -> Option<MatchResult> {
    connectable_pairs(board).next()
}

pub fn has_moves(board: &Board) -> bool {
    find_hint(board).is_some()
}

/// Board after `m` is removed and `mode` is applied.
pub fn apply_match(board: &Board, mode: ReflowMode, m: &MatchResult) -> Board {
    let mut next = board.clone();
    next.hide_tiles(&[m.first.id, m.second.id]);
    reflow::reflow(mode, &next)
}

/// Searches up to `depth_limit` removals ahead.
///
/// The first sequence found that clears the board is returned. Otherwise the
/// result is the sequence that removes the most pairs; ties keep the earliest
/// sequence in search order. A board already seen is not searched again.
/// Every board at a given depth holds the same number of tiles, so a repeat
/// can never be reached with more depth left than the first visit had.
///
/// # Examples
/// ```
/// use tile_connect::reflow::ReflowMode;
/// use tile_connect::solver::solve_dfs;
/// use tile_connect::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1 2 2 1"]).unwrap();
/// let solution = solve_dfs(&board, ReflowMode::Normal, 10);
/// assert!(solution.cleared);
/// assert_eq!(solution.pairs_removed, 2);
/// ```
pub fn solve_dfs(board: &Board, mode: ReflowMode, depth_limit: u32) -> Solution {
    let mut visited_states = HashSet::new();
    visited_states.insert(board.clone());
    let solution = find_best_solution_recursive(
        board.clone(),
        mode,
        depth_limit,
        &mut visited_states,
        Vec::new(),
    );
    debug!(
        "solve_dfs visited {} boards, best removes {} pairs",
        visited_states.len(),
        solution.pairs_removed
    );
    solution
}

fn find_best_solution_recursive(
    board: Board,
    mode: ReflowMode,
    depth_remaining: u32,
    visited_states: &mut HashSet<Board>,
    moves: Vec<PairMove>,
) -> Solution {
    if board.is_cleared() || depth_remaining == 0 {
        return Solution::at(board, moves);
    }

    let mut best_solution_found: Option<Solution> = None;

    for m in available_matches(&board) {
        let next = apply_match(&board, mode, &m);
        if !visited_states.insert(next.clone()) {
            continue;
        }

        let mut next_moves = moves.clone();
        next_moves.push(PairMove::from(&m));

        let candidate = find_best_solution_recursive(
            next,
            mode,
            depth_remaining - 1,
            visited_states,
            next_moves,
        );
        if candidate.cleared {
            return candidate;
        }
        let improves = best_solution_found
            .as_ref()
            .map_or(true, |best| candidate.pairs_removed > best.pairs_removed);
        if improves {
            best_solution_found = Some(candidate);
        }
    }

    // No move, or every move led to a board already searched.
    best_solution_found.unwrap_or_else(|| Solution::at(board, moves))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ClickOutcome, Game};
    use crate::utils::board_from_str_array;

    #[test]
    fn test_available_matches_order() {
        let board = board_from_str_array(&["1 2 2 1"]).unwrap();
        let matches = available_matches(&board);
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].first.id, matches[0].second.id), (0, 3));
        assert_eq!((matches[1].first.id, matches[1].second.id), (1, 2));
        assert_eq!(matches[1].path.turns, 0);
    }

    #[test]
    fn test_no_matches_when_values_differ() {
        let board = board_from_str_array(&["1 2 3 4"]).unwrap();
        assert!(available_matches(&board).is_empty());
        assert!(find_hint(&board).is_none());
        assert!(!has_moves(&board));
    }

    #[test]
    fn test_blocked_pairs_are_not_hints() {
        let board = board_from_str_array(&["1 2", "2 1"]).unwrap();
        assert!(!has_moves(&board));
    }

    #[test]
    fn test_find_hint_is_first_match() {
        let board = board_from_str_array(&["4 5 5", "4 . ."]).unwrap();
        let hint = find_hint(&board).unwrap();
        assert_eq!(hint.first.value, 4);
        assert_eq!((hint.second.row, hint.second.col), (1, 0));
    }

    #[test]
    fn test_apply_match_reflows() {
        let board = board_from_str_array(&["1 2 2 3"]).unwrap();
        let m = find_hint(&board).unwrap();
        let next = apply_match(&board, ReflowMode::Left, &m);
        assert_eq!(next.get_tile(0, 0).value, 1);
        assert_eq!(next.get_tile(0, 1).value, 3);
        assert_eq!(next.visible_count(), 2);
    }

    #[test]
    fn test_solve_dfs_clears_board() {
        let board = board_from_str_array(&["1 2 2 1"]).unwrap();
        let solution = solve_dfs(&board, ReflowMode::Normal, 10);
        assert!(solution.cleared);
        assert_eq!(solution.pairs_removed, 2);
        assert_eq!(solution.moves.len(), 2);
        assert_eq!(solution.moves[0].value, 1);
        assert!(solution.final_board.is_cleared());
    }

    #[test]
    fn test_solve_dfs_depth_zero() {
        let board = board_from_str_array(&["1 1", "2 2"]).unwrap();
        let solution = solve_dfs(&board, ReflowMode::Normal, 0);
        assert!(solution.moves.is_empty());
        assert!(!solution.cleared);
        assert_eq!(solution.final_board, board);
    }

    #[test]
    fn test_solve_dfs_depth_limited() {
        let board = board_from_str_array(&["1 1 2 2 3 3"]).unwrap();
        let solution = solve_dfs(&board, ReflowMode::Normal, 2);
        assert_eq!(solution.pairs_removed, 2);
        assert!(!solution.cleared);
        assert_eq!(solution.final_board.visible_count(), 2);
    }

    #[test]
    fn test_solve_dfs_stuck_board() {
        let board = board_from_str_array(&["1 2", "2 1"]).unwrap();
        let solution = solve_dfs(&board, ReflowMode::Normal, 5);
        assert_eq!(solution.pairs_removed, 0);
        assert!(!solution.cleared);
    }

    #[test]
    fn test_solution_replays_through_game() {
        for mode in [ReflowMode::Left, ReflowMode::Down, ReflowMode::Outside] {
            let board = board_from_str_array(&["1 2 1 2", "3 3 4 4"]).unwrap();
            let solution = solve_dfs(&board, mode, 10);
            assert!(solution.cleared, "mode {}", mode);

            let mut game = Game::new_with_board(board, mode);
            for m in &solution.moves {
                game.handle_tile_click(m.first.0, m.first.1);
                let outcome = game.handle_tile_click(m.second.0, m.second.1);
                assert!(matches!(outcome, ClickOutcome::Matched(_)), "mode {}", mode);
                game.complete_match();
            }
            assert!(game.is_cleared());
            assert_eq!(game.board(), &solution.final_board);
        }
    }
}
