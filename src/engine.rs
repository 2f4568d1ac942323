//! Core game engine for the connect-the-pair puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Tile`: One cell's game piece, visible or removed.
//! - `Board`: The dense `rows x cols` grid of tiles, with lookup, removal and
//!   text rendering helpers.
//! - `Game`: The play session. It owns the board, tracks the current
//!   selection and drives the select / match / resolve cycle.
use crate::error::{Error, Result};
use crate::generator;
use crate::level::LevelConfig;
use crate::pathfinder::{self, ConnectPath};
use crate::reflow::{self, ReflowMode};
use crate::solver;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier carried by every placeholder tile.
pub const PLACEHOLDER_ID: i32 = -1;

/// A single cell of the board.
///
/// Real tiles carry a positive `value` and a unique `id` that survives
/// reflows. Structurally empty cells hold a placeholder (`id == -1`,
/// `value == 0`, never visible). A matched tile stays in the grid with
/// `visible == false` until a reflow replaces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: i32,
    pub value: u32,
    pub visible: bool,
    pub row: usize,
    pub col: usize,
}

impl Tile {
    /// Creates a visible tile.
    pub fn new(id: i32, value: u32, row: usize, col: usize) -> Self {
        Tile {
            id,
            value,
            visible: true,
            row,
            col,
        }
    }

    /// Creates the placeholder for the cell at `(row, col)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_connect::engine::{Tile, PLACEHOLDER_ID};
    /// let tile = Tile::placeholder(2, 3);
    /// assert_eq!(tile.id, PLACEHOLDER_ID);
    /// assert_eq!(tile.value, 0);
    /// assert!(!tile.visible);
    /// ```
    pub fn placeholder(row: usize, col: usize) -> Self {
        Tile {
            id: PLACEHOLDER_ID,
            value: 0,
            visible: false,
            row,
            col,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }

    /// Returns a copy of this tile relocated to `(row, col)`.
    pub fn moved_to(self, row: usize, col: usize) -> Self {
        Tile { row, col, ..self }
    }
}

/// The game board: a dense, row-major grid of `Tile`s.
///
/// Every cell holds exactly one tile and the tile at `grid[r][c]` always
/// reports `row == r` and `col == c`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    grid: Vec<Vec<Tile>>,
}

impl Board {
    /// Creates a board of the given size filled with placeholders.
    pub fn new_empty(rows: usize, cols: usize) -> Self {
        let grid = (0..rows)
            .map(|r| (0..cols).map(|c| Tile::placeholder(r, c)).collect())
            .collect();
        Board { rows, cols, grid }
    }

    /// Lays `values` into a new board row-major.
    ///
    /// A non-zero value becomes a visible tile with `id = row * cols + col`.
    /// A `0` value, or any cell past the end of `values`, becomes a placeholder.
    ///
    /// # Errors
    /// * `Error::InvalidDimensions` if `rows` or `cols` is zero.
    /// * `Error::OverrideLength` if `values` holds more entries than the board has cells.
    ///
    /// # Examples
    /// ```
    /// use tile_connect::engine::Board;
    /// let board = Board::from_values(2, 2, &[1, 2, 2]).unwrap();
    /// assert_eq!(board.get_tile(0, 1).value, 2);
    /// assert!(board.get_tile(1, 1).is_placeholder());
    /// ```
    pub fn from_values(rows: usize, cols: usize, values: &[u32]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let cells = rows * cols;
        if values.len() > cells {
            return Err(Error::OverrideLength {
                expected: cells,
                found: values.len(),
            });
        }

        let mut board = Board::new_empty(rows, cols);
        for (index, &value) in values.iter().enumerate() {
            if value == 0 {
                continue;
            }
            let (r, c) = (index / cols, index % cols);
            board.grid[r][c] = Tile::new((r * cols + c) as i32, value, r, c);
        }
        Ok(board)
    }

    /// Generates a board from a seeded `SmallRng`.
    ///
    /// The same seed and dimensions always produce the same board.
    pub fn generate_with_seed(rows: usize, cols: usize, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        generator::generate(rows, cols, None, &mut rng)
    }

    /// Generates a board from an entropy-seeded generator; every call may differ.
    pub fn generate_random(rows: usize, cols: usize) -> Result<Self> {
        let mut rng = SmallRng::from_entropy();
        generator::generate(rows, cols, None, &mut rng)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the board.
    pub fn get_tile(&self, r: usize, c: usize) -> &Tile {
        &self.grid[r][c]
    }

    /// Returns the tile at `(r, c)`, or `None` when the coordinates are off the board.
    pub fn tile_at(&self, r: usize, c: usize) -> Option<&Tile> {
        self.grid.get(r).and_then(|row| row.get(c))
    }

    /// Returns the underlying grid, one vector per row.
    pub fn get_grid(&self) -> &[Vec<Tile>] {
        &self.grid
    }

    /// Places `tile` at `(r, c)`, rewriting its coordinates to match the cell.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the board.
    pub(crate) fn place(&mut self, tile: Tile, r: usize, c: usize) {
        self.grid[r][c] = tile.moved_to(r, c);
    }

    /// Iterates over every cell in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.grid.iter().flatten()
    }

    /// Iterates over the visible tiles in row-major order.
    pub fn visible_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles().filter(|t| t.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_tiles().count()
    }

    /// `true` once no visible tile remains.
    pub fn is_cleared(&self) -> bool {
        self.visible_tiles().next().is_none()
    }

    /// Finds the real tile with the given `id`. Placeholders are never returned.
    pub fn find_tile(&self, id: i32) -> Option<&Tile> {
        if id == PLACEHOLDER_ID {
            return None;
        }
        self.tiles().find(|t| t.id == id)
    }

    /// Marks the tiles with the given ids as removed.
    ///
    /// This is the only in-place mutation a match performs; tile positions
    /// are left untouched until the next reflow.
    ///
    /// # Returns
    /// The number of tiles that were visible and are now hidden.
    pub fn hide_tiles(&mut self, ids: &[i32]) -> usize {
        let mut hidden = 0;
        for tile in self.grid.iter_mut().flatten() {
            if tile.visible && ids.contains(&tile.id) {
                tile.visible = false;
                hidden += 1;
            }
        }
        hidden
    }

    /// Renders the board as text with column and row labels.
    ///
    /// Hidden cells print as `.`. Cells listed in `selected` are wrapped in
    /// brackets.
    pub fn to_string_with_highlight(&self, selected: &[(usize, usize)]) -> String {
        let value_width = self
            .tiles()
            .map(|t| digit_count(t.value as usize))
            .max()
            .unwrap_or(1);
        let width = value_width.max(digit_count(self.cols.saturating_sub(1)));
        let label_width = digit_count(self.rows.saturating_sub(1));

        let mut output = String::new();
        output.push_str(&" ".repeat(label_width + 1));
        for c in 0..self.cols {
            output.push_str(&format!(" {:>width$} ", c, width = width));
        }

        for (r, row) in self.grid.iter().enumerate() {
            output.push('\n');
            output.push_str(&format!("{:>w$} ", r, w = label_width));
            for tile in row {
                let content = if tile.visible {
                    tile.value.to_string()
                } else {
                    ".".to_string()
                };
                if selected.contains(&(tile.row, tile.col)) {
                    output.push_str(&format!("[{:>width$}]", content, width = width));
                } else {
                    output.push_str(&format!(" {:>width$} ", content, width = width));
                }
            }
        }
        output
    }
}

fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(&[]))
    }
}

/// Two tiles the path finder connected, and the connector between them.
///
/// `path` is in augmented grid coordinates (see [`crate::pathfinder`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub first: Tile,
    pub second: Tile,
    pub path: ConnectPath,
}

/// Where the session is in the select / match cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected.
    Idle,
    /// One tile selected, waiting for its partner.
    OneSelected(Tile),
    /// A match was found; input is frozen until `Game::complete_match`.
    Resolving(MatchResult),
}

/// What a click did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click had no effect (hidden tile, off-board, or a match is resolving).
    Ignored,
    Selected(Tile),
    Deselected(Tile),
    /// The second tile had a different value; the selection was cleared.
    Mismatch,
    /// Same values but no connector within the turn budget; the selection was cleared.
    NoPath,
    /// The pair connects. The session is now `Resolving`.
    Matched(MatchResult),
}

/// Manages the state of one play session.
///
/// The caller drives it: `handle_tile_click` for each selection, then
/// `complete_match` once any removal animation has finished.
///
/// # Examples
/// ```
/// use tile_connect::engine::{ClickOutcome, Game};
/// use tile_connect::reflow::ReflowMode;
/// use tile_connect::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1 2 2 1"]).unwrap();
/// let mut game = Game::new_with_board(board, ReflowMode::Left);
///
/// game.handle_tile_click(0, 1);
/// let outcome = game.handle_tile_click(0, 2);
/// assert!(matches!(outcome, ClickOutcome::Matched(_)));
///
/// game.complete_match();
/// assert_eq!(game.board().get_tile(0, 1).value, 1);
/// assert!(game.board().get_tile(0, 2).is_placeholder());
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    config: LevelConfig,
    level: u32,
    phase: Phase,
    matches: u32,
    rng: SmallRng,
}

impl Game {
    /// Starts a session on `level` with a freshly generated board.
    pub fn new(level: u32, config: LevelConfig) -> Result<Self> {
        Self::with_rng(level, config, SmallRng::from_entropy())
    }

    /// Like `Game::new`, but every generated board (including resets) is
    /// reproducible from `seed`.
    pub fn new_with_seed(level: u32, config: LevelConfig, seed: u64) -> Result<Self> {
        Self::with_rng(level, config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(level: u32, config: LevelConfig, mut rng: SmallRng) -> Result<Self> {
        config.validate()?;
        let board = generator::generate(config.rows, config.cols, None, &mut rng)?;
        info!(
            "level {} started: {}x{} board, mode {}",
            level, config.rows, config.cols, config.mode
        );
        Ok(Game {
            board,
            config,
            level,
            phase: Phase::Idle,
            matches: 0,
            rng,
        })
    }

    /// Starts a session on a prepared board, for fixtures and replays.
    pub fn new_with_board(board: Board, mode: ReflowMode) -> Self {
        let config = LevelConfig {
            rows: board.rows(),
            cols: board.cols(),
            mode,
        };
        Game {
            board,
            config,
            level: 1,
            phase: Phase::Idle,
            matches: 0,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn mode(&self) -> ReflowMode {
        self.config.mode
    }

    /// Number of pairs removed since the board was generated.
    pub fn matches(&self) -> u32 {
        self.matches
    }

    /// The currently selected tile, if exactly one is selected.
    pub fn selected(&self) -> Option<&Tile> {
        match &self.phase {
            Phase::OneSelected(tile) => Some(tile),
            _ => None,
        }
    }

    /// The match waiting for `complete_match`, if any.
    pub fn pending_match(&self) -> Option<&MatchResult> {
        match &self.phase {
            Phase::Resolving(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, Phase::Resolving(_))
    }

    pub fn is_cleared(&self) -> bool {
        self.board.is_cleared()
    }

    /// A connectable pair on the current board, if one exists.
    pub fn hint(&self) -> Option<MatchResult> {
        solver::find_hint(&self.board)
    }

    /// `true` when tiles remain but no pair on the board can be connected.
    pub fn is_stuck(&self) -> bool {
        !self.board.is_cleared() && !solver::has_moves(&self.board)
    }

    /// Processes a click on the tile at `(row, col)`.
    ///
    /// Clicking a hidden tile, a cell off the board, or anything while a
    /// match is resolving does nothing. Clicking the selected tile again
    /// deselects it. A second tile of a different value, or one the path
    /// finder cannot reach, clears the selection. A connectable second tile
    /// moves the session to `Phase::Resolving`; the tiles stay on the board
    /// until `complete_match` is called.
    pub fn handle_tile_click(&mut self, row: usize, col: usize) -> ClickOutcome {
        let first = match self.phase {
            Phase::Resolving(_) => {
                warn!("click at ({}, {}) ignored while a match resolves", row, col);
                return ClickOutcome::Ignored;
            }
            Phase::Idle => None,
            Phase::OneSelected(tile) => Some(tile),
        };

        let tile = match self.board.tile_at(row, col) {
            Some(tile) if tile.visible => *tile,
            _ => return ClickOutcome::Ignored,
        };

        let Some(first) = first else {
            self.phase = Phase::OneSelected(tile);
            return ClickOutcome::Selected(tile);
        };

        self.phase = Phase::Idle;
        if first.id == tile.id {
            return ClickOutcome::Deselected(tile);
        }
        if first.value != tile.value {
            return ClickOutcome::Mismatch;
        }

        match pathfinder::find_path(&first, &tile, &self.board) {
            Some(path) => {
                debug!(
                    "tiles {} and {} connect with {} turns",
                    first.id, tile.id, path.turns
                );
                let result = MatchResult {
                    first,
                    second: tile,
                    path,
                };
                self.phase = Phase::Resolving(result.clone());
                ClickOutcome::Matched(result)
            }
            None => ClickOutcome::NoPath,
        }
    }

    /// Removes the pending match and reflows the board.
    ///
    /// Both tiles are hidden, the level's reflow mode is applied (skipped
    /// for `ReflowMode::Normal`) and the session returns to `Phase::Idle`.
    ///
    /// # Returns
    /// The resolved match, or `None` if the session was not resolving.
    pub fn complete_match(&mut self) -> Option<MatchResult> {
        let result = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Resolving(result) => result,
            other => {
                self.phase = other;
                return None;
            }
        };

        self.board.hide_tiles(&[result.first.id, result.second.id]);
        if self.config.mode != ReflowMode::Normal {
            self.board = reflow::reflow(self.config.mode, &self.board);
        }
        self.matches += 1;

        info!(
            "removed pair of {} (tiles {} and {}), {} tiles left",
            result.first.value,
            result.first.id,
            result.second.id,
            self.board.visible_count()
        );
        if self.board.is_cleared() {
            info!("level {} cleared after {} matches", self.level, self.matches);
        }
        Some(result)
    }

    /// Generates a new board for the current level and clears the selection.
    ///
    /// A pending match is discarded.
    pub fn reset_game(&mut self) -> Result<()> {
        self.board = generator::generate(self.config.rows, self.config.cols, None, &mut self.rng)?;
        self.phase = Phase::Idle;
        self.matches = 0;
        info!("level {} reset", self.level);
        Ok(())
    }

    /// Switches to another level and generates its board.
    ///
    /// On error the session is left unchanged.
    pub fn change_level(&mut self, level: u32, config: LevelConfig) -> Result<()> {
        config.validate()?;
        let board = generator::generate(config.rows, config.cols, None, &mut self.rng)?;
        self.board = board;
        self.config = config;
        self.level = level;
        self.phase = Phase::Idle;
        self.matches = 0;
        info!(
            "changed to level {}: {}x{} board, mode {}",
            level, config.rows, config.cols, config.mode
        );
        Ok(())
    }
}
