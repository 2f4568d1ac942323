//! Connectivity test between two tiles of equal value.
//!
//! Two tiles connect when a line of at most three straight segments (two
//! turns) joins them without crossing a visible tile. The line may leave the
//! board: the search runs on an augmented grid with one extra free ring of
//! cells around the real board, so every board coordinate is shifted by +1.
//!
//! The search is a breadth-first search over `(cell, incoming direction)`
//! states, processed one turn count at a time. Continuing straight keeps a
//! state in its current layer and turning pushes it to the next one, so the
//! first time the target is dequeued its path has the fewest turns possible.
//! Within a layer states are expanded in the order they were queued, with
//! neighbours tried up, right, down, left.
use crate::engine::{Board, Tile};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Most direction changes a connector may make.
pub const MAX_TURNS: u8 = 2;

/// A cell of the augmented grid. Real board cell `(r, c)` is `(r + 1, c + 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathPoint {
    pub row: usize,
    pub col: usize,
}

impl PathPoint {
    /// The augmented cell of the board cell `(row, col)`.
    pub fn from_board(row: usize, col: usize) -> Self {
        PathPoint {
            row: row + 1,
            col: col + 1,
        }
    }

    /// Board coordinates of this point. Points on the outer ring map to
    /// `-1`, `rows` or `cols`.
    pub fn to_board(self) -> (isize, isize) {
        (self.row as isize - 1, self.col as isize - 1)
    }

    /// Centre of this point in pixel space for square cells of `cell_size`.
    ///
    /// # Examples
    /// ```
    /// use tile_connect::pathfinder::PathPoint;
    /// let p = PathPoint { row: 1, col: 2 };
    /// assert_eq!(p.to_pixel(54.0), (81.0, 27.0));
    /// ```
    pub fn to_pixel(self, cell_size: f64) -> (f64, f64) {
        (
            (self.col as f64 - 0.5) * cell_size,
            (self.row as f64 - 0.5) * cell_size,
        )
    }
}

/// A connector found by [`find_path`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConnectPath {
    /// Every cell the connector passes through, from the first tile to the second.
    pub points: Vec<PathPoint>,
    pub turns: u8,
}

impl ConnectPath {
    /// The path in board coordinates (see [`PathPoint::to_board`]).
    pub fn board_points(&self) -> Vec<(isize, isize)> {
        self.points.iter().map(|p| p.to_board()).collect()
    }

    /// The endpoints and the cells where the connector bends; enough to draw
    /// it as a polyline.
    pub fn corners(&self) -> Vec<PathPoint> {
        let mut corners: Vec<PathPoint> = Vec::with_capacity(self.turns as usize + 2);
        for (i, &point) in self.points.iter().enumerate() {
            let is_end = i == 0 || i + 1 == self.points.len();
            let bends = !is_end && {
                let prev = self.points[i - 1];
                let next = self.points[i + 1];
                prev.row != next.row && prev.col != next.col
            };
            if is_end || bends {
                corners.push(point);
            }
        }
        corners
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The neighbour of `(row, col)` in this direction, if it lies inside a
    /// `height x width` grid.
    fn step(self, row: usize, col: usize, height: usize, width: usize) -> Option<(usize, usize)> {
        match self {
            Direction::Up => row.checked_sub(1).map(|r| (r, col)),
            Direction::Right => (col + 1 < width).then_some((row, col + 1)),
            Direction::Down => (row + 1 < height).then_some((row + 1, col)),
            Direction::Left => col.checked_sub(1).map(|c| (row, c)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    row: usize,
    col: usize,
    dir: Option<Direction>,
    turns: u8,
    parent: Option<usize>,
}

/// The augmented grid as seen by one search.
struct SearchGrid<'a> {
    board: &'a Board,
    height: usize,
    width: usize,
    start: (usize, usize),
    target: (usize, usize),
}

impl SearchGrid<'_> {
    /// A cell is free on the outer ring, at either endpoint, or where the
    /// board tile is not visible.
    fn is_free(&self, row: usize, col: usize) -> bool {
        if row == 0 || col == 0 || row == self.height - 1 || col == self.width - 1 {
            return true;
        }
        if (row, col) == self.start || (row, col) == self.target {
            return true;
        }
        !self.board.get_tile(row - 1, col - 1).visible
    }

    fn contains(&self, (row, col): (usize, usize)) -> bool {
        row < self.height && col < self.width
    }
}

/// Finds the connector between tiles `a` and `b` with the fewest turns.
///
/// `a` and `b` must have the same value; matching values is the caller's job.
///
/// # Returns
/// `Some(ConnectPath)` with points in augmented coordinates, starting at `a`
/// and ending at `b`, when a connector with at most [`MAX_TURNS`] turns
/// exists. `None` when no such connector exists.
///
/// # Examples
/// ```
/// use tile_connect::pathfinder::find_path;
/// use tile_connect::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1 . . 1", "2 3 3 2"]).unwrap();
/// let path = find_path(board.get_tile(0, 0), board.get_tile(0, 3), &board).unwrap();
/// assert_eq!(path.turns, 0);
/// assert_eq!(path.points.len(), 4);
/// ```
pub fn find_path(a: &Tile, b: &Tile, board: &Board) -> Option<ConnectPath> {
    debug_assert_eq!(a.value, b.value, "find_path called on tiles of different value");

    let grid = SearchGrid {
        board,
        height: board.rows() + 2,
        width: board.cols() + 2,
        start: (a.row + 1, a.col + 1),
        target: (b.row + 1, b.col + 1),
    };
    if !grid.contains(grid.start) || !grid.contains(grid.target) {
        return None;
    }

    let mut nodes = vec![Node {
        row: grid.start.0,
        col: grid.start.1,
        dir: None,
        turns: 0,
        parent: None,
    }];
    let mut layers: Vec<VecDeque<usize>> = vec![VecDeque::new(); MAX_TURNS as usize + 1];
    layers[0].push_back(0);
    // Fewest turns recorded for each (cell, incoming direction); `None` is unvisited.
    let mut best: Vec<[Option<u8>; 4]> = vec![[None; 4]; grid.height * grid.width];

    for layer in 0..layers.len() {
        while let Some(index) = layers[layer].pop_front() {
            let node = nodes[index];
            if let Some(dir) = node.dir {
                // Superseded by a cheaper visit to the same state.
                if best[node.row * grid.width + node.col][dir.index()] != Some(node.turns) {
                    continue;
                }
            }

            if (node.row, node.col) == grid.target {
                let path = trace_back(&nodes, index);
                debug!(
                    "connected tiles {} and {}: {} turns, {} states explored",
                    a.id,
                    b.id,
                    path.turns,
                    nodes.len()
                );
                return Some(path);
            }

            for dir in Direction::ALL {
                let turns = match node.dir {
                    Some(prev) if prev != dir => node.turns + 1,
                    _ => node.turns,
                };
                if turns > MAX_TURNS {
                    continue;
                }
                let Some((row, col)) = dir.step(node.row, node.col, grid.height, grid.width)
                else {
                    continue;
                };
                if !grid.is_free(row, col) {
                    continue;
                }
                let slot = &mut best[row * grid.width + col][dir.index()];
                if matches!(*slot, Some(recorded) if recorded <= turns) {
                    continue;
                }
                *slot = Some(turns);

                nodes.push(Node {
                    row,
                    col,
                    dir: Some(dir),
                    turns,
                    parent: Some(index),
                });
                layers[turns as usize].push_back(nodes.len() - 1);
            }
        }
    }

    debug!(
        "no connector between tiles {} and {} ({} states explored)",
        a.id,
        b.id,
        nodes.len()
    );
    None
}

fn trace_back(nodes: &[Node], end: usize) -> ConnectPath {
    let turns = nodes[end].turns;
    let mut points = Vec::new();
    let mut cursor = Some(end);
    while let Some(index) = cursor {
        let node = &nodes[index];
        points.push(PathPoint {
            row: node.row,
            col: node.col,
        });
        cursor = node.parent;
    }
    points.reverse();
    ConnectPath { points, turns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    fn board(rows: &[&str]) -> Board {
        board_from_str_array(rows).unwrap()
    }

    fn connect(board: &Board, a: (usize, usize), b: (usize, usize)) -> Option<ConnectPath> {
        find_path(board.get_tile(a.0, a.1), board.get_tile(b.0, b.1), board)
    }

    fn assert_well_formed(path: &ConnectPath, board: &Board, a: (usize, usize), b: (usize, usize)) {
        assert_eq!(path.points.first(), Some(&PathPoint::from_board(a.0, a.1)));
        assert_eq!(path.points.last(), Some(&PathPoint::from_board(b.0, b.1)));
        for pair in path.points.windows(2) {
            let dr = pair[0].row.abs_diff(pair[1].row);
            let dc = pair[0].col.abs_diff(pair[1].col);
            assert_eq!(dr + dc, 1, "path must move one cell at a time");
        }
        for point in &path.points[1..path.points.len() - 1] {
            let (r, c) = point.to_board();
            if let Some(tile) = board.tile_at(r as usize, c as usize).filter(|_| r >= 0 && c >= 0) {
                assert!(!tile.visible);
            }
        }
        assert_eq!(path.corners().len(), path.turns as usize + 2);
    }

    #[test]
    fn test_adjacent_tiles_connect_straight() {
        let b = board(&["1 2 2 1"]);
        let path = connect(&b, (0, 1), (0, 2)).unwrap();
        assert_eq!(path.turns, 0);
        assert_eq!(
            path.points,
            vec![PathPoint { row: 1, col: 2 }, PathPoint { row: 1, col: 3 }]
        );
    }

    #[test]
    fn test_straight_line_over_removed_tiles() {
        let b = board(&["5 . . . 5", "1 2 3 4 6"]);
        let path = connect(&b, (0, 0), (0, 4)).unwrap();
        assert_eq!(path.turns, 0);
        assert_eq!(path.points.len(), 5);
        assert!(path.points.iter().all(|p| p.row == 1));
        assert_well_formed(&path, &b, (0, 0), (0, 4));
    }

    #[test]
    fn test_vertical_line() {
        let b = board(&["1 7 2", "3 . 4", "5 7 6"]);
        let path = connect(&b, (0, 1), (2, 1)).unwrap();
        assert_eq!(path.turns, 0);
        assert!(path.points.iter().all(|p| p.col == 2));
    }

    #[test]
    fn test_u_shape_along_right_edge() {
        let b = board(&["1 2 3", "4 . 5", "6 7 8", "9 . 3"]);
        // (1,2) and (2,2) block the shared column, so the line runs down the
        // right-hand ring.
        let path = connect(&b, (0, 2), (3, 2)).unwrap();
        assert_eq!(path.turns, 2);
        assert_well_formed(&path, &b, (0, 2), (3, 2));
    }

    #[test]
    fn test_l_shape_connection() {
        let b = board(&["4 . .", "1 2 .", "3 5 4"]);
        let path = connect(&b, (0, 0), (2, 2)).unwrap();
        assert_eq!(path.turns, 1);
        assert_well_formed(&path, &b, (0, 0), (2, 2));
        assert_eq!(
            path.corners(),
            vec![
                PathPoint { row: 1, col: 1 },
                PathPoint { row: 1, col: 3 },
                PathPoint { row: 3, col: 3 },
            ]
        );
    }

    #[test]
    fn test_single_bend_preferred_over_z_shape() {
        // Both L and Z connectors have the same length here; the L wins.
        let b = board(&["3 . .", ". . .", ". . 3"]);
        let path = connect(&b, (0, 0), (2, 2)).unwrap();
        assert_eq!(path.turns, 1);
        assert_well_formed(&path, &b, (0, 0), (2, 2));
    }

    #[test]
    fn test_equal_turn_tie_follows_direction_order() {
        // Right-then-down and down-then-right both bend once; right is tried first.
        let b = board(&["3 . .", ". . .", ". . 3"]);
        let path = connect(&b, (0, 0), (2, 2)).unwrap();
        assert_eq!(
            path.corners(),
            vec![
                PathPoint { row: 1, col: 1 },
                PathPoint { row: 1, col: 3 },
                PathPoint { row: 3, col: 3 },
            ]
        );
    }

    #[test]
    fn test_perimeter_route_when_interior_blocked() {
        let b = board(&["1 2 1", "3 4 5"]);
        let path = connect(&b, (0, 0), (0, 2)).unwrap();
        assert_eq!(path.turns, 2);
        assert!(path.points.iter().any(|p| p.row == 0));
        assert_well_formed(&path, &b, (0, 0), (0, 2));
    }

    #[test]
    fn test_bottom_perimeter_route() {
        let b = board(&["2 3 4", "5 6 7", "1 8 1"]);
        let path = connect(&b, (2, 0), (2, 2)).unwrap();
        assert_eq!(path.turns, 2);
        assert!(path.points.iter().any(|p| p.row == 4));
    }

    #[test]
    fn test_walled_pair_is_rejected() {
        let b = board(&[
            "2 2 2 2 2",
            "2 1 3 4 2",
            "2 5 6 1 2",
            "2 2 2 2 2",
        ]);
        assert!(connect(&b, (1, 1), (2, 3)).is_none());
    }

    #[test]
    fn test_three_turns_are_rejected() {
        let b = board(&["1 2", "2 1"]);
        assert!(connect(&b, (0, 0), (1, 1)).is_none());
        assert!(connect(&b, (0, 1), (1, 0)).is_none());
    }

    #[test]
    fn test_diagonal_connects_once_blockers_removed() {
        let mut b = board(&["1 2", "2 1"]);
        b.hide_tiles(&[1, 2]);
        let path = connect(&b, (0, 0), (1, 1)).unwrap();
        assert_eq!(path.turns, 1);
    }

    #[test]
    fn test_placeholders_are_passable() {
        let b = board(&["1 . 7", "9 . 9", "8 . 1"]);
        let path = connect(&b, (0, 0), (2, 2)).unwrap();
        assert!(path.turns <= 2);
        assert_well_formed(&path, &b, (0, 0), (2, 2));
    }

    #[test]
    fn test_board_and_pixel_conversion() {
        let b = board(&["1 1"]);
        let path = connect(&b, (0, 0), (0, 1)).unwrap();
        assert_eq!(path.board_points(), vec![(0, 0), (0, 1)]);
        assert_eq!(path.points[0].to_pixel(10.0), (5.0, 5.0));
        assert_eq!(PathPoint { row: 0, col: 0 }.to_board(), (-1, -1));
    }

    #[test]
    fn test_off_board_tile_has_no_path() {
        let b = board(&["1 1"]);
        let ghost = Tile::new(99, 1, 7, 7);
        assert!(find_path(b.get_tile(0, 0), &ghost, &b).is_none());
    }
}
