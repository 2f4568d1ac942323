//! Post-match reflow of the surviving tiles.
//!
//! Each level picks one [`ReflowMode`]. After a pair is removed the visible
//! tiles are moved toward an edge, the centre, or the perimeter, and every
//! other cell becomes a placeholder. Reflow always builds a new board; tiles
//! keep their `id` and `value` and take the coordinates of their new cell.
use crate::engine::Board;
use crate::error::Error;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How surviving tiles move after a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflowMode {
    /// Tiles stay where they are.
    #[default]
    Normal,
    /// Each row is packed against its left edge.
    Left,
    /// Each row is packed against its right edge.
    Right,
    /// Each column is packed against the top.
    Up,
    /// Each column is packed against the bottom.
    Down,
    /// Tiles gather around the centre of the board.
    Inside,
    /// Tiles spread along the perimeter, spiralling inward.
    Outside,
}

impl ReflowMode {
    pub const ALL: [ReflowMode; 7] = [
        ReflowMode::Normal,
        ReflowMode::Left,
        ReflowMode::Right,
        ReflowMode::Up,
        ReflowMode::Down,
        ReflowMode::Inside,
        ReflowMode::Outside,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReflowMode::Normal => "normal",
            ReflowMode::Left => "left",
            ReflowMode::Right => "right",
            ReflowMode::Up => "up",
            ReflowMode::Down => "down",
            ReflowMode::Inside => "inside",
            ReflowMode::Outside => "outside",
        }
    }
}

impl fmt::Display for ReflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReflowMode {
    type Err = Error;

    /// Parses a mode name, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use tile_connect::reflow::ReflowMode;
    /// assert_eq!("Left".parse::<ReflowMode>().unwrap(), ReflowMode::Left);
    /// assert!("sideways".parse::<ReflowMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ReflowMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| Error::UnknownReflowMode(s.to_string()))
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Start,
    End,
}

/// Computes the board after `mode` is applied.
///
/// `ReflowMode::Normal` returns an unchanged copy. Every other mode collects
/// the visible tiles and places them on the mode's target cells; the result
/// has the same dimensions and a placeholder in every other cell.
///
/// # Examples
/// ```
/// use tile_connect::reflow::{reflow, ReflowMode};
/// use tile_connect::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1 . . 1"]).unwrap();
/// let packed = reflow(ReflowMode::Left, &board);
/// assert_eq!(packed.get_tile(0, 1).value, 1);
/// assert!(packed.get_tile(0, 3).is_placeholder());
/// ```
pub fn reflow(mode: ReflowMode, board: &Board) -> Board {
    let result = match mode {
        ReflowMode::Normal => return board.clone(),
        ReflowMode::Left => pack_rows(board, Edge::Start),
        ReflowMode::Right => pack_rows(board, Edge::End),
        ReflowMode::Up => pack_columns(board, Edge::Start),
        ReflowMode::Down => pack_columns(board, Edge::End),
        ReflowMode::Inside => place_in_order(board, &center_order(board.rows(), board.cols())),
        ReflowMode::Outside => place_in_order(board, &spiral_order(board.rows(), board.cols())),
    };
    debug!(
        "reflow {}: {} tiles on a {}x{} board",
        mode,
        result.visible_count(),
        board.rows(),
        board.cols()
    );
    result
}

fn pack_rows(board: &Board, edge: Edge) -> Board {
    let cols = board.cols();
    let mut packed = Board::new_empty(board.rows(), cols);
    for (r, row) in board.get_grid().iter().enumerate() {
        let visible: Vec<_> = row.iter().filter(|t| t.visible).copied().collect();
        let offset = match edge {
            Edge::Start => 0,
            Edge::End => cols - visible.len(),
        };
        for (i, tile) in visible.into_iter().enumerate() {
            packed.place(tile, r, offset + i);
        }
    }
    packed
}

fn pack_columns(board: &Board, edge: Edge) -> Board {
    let rows = board.rows();
    let mut packed = Board::new_empty(rows, board.cols());
    for c in 0..board.cols() {
        let visible: Vec<_> = (0..rows)
            .map(|r| *board.get_tile(r, c))
            .filter(|t| t.visible)
            .collect();
        let offset = match edge {
            Edge::Start => 0,
            Edge::End => rows - visible.len(),
        };
        for (i, tile) in visible.into_iter().enumerate() {
            packed.place(tile, offset + i, c);
        }
    }
    packed
}

/// Places the visible tiles, in row-major order, on `targets` in order.
fn place_in_order(board: &Board, targets: &[(usize, usize)]) -> Board {
    let mut placed = Board::new_empty(board.rows(), board.cols());
    for (tile, &(r, c)) in board.visible_tiles().zip(targets) {
        placed.place(*tile, r, c);
    }
    placed
}

/// Every cell of a `rows x cols` board, nearest to the centre
/// `((rows - 1) / 2, (cols - 1) / 2)` first.
///
/// Equal distances are ordered by row, then column.
///
/// # Examples
/// ```
/// use tile_connect::reflow::center_order;
/// let order = center_order(3, 3);
/// assert_eq!(order[0], (1, 1));
/// assert_eq!(&order[1..5], &[(0, 1), (1, 0), (1, 2), (2, 1)]);
/// ```
pub fn center_order(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut cells: Vec<(usize, usize)> = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .collect();
    // Doubled offsets keep half-cell centres on integers.
    let (center_r, center_c) = (rows as i64 - 1, cols as i64 - 1);
    cells.sort_by_key(|&(r, c)| {
        let dr = 2 * r as i64 - center_r;
        let dc = 2 * c as i64 - center_c;
        (dr * dr + dc * dc, r, c)
    });
    cells
}

/// Every cell of a `rows x cols` board in clockwise spiral order, starting at
/// the top-left corner and working inward.
///
/// # Examples
/// ```
/// use tile_connect::reflow::spiral_order;
/// assert_eq!(
///     spiral_order(2, 3),
///     vec![(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0)]
/// );
/// ```
pub fn spiral_order(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::with_capacity(rows * cols);
    let (mut top, mut left) = (0isize, 0isize);
    let (mut bottom, mut right) = (rows as isize - 1, cols as isize - 1);

    while top <= bottom && left <= right {
        for c in left..=right {
            cells.push((top as usize, c as usize));
        }
        top += 1;
        for r in top..=bottom {
            cells.push((r as usize, right as usize));
        }
        right -= 1;
        if top <= bottom {
            for c in (left..=right).rev() {
                cells.push((bottom as usize, c as usize));
            }
            bottom -= 1;
        }
        if left <= right {
            for r in (top..=bottom).rev() {
                cells.push((r as usize, left as usize));
            }
            left += 1;
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Tile;
    use crate::utils::board_from_str_array;
    use std::collections::HashSet;

    fn values(board: &Board) -> Vec<Vec<u32>> {
        board
            .get_grid()
            .iter()
            .map(|row| row.iter().map(|t| if t.visible { t.value } else { 0 }).collect())
            .collect()
    }

    fn visible_pairs(board: &Board) -> Vec<(i32, u32)> {
        let mut pairs: Vec<_> = board.visible_tiles().map(|t| (t.id, t.value)).collect();
        pairs.sort_unstable();
        pairs
    }

    fn assert_coordinates_consistent(board: &Board) {
        for (r, row) in board.get_grid().iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                assert_eq!((tile.row, tile.col), (r, c));
            }
        }
    }

    fn sample_board() -> Board {
        let mut board = board_from_str_array(&[
            "1 2 3 4",
            "5 6 7 8",
            "9 1 2 3",
        ])
        .unwrap();
        // remove a scattering of tiles
        board.hide_tiles(&[1, 4, 6, 10, 11]);
        board
    }

    #[test]
    fn test_mode_parse_and_display() {
        for mode in ReflowMode::ALL {
            assert_eq!(mode.to_string().parse::<ReflowMode>().unwrap(), mode);
        }
        assert_eq!(" OUTSIDE ".parse::<ReflowMode>().unwrap(), ReflowMode::Outside);
        let err = "diagonal".parse::<ReflowMode>().unwrap_err();
        assert!(matches!(err, Error::UnknownReflowMode(name) if name == "diagonal"));
    }

    #[test]
    fn test_normal_is_identity() {
        let board = sample_board();
        assert_eq!(reflow(ReflowMode::Normal, &board), board);
    }

    #[test]
    fn test_left_packs_rows() {
        let packed = reflow(ReflowMode::Left, &sample_board());
        assert_eq!(
            values(&packed),
            vec![vec![1, 3, 4, 0], vec![6, 8, 0, 0], vec![9, 1, 0, 0]]
        );
        assert_eq!(packed.get_tile(0, 1).id, 2);
        assert!(packed.get_tile(1, 3).is_placeholder());
        assert_coordinates_consistent(&packed);
    }

    #[test]
    fn test_left_on_packed_row_is_noop() {
        let board = board_from_str_array(&["1 2 . .", "3 3 2 1"]).unwrap();
        let packed = reflow(ReflowMode::Left, &board);
        assert_eq!(packed, board);
    }

    #[test]
    fn test_right_packs_rows() {
        let packed = reflow(ReflowMode::Right, &sample_board());
        assert_eq!(
            values(&packed),
            vec![vec![0, 1, 3, 4], vec![0, 0, 6, 8], vec![0, 0, 9, 1]]
        );
        assert_eq!(packed.get_tile(2, 3).id, 9);
        assert_coordinates_consistent(&packed);
    }

    #[test]
    fn test_up_packs_columns() {
        let packed = reflow(ReflowMode::Up, &sample_board());
        assert_eq!(
            values(&packed),
            vec![vec![1, 6, 3, 4], vec![9, 1, 0, 8], vec![0, 0, 0, 0]]
        );
        assert_coordinates_consistent(&packed);
    }

    #[test]
    fn test_down_packs_columns() {
        let packed = reflow(ReflowMode::Down, &sample_board());
        assert_eq!(
            values(&packed),
            vec![vec![0, 0, 0, 0], vec![1, 6, 0, 4], vec![9, 1, 3, 8]]
        );
        assert_eq!(packed.get_tile(2, 2).id, 2);
        assert_coordinates_consistent(&packed);
    }

    #[test]
    fn test_inside_clusters_at_center() {
        let mut board = board_from_str_array(&["1 . 2", ". . .", "2 . 1"]).unwrap();
        let packed = reflow(ReflowMode::Inside, &board);
        assert_eq!(values(&packed), vec![vec![0, 2, 0], vec![2, 1, 1], vec![0, 0, 0]]);
        assert_coordinates_consistent(&packed);

        board.hide_tiles(&[2, 6]);
        let packed = reflow(ReflowMode::Inside, &board);
        assert_eq!(packed.get_tile(1, 1).id, 0);
        assert_eq!(packed.get_tile(0, 1).id, 8);
    }

    #[test]
    fn test_outside_follows_spiral() {
        let board = board_from_str_array(&[". . .", ". 4 5", "5 . 4"]).unwrap();
        let packed = reflow(ReflowMode::Outside, &board);
        assert_eq!(values(&packed), vec![vec![4, 5, 5], vec![0, 0, 4], vec![0, 0, 0]]);
        assert_coordinates_consistent(&packed);
    }

    #[test]
    fn test_reflow_conserves_visible_tiles() {
        let board = sample_board();
        for mode in ReflowMode::ALL {
            let packed = reflow(mode, &board);
            assert_eq!(packed.rows(), board.rows());
            assert_eq!(packed.cols(), board.cols());
            assert_eq!(visible_pairs(&packed), visible_pairs(&board), "mode {}", mode);
        }
    }

    #[test]
    fn test_reflow_replaces_hidden_tiles_with_placeholders() {
        let board = sample_board();
        for mode in ReflowMode::ALL.into_iter().filter(|m| *m != ReflowMode::Normal) {
            let packed = reflow(mode, &board);
            assert!(packed
                .tiles()
                .filter(|t| !t.visible)
                .all(Tile::is_placeholder));
        }
    }

    #[test]
    fn test_center_order_even_board() {
        let order = center_order(2, 2);
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        let order = center_order(2, 4);
        assert_eq!(&order[..4], &[(0, 1), (0, 2), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_spiral_order_shapes() {
        assert_eq!(spiral_order(1, 1), vec![(0, 0)]);
        assert_eq!(spiral_order(1, 3), vec![(0, 0), (0, 1), (0, 2)]);
        assert_eq!(spiral_order(3, 1), vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(
            spiral_order(3, 3),
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 2),
                (2, 2),
                (2, 1),
                (2, 0),
                (1, 0),
                (1, 1)
            ]
        );
        assert!(spiral_order(0, 4).is_empty());
    }

    #[test]
    fn test_orders_are_permutations() {
        for rows in 1..7 {
            for cols in 1..7 {
                for order in [center_order(rows, cols), spiral_order(rows, cols)] {
                    assert_eq!(order.len(), rows * cols);
                    let unique: HashSet<_> = order.iter().copied().collect();
                    assert_eq!(unique.len(), rows * cols);
                    assert!(order.iter().all(|&(r, c)| r < rows && c < cols));
                }
            }
        }
    }
}
