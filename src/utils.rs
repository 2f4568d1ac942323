use crate::engine::Board;
use crate::error::{Error, Result};

/// Parses an array of string slices into a `Board` object.
///
/// Each string slice is one row, starting from row 0. Cells are separated by
/// whitespace, so multi-digit values can be written directly. Every row must
/// have the same number of cells.
///
/// Valid cell tokens are:
/// - a positive integer: a visible tile with that value
/// - `.` or `0`: a placeholder
///
/// Tiles get `id = row * cols + col`, the same numbering a generated board uses.
///
/// # Errors
/// * `Error::InvalidDimensions` if `s` is empty or the first row has no cells.
/// * `Error::Parse` if a token is not recognised or a row has the wrong width.
///
/// # Examples
/// ```
/// use tile_connect::utils::board_from_str_array;
///
/// let board = board_from_str_array(&[
///     "1 2 .",  // Row 0
///     "2 10 1", // Row 1
/// ])
/// .unwrap();
/// assert_eq!(board.rows(), 2);
/// assert_eq!(board.cols(), 3);
/// assert_eq!(board.get_tile(1, 1).value, 10);
/// assert_eq!(board.get_tile(1, 1).id, 4);
/// assert!(board.get_tile(0, 2).is_placeholder());
///
/// assert!(board_from_str_array(&["1 x"]).is_err());
/// assert!(board_from_str_array(&["1 2", "3"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board> {
    let cols = s.first().map_or(0, |row| row.split_whitespace().count());
    if cols == 0 {
        return Err(Error::InvalidDimensions { rows: s.len(), cols });
    }

    let mut values = Vec::with_capacity(s.len() * cols);
    for (r, row_str) in s.iter().enumerate() {
        let start = values.len();
        for (c, token) in row_str.split_whitespace().enumerate() {
            let value = match token {
                "." => 0,
                _ => token.parse::<u32>().map_err(|_| Error::Parse {
                    row: r,
                    message: format!("unrecognized token '{}' at col {}", token, c),
                })?,
            };
            values.push(value);
        }
        let found = values.len() - start;
        if found != cols {
            return Err(Error::Parse {
                row: r,
                message: format!("expected {} cells, found {}", cols, found),
            });
        }
    }

    Board::from_values(s.len(), cols, &values)
}
