//! Board generation.
//!
//! A board always holds an even number of real tiles. When `rows * cols` is
//! odd the last cell becomes a permanent placeholder. Values are drawn in
//! pairs from a small range so several pairs usually share a symbol, which
//! keeps generated boards easy to clear.
//!
//! Randomness comes from the caller as any `rand::Rng`, so tests and replays
//! can pass a seeded generator.
use crate::engine::Board;
use crate::error::{Error, Result};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// Number of cells that receive a real tile on a `rows x cols` board.
pub fn playable_cells(rows: usize, cols: usize) -> usize {
    let total = rows * cols;
    total - total % 2
}

/// Range the distinct-value budget `D` is drawn from for `total_pairs` pairs:
/// `[ceil(total_pairs / 2), floor(3 * total_pairs / 4) + 1]`.
///
/// # Examples
/// ```
/// use tile_connect::generator::value_budget_range;
/// assert_eq!(value_budget_range(18), 9..=14);
/// assert_eq!(value_budget_range(1), 1..=1);
/// ```
pub fn value_budget_range(total_pairs: usize) -> RangeInclusive<usize> {
    let min = (total_pairs + 1) / 2;
    let max = 3 * total_pairs / 4 + 1;
    min..=max
}

/// Draws `total_pairs` values and emits each one twice, unshuffled.
pub fn pair_values<R: Rng + ?Sized>(total_pairs: usize, rng: &mut R) -> Vec<u32> {
    let mut values = Vec::with_capacity(total_pairs * 2);
    if total_pairs == 0 {
        return values;
    }
    let budget = rng.gen_range(value_budget_range(total_pairs)) as u32;
    for _ in 0..total_pairs {
        let value = rng.gen_range(1..=budget);
        values.push(value);
        values.push(value);
    }
    values
}

/// Generates a `rows x cols` board.
///
/// With `values_override` the given sequence is shuffled and laid out
/// as-is; no values are drawn. Without it, values come from [`pair_values`].
/// Either way the sequence is shuffled (Fisher–Yates) and laid row-major,
/// real tiles getting `id = row * cols + col`.
///
/// # Errors
/// * `Error::InvalidDimensions` if `rows` or `cols` is zero.
/// * `Error::OverrideLength` if the override does not have exactly
///   [`playable_cells`] entries.
/// * `Error::ReservedValue` if the override contains `0`.
///
/// # Examples
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use tile_connect::generator::generate;
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let board = generate(3, 3, None, &mut rng).unwrap();
/// assert_eq!(board.visible_count(), 8);
/// ```
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    values_override: Option<&[u32]>,
    rng: &mut R,
) -> Result<Board> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions { rows, cols });
    }
    let total = playable_cells(rows, cols);

    let mut values = match values_override {
        Some(values) => {
            if values.len() != total {
                return Err(Error::OverrideLength {
                    expected: total,
                    found: values.len(),
                });
            }
            if let Some(index) = values.iter().position(|&v| v == 0) {
                return Err(Error::ReservedValue { index });
            }
            values.to_vec()
        }
        None => pair_values(total / 2, rng),
    };
    values.shuffle(rng);

    debug!(
        "generated {}x{} board with {} tiles",
        rows,
        cols,
        values.len()
    );
    Board::from_values(rows, cols, &values)
}
