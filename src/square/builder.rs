use crate::square::date::DateQuadruple;

/// A 4x4 date-echo magic square.
///
/// Invariants (hold for every value returned by [`build`]):
/// - row 0 is `[A, B, C, D]`
/// - every row, column and both main diagonals sum to [`MagicGrid::magic_constant`]
/// - every cell is non-negative (enforced by the `u32` cell type)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MagicGrid {
    cells: [[u32; 4]; 4],
    magic_constant: u64,
    offset: i8,
}

impl MagicGrid {
    /// Row-major cells.
    pub fn cells(&self) -> &[[u32; 4]; 4] {
        &self.cells
    }

    /// Common sum of every row, column and diagonal (`A + B + C + D`).
    pub fn magic_constant(&self) -> u64 {
        self.magic_constant
    }

    /// Template offset `k` that produced this grid (`1`, `-1` or `0`).
    pub fn offset(&self) -> i8 {
        self.offset
    }

    /// The four rows.
    pub fn rows(&self) -> [[u32; 4]; 4] {
        self.cells
    }

    /// The four columns, top to bottom.
    pub fn columns(&self) -> [[u32; 4]; 4] {
        let c = &self.cells;
        std::array::from_fn(|col| std::array::from_fn(|row| c[row][col]))
    }

    /// Main diagonal (top-left to bottom-right) then anti-diagonal (top-right to bottom-left).
    pub fn diagonals(&self) -> [[u32; 4]; 2] {
        let c = &self.cells;
        [
            std::array::from_fn(|i| c[i][i]),
            std::array::from_fn(|i| c[i][3 - i]),
        ]
    }

    /// Re-check the magic property against the stored constant.
    pub fn is_magic(&self) -> bool {
        let sum = |line: &[u32; 4]| line.iter().map(|&v| u64::from(v)).sum::<u64>();
        self.rows()
            .iter()
            .chain(self.columns().iter())
            .chain(self.diagonals().iter())
            .all(|line| sum(line) == self.magic_constant)
    }
}

/// Offsets tried in order; `0` always succeeds for non-negative inputs.
const OFFSET_ORDER: [i8; 2] = [1, -1];

/// Build the date-echo square for `(A, B, C, D)`.
///
/// The fixed linear template below keeps every row, column and diagonal at `A+B+C+D` for any `k`.
/// `k = 1` is tried first, then `k = -1`; the first candidate without negative cells wins. `k = 0`
/// is the fallback: it only permutes the inputs, so it is non-negative but repeats values.
pub fn build(a: u32, b: u32, c: u32, d: u32) -> MagicGrid {
    let magic_constant = u64::from(a) + u64::from(b) + u64::from(c) + u64::from(d);

    for k in OFFSET_ORDER {
        if let Some(cells) = candidate(a, b, c, d, i64::from(k)) {
            return MagicGrid {
                cells,
                magic_constant,
                offset: k,
            };
        }
    }

    MagicGrid {
        cells: [[a, b, c, d], [d, c, b, a], [b, a, d, c], [c, d, a, b]],
        magic_constant,
        offset: 0,
    }
}

/// [`build`] from a parsed date.
pub fn build_from_date(q: DateQuadruple) -> MagicGrid {
    build(q.day, q.month, q.century, q.year_in_century)
}

fn candidate(a: u32, b: u32, c: u32, d: u32, k: i64) -> Option<[[u32; 4]; 4]> {
    let (a, b, c, d) = (i64::from(a), i64::from(b), i64::from(c), i64::from(d));
    let template: [[i64; 4]; 4] = [
        [a, b, c, d],
        [d + k, c - k, b - 3 * k, a + 3 * k],
        [b - 2 * k, a + 2 * k, d + 2 * k, c - 2 * k],
        [c + k, d - k, a + k, b - k],
    ];

    let mut out = [[0u32; 4]; 4];
    for (row_out, row) in out.iter_mut().zip(template.iter()) {
        for (cell_out, &v) in row_out.iter_mut().zip(row.iter()) {
            *cell_out = u32::try_from(v).ok()?;
        }
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/square/builder.rs"]
mod tests;
