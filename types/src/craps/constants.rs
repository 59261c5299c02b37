/// Point numbers, in the order used to index per-point state.
pub const POINTS: [u8; 6] = [4, 5, 6, 8, 9, 10];

/// Numbers that can be rolled "hard" for a hardway bet.
pub const HARDWAY_NUMBERS: [u8; 4] = [4, 6, 8, 10];

/// Totals covered by the Small bet.
pub const SMALL_TOTALS: [u8; 5] = [2, 3, 4, 5, 6];

/// Totals covered by the Tall bet.
pub const TALL_TOTALS: [u8; 5] = [8, 9, 10, 11, 12];

/// Lowest and highest two-dice totals.
pub const MIN_TOTAL: u8 = 2;
pub const MAX_TOTAL: u8 = 12;

/// Number of distinct two-dice totals (2..=12).
pub const TOTALS: usize = 11;

/// Multiplier basis: 100 hundredths of stake is 1:1.
pub const MULTIPLIER_BASIS: u64 = 100;

/// Upper bound on settlements carried by a single roll report.
pub const MAX_SETTLEMENTS_PER_ROLL: usize = 256;

/// Number of ways to roll each total with 2d6.
pub const WAYS: [u8; 13] = [0, 0, 1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];
//                          0  1  2  3  4  5  6  7  8  9 10 11 12

/// Returns true if `n` is one of 4, 5, 6, 8, 9, 10.
pub fn is_point(n: u8) -> bool {
    matches!(n, 4 | 5 | 6 | 8 | 9 | 10)
}

/// Returns true for the totals a number bet can name (2..=12 except 7).
pub fn is_box_number(n: u8) -> bool {
    (MIN_TOTAL..=MAX_TOTAL).contains(&n) && n != 7
}

/// Index of a point number within [POINTS].
pub fn point_index(point: u8) -> Option<usize> {
    POINTS.iter().position(|&p| p == point)
}

/// Index of a total within a `[_; TOTALS]` array.
pub fn total_index(total: u8) -> Option<usize> {
    if (MIN_TOTAL..=MAX_TOTAL).contains(&total) {
        Some((total - MIN_TOTAL) as usize)
    } else {
        None
    }
}
