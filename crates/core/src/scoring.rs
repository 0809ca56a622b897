//! Scoring module - line clear points
//!
//! Within one lock event the first cleared row is worth 1 point and every
//! further row is worth twice the previous one: 1, 3, 7, 15 for 1-4 rows.

/// Points for clearing `rows_cleared` rows in a single lock event.
pub fn line_clear_points(rows_cleared: usize) -> u32 {
    let mut points: u32 = 0;
    let mut row_value: u32 = 1;
    for _ in 0..rows_cleared {
        points = points.saturating_add(row_value);
        row_value = row_value.saturating_mul(2);
    }
    points
}
