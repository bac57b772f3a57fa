//! Grid dimensions and color-code-aware text measurement.

/// Number of character rows on the OSD grid (rows 0–17).
pub const OSD_ROWS: u8 = 18;

/// Number of character columns on the OSD grid (columns 0–49).
pub const OSD_COLS: u8 = 50;

/// Visible length of OSD text, excluding embedded color-control codes.
///
/// Single lowercase letters are color codes (`w` white, `x` reset, `r` red,
/// …) and consume no screen cell. Visible text is uppercase letters, digits,
/// spaces, and punctuation.
pub fn visible_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_ascii_lowercase()).count()
}

/// Clamp a row index onto the grid.
pub fn clamp_row(row: u8) -> u8 {
    row.min(OSD_ROWS - 1)
}

/// Clamp a column index onto the grid.
pub fn clamp_col(col: u8) -> u8 {
    col.min(OSD_COLS - 1)
}

/// Clip text to the grid width.
///
/// The transport refuses payloads longer than one row, so overlong messages
/// are truncated rather than rejected. Counts raw characters: color codes
/// still travel over the wire even though they render zero-width.
pub fn clip(text: &str) -> &str {
    match text.char_indices().nth(OSD_COLS as usize) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
