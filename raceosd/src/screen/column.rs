//! Alignment → start-column calculation.

use serde::{Deserialize, Serialize};

use super::text::{clamp_col, visible_len, OSD_COLS};

/// Horizontal alignment of an OSD element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Parse from a stored option string. Unknown values fall back to
    /// `Center`, matching the legacy behavior of treating bad alignment
    /// strings as the screen-centered default.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        };
        f.write_str(s)
    }
}

/// Compute the start column for `text` on the OSD grid.
///
/// An explicit non-zero `custom_col` wins for every alignment and is used
/// verbatim (clamped to the grid). Otherwise the column derives from the
/// alignment and the *visible* length of the text: color codes take no
/// screen cells, so they are excluded from the measurement even though the
/// raw string (codes included) is what gets transmitted.
///
/// A `custom_col` of zero is treated as unset for backward compatibility
/// with stored configurations that used zero as the "no override" sentinel.
pub fn column(alignment: Alignment, custom_col: Option<u8>, text: &str) -> u8 {
    if let Some(col) = custom_col {
        if col > 0 {
            return clamp_col(col);
        }
    }

    let len = visible_len(text) as i32;
    let col = match alignment {
        Alignment::Left => 0,
        Alignment::Center => i32::from(OSD_COLS) / 2 - len / 2,
        Alignment::Right => i32::from(OSD_COLS) - 1 - len,
    };
    clamp_col(col.clamp(0, i32::from(OSD_COLS) - 1) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_defaults_to_column_zero() {
        assert_eq!(column(Alignment::Left, None, "LAP: 4"), 0);
        assert_eq!(column(Alignment::Left, Some(0), "LAP: 4"), 0);
    }

    #[test]
    fn test_right_alignment_from_visible_length() {
        assert_eq!(column(Alignment::Right, None, "GO!"), 46);
    }

    #[test]
    fn test_right_alignment_ignores_color_codes() {
        // "x" is a color code: visible length is 3, not 4.
        assert_eq!(column(Alignment::Right, None, "xGO!"), 46);
    }

    #[test]
    fn test_center_alignment() {
        assert_eq!(column(Alignment::Center, None, "GO!"), 24);
        assert_eq!(column(Alignment::Center, None, "w ARM NOW x"), 21);
    }

    #[test]
    fn test_custom_col_wins_for_every_alignment() {
        assert_eq!(column(Alignment::Left, Some(7), "GO!"), 7);
        assert_eq!(column(Alignment::Center, Some(7), "GO!"), 7);
        assert_eq!(column(Alignment::Right, Some(7), "GO!"), 7);
    }

    #[test]
    fn test_custom_col_clamped_to_grid() {
        assert_eq!(column(Alignment::Left, Some(120), "GO!"), 49);
    }

    #[test]
    fn test_overlong_text_clamps_to_zero() {
        let long: String = "A".repeat(60);
        assert_eq!(column(Alignment::Right, None, &long), 0);
        assert_eq!(column(Alignment::Center, None, &long), 0);
    }

    #[test]
    fn test_alignment_parse_lenient() {
        assert_eq!(Alignment::parse_lenient("right"), Some(Alignment::Right));
        assert_eq!(Alignment::parse_lenient(" CENTER "), Some(Alignment::Center));
        assert_eq!(Alignment::parse_lenient("middle"), None);
    }
}
