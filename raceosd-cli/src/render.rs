//! Terminal rendering of pilot OSD screens.
//!
//! Keeps a character grid per pilot, mirroring what the display hardware
//! would hold, and reprints a pilot's framed screen whenever the engine
//! commits a batch. This is the CLI's stand-in for the real video-link
//! transport.

use std::collections::HashMap;
use std::sync::Mutex;

use raceosd::engine::OsdTransport;
use raceosd::screen::{OSD_COLS, OSD_ROWS};
use raceosd::{PilotId, TextLine};

/// One pilot's 18×50 character grid.
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    cells: [[char; OSD_COLS as usize]; OSD_ROWS as usize],
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self {
            cells: [[' '; OSD_COLS as usize]; OSD_ROWS as usize],
        }
    }
}

impl ScreenBuffer {
    /// Write a line into the grid. Color codes are dropped here the way the
    /// goggles drop them: they travel in the text but render zero-width.
    pub fn put(&mut self, line: &TextLine) {
        let row = line.row.min(OSD_ROWS - 1) as usize;
        let mut col = line.col as usize;
        for ch in line.text.chars() {
            if ch.is_ascii_lowercase() {
                continue;
            }
            if col >= OSD_COLS as usize {
                break;
            }
            self.cells[row][col] = ch;
            col += 1;
        }
    }

    pub fn clear_row(&mut self, row: u8) {
        let row = row.min(OSD_ROWS - 1) as usize;
        self.cells[row] = [' '; OSD_COLS as usize];
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Render the grid inside a frame.
    pub fn render(&self, title: &str) -> String {
        let mut out = String::with_capacity((OSD_ROWS as usize + 2) * (OSD_COLS as usize + 3));
        out.push_str(&format!("+-[ {} ]{}+\n", title, "-".repeat(
            (OSD_COLS as usize).saturating_sub(title.len() + 5),
        )));
        for row in &self.cells {
            out.push('|');
            out.extend(row.iter());
            out.push_str("|\n");
        }
        out.push_str(&format!("+{}+", "-".repeat(OSD_COLS as usize)));
        out
    }
}

/// Transport that maintains per-pilot screen buffers and prints each screen
/// as its batches commit.
pub struct TermTransport {
    screens: Mutex<HashMap<PilotId, ScreenBuffer>>,
    titles: HashMap<PilotId, String>,
    /// Suppress printing (used by preview, which renders explicitly).
    quiet: bool,
}

impl TermTransport {
    pub fn new(titles: HashMap<PilotId, String>, quiet: bool) -> Self {
        Self {
            screens: Mutex::new(HashMap::new()),
            titles,
            quiet,
        }
    }

    fn title(&self, pilot: PilotId) -> String {
        self.titles
            .get(&pilot)
            .cloned()
            .unwrap_or_else(|| pilot.to_string())
    }

    /// Render one pilot's current screen.
    pub fn render(&self, pilot: PilotId) -> String {
        let screens = self.screens.lock().unwrap();
        let buffer = screens.get(&pilot).cloned().unwrap_or_default();
        buffer.render(&self.title(pilot))
    }
}

impl OsdTransport for TermTransport {
    fn send_line(&self, pilot: PilotId, line: &TextLine) {
        self.screens
            .lock()
            .unwrap()
            .entry(pilot)
            .or_default()
            .put(line);
    }

    fn clear_row(&self, pilot: PilotId, row: u8) {
        self.screens
            .lock()
            .unwrap()
            .entry(pilot)
            .or_default()
            .clear_row(row);
    }

    fn clear_screen(&self, pilot: PilotId) {
        self.screens
            .lock()
            .unwrap()
            .entry(pilot)
            .or_default()
            .clear();
    }

    fn display(&self, pilot: PilotId) {
        if !self.quiet {
            println!("{}\n", self.render(pilot));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_skips_color_codes() {
        let mut buffer = ScreenBuffer::default();
        buffer.put(&TextLine::new(5, 21, "w ARM NOW x"));
        let rendered = buffer.render("TEST");
        assert!(rendered.contains(" ARM NOW "));
        assert!(!rendered.contains("w ARM NOW"));
    }

    #[test]
    fn test_clear_row_only_touches_that_row() {
        let mut buffer = ScreenBuffer::default();
        buffer.put(&TextLine::new(2, 0, "HEAT 1"));
        buffer.put(&TextLine::new(5, 0, "ARM NOW"));
        buffer.clear_row(5);
        let rendered = buffer.render("TEST");
        assert!(rendered.contains("HEAT 1"));
        assert!(!rendered.contains("ARM NOW"));
    }

    #[test]
    fn test_transport_tracks_batches() {
        let transport = TermTransport::new(HashMap::new(), true);
        let pilot = PilotId(1);
        transport.send_line(pilot, &TextLine::new(0, 0, "LAP: 4"));
        transport.display(pilot);
        assert!(transport.render(pilot).contains("LAP: 4"));

        transport.clear_screen(pilot);
        assert!(!transport.render(pilot).contains("LAP: 4"));
    }
}
