//! TUI state: the input line and loop flags.
//!
//! The transcript itself lives in the [`SessionStore`](empower_application::SessionStore);
//! this is only what the terminal front end owns.

#[derive(Debug, Default)]
pub struct TuiState {
    /// Text being composed
    pub input: String,
    /// Byte offset of the cursor within `input`
    pub cursor_pos: usize,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            let prev_char_len = self.input[..self.cursor_pos]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.input.remove(self.cursor_pos - prev_char_len);
            self.cursor_pos -= prev_char_len;
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(c) = self.input[..self.cursor_pos].chars().next_back() {
            self.cursor_pos -= c.len_utf8();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(c) = self.input[self.cursor_pos..].chars().next() {
            self.cursor_pos += c.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.input.len();
    }

    /// Take the input buffer contents and clear it
    pub fn take_input(&mut self) -> String {
        self.cursor_pos = 0;
        std::mem::take(&mut self.input)
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Send is enabled only for non-blank input while no turn is in flight.
    pub fn can_send(&self, pending: bool) -> bool {
        !pending && !self.input.trim().is_empty()
    }
}
