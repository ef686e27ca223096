/// Editing state of one text box, kept by the context between frames.
///
/// Positions are character indices: `0` is before the first character and
/// `text.chars().count()` is after the last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditState {
    pub text: String,
    pub cursor_pos: usize,
    /// Other end of the selection, when one is active.
    pub selection_anchor: Option<usize>,
}

impl TextEditState {
    pub fn new(text: &str) -> Self {
        let mut state = Self::default();
        state.set_text(text);
        state
    }

    /// Replaces the content and puts the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor_pos = self.len();
        self.selection_anchor = None;
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Ordered `(start, end)` of the active selection.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        self.selection_anchor
            .map(|anchor| (anchor.min(self.cursor_pos), anchor.max(self.cursor_pos)))
    }

    pub fn selected_text(&self) -> &str {
        match self.selection_range() {
            Some((start, end)) => {
                &self.text[char_index_to_byte(&self.text, start)..char_index_to_byte(&self.text, end)]
            }
            None => "",
        }
    }

    /// Text left of the cursor, for caret placement.
    pub fn before_cursor(&self) -> &str {
        &self.text[..char_index_to_byte(&self.text, self.cursor_pos)]
    }

    /// Removes the selected text. Returns true if there was a selection.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection_range() else {
            return false;
        };
        let range = char_index_to_byte(&self.text, start)..char_index_to_byte(&self.text, end);
        self.text.drain(range);
        self.cursor_pos = start;
        self.selection_anchor = None;
        true
    }

    /// Inserts at the cursor, replacing any selection.
    pub fn insert_text(&mut self, s: &str) {
        self.delete_selection();
        let at = char_index_to_byte(&self.text, self.cursor_pos);
        self.text.insert_str(at, s);
        self.cursor_pos += s.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() || self.cursor_pos == 0 {
            return;
        }
        self.cursor_pos -= 1;
        self.remove_char_at(self.cursor_pos);
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() || self.cursor_pos >= self.len() {
            return;
        }
        self.remove_char_at(self.cursor_pos);
    }

    pub fn move_left(&mut self, shift: bool) {
        match self.selection_range() {
            Some((start, _)) if !shift => self.collapse_to(start),
            _ => self.move_to(self.cursor_pos.saturating_sub(1), shift),
        }
    }

    pub fn move_right(&mut self, shift: bool) {
        match self.selection_range() {
            Some((_, end)) if !shift => self.collapse_to(end),
            _ => self.move_to((self.cursor_pos + 1).min(self.len()), shift),
        }
    }

    pub fn move_home(&mut self, shift: bool) {
        self.move_to(0, shift);
    }

    pub fn move_end(&mut self, shift: bool) {
        self.move_to(self.len(), shift);
    }

    pub fn select_all(&mut self) {
        if !self.is_empty() {
            self.selection_anchor = Some(0);
            self.cursor_pos = self.len();
        }
    }

    fn remove_char_at(&mut self, pos: usize) {
        let from = char_index_to_byte(&self.text, pos);
        let to = char_index_to_byte(&self.text, pos + 1);
        self.text.drain(from..to);
    }

    fn collapse_to(&mut self, pos: usize) {
        self.cursor_pos = pos;
        self.selection_anchor = None;
    }

    /// Moves the cursor, growing the selection when `shift` is held.
    fn move_to(&mut self, pos: usize, shift: bool) {
        if shift {
            let anchor = self.selection_anchor.unwrap_or(self.cursor_pos);
            self.cursor_pos = pos;
            self.selection_anchor = (anchor != pos).then_some(anchor);
        } else {
            self.collapse_to(pos);
        }
    }
}

/// Byte offset of the `char_idx`-th character, clamped to the end of `s`.
pub fn char_index_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte_pos, _)| byte_pos)
        .unwrap_or(s.len())
}
