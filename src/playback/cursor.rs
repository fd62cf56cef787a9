//! Playback cursor: how much of the loaded trajectory has been revealed.

/// Index in `[0, len]`; samples `[0, position)` are revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    position: usize,
    len: usize,
}

impl PlaybackCursor {
    /// Cursor over `len` samples with nothing revealed.
    pub fn start(len: usize) -> Self {
        Self { position: 0, len }
    }

    /// Cursor over `len` samples with everything revealed.
    pub fn end(len: usize) -> Self {
        Self { position: len, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn at_end(&self) -> bool {
        self.position == self.len
    }

    /// Move forward by `step` samples, stopping at the end.
    pub fn advance(&mut self, step: usize) {
        self.position = self.position.saturating_add(step).min(self.len);
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.len;
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_clamps_to_len() {
        let mut cursor = PlaybackCursor::start(5);
        cursor.advance(2);
        assert_eq!(cursor.position(), 2);
        cursor.advance(10);
        assert_eq!(cursor.position(), 5);
        assert!(cursor.at_end());
        cursor.advance(usize::MAX);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_start_end_and_rewind() {
        let mut cursor = PlaybackCursor::end(3);
        assert!(cursor.at_end());
        cursor.rewind();
        assert_eq!(cursor.position(), 0);
        cursor.jump_to_end();
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_empty_cursor_is_always_at_end() {
        let mut cursor = PlaybackCursor::start(0);
        assert!(cursor.is_empty());
        assert!(cursor.at_end());
        cursor.advance(1);
        assert_eq!(cursor.position(), 0);
    }
}
