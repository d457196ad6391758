const GLYPHS: [char; 4] = ['-', '\\', '|', '/'];

/// Cursor over the spinner glyphs, used when the total is unknown.
///
/// The cursor is only advanced by the actor when it takes a render snapshot,
/// so every render shows the glyph captured at its own snapshot.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    cursor: usize,
}

impl Spinner {
    /// The glyph to display for the current frame
    #[inline(always)]
    pub fn glyph(&self) -> char {
        GLYPHS[self.cursor]
    }

    /// Move to the next glyph, wrapping after the last one
    #[inline(always)]
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % GLYPHS.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let mut spinner = Spinner::default();
        let mut seen = String::new();
        for _ in 0..5 {
            seen.push(spinner.glyph());
            spinner.advance();
        }
        assert_eq!(seen, r"-\|/-");
    }
}
