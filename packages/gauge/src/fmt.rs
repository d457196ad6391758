//! Display width of rendered text

use unicode_width::UnicodeWidthChar as _;

/// Display width of a string in terminal cells.
///
/// ANSI escape sequences count as zero width, so colored decorator output
/// is measured the same as its plain text.
pub fn display_width(s: &str) -> usize {
    let mut escaping = false;
    s.chars().fold(0, |width, c| {
        if escaping {
            escaping = !ends_escape(c);
            width
        } else if c == '\x1b' {
            escaping = true;
            width
        } else {
            width + c.width_cjk().unwrap_or(0)
        }
    })
}

/// Final byte of the SGR and cursor sequences decorators emit
fn ends_escape(c: char) -> bool {
    matches!(c, 'A'..='H' | 'J' | 'K' | 'S' | 'T' | 'f' | 'h' | 'i' | 'l' | 'm' | 'n')
}
