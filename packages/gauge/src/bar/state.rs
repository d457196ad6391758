use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bar::{Estimater, Spinner, Statistics, WidthSlot};

/// A decorator renders a piece of text before or after the bar body.
///
/// It receives the statistics snapshot of the frame, the width its column
/// should converge on, and the slot to publish the width it actually used.
pub type Decorator = Arc<dyn Fn(&Statistics, usize, &WidthSlot) -> String + Send + Sync>;

/// The 5 glyphs used to draw the bar body: left cap, fill, tip, empty, right cap.
///
/// ```rust
/// let format: gauge::BarFormat = "[=>-]".parse().unwrap();
/// assert_eq!(format, gauge::BarFormat::default());
/// assert!("[=>]".parse::<gauge::BarFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarFormat {
    pub left: char,
    pub fill: char,
    pub tip: char,
    pub empty: char,
    pub right: char,
}

impl Default for BarFormat {
    fn default() -> Self {
        Self {
            left: '[',
            fill: '=',
            tip: '>',
            empty: '-',
            right: ']',
        }
    }
}

impl FromStr for BarFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        let [left, fill, tip, empty, right] = chars[..] else {
            crate::bail!(
                "bar format needs exactly 5 characters (left, fill, tip, empty, right), got {}: {s:?}",
                chars.len()
            );
        };
        Ok(Self {
            left,
            fill,
            tip,
            empty,
            right,
        })
    }
}

impl fmt::Display for BarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.left, self.fill, self.tip, self.empty, self.right
        )
    }
}

/// Secondary fill boundary, drawn with its own glyph from the start of the
/// bar up to `till`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refill {
    pub glyph: char,
    pub till: i64,
}

/// Internal state of a bar, owned by its actor
///
/// Copies are handed out for rendering, the actor's own copy is the only
/// one ever mutated.
#[derive(Clone)]
pub(crate) struct State {
    pub id: usize,
    /// Fallback render width
    pub width: usize,
    pub format: BarFormat,
    /// `<= 0` means unknown (spinner mode)
    pub total: i64,
    pub current: i64,
    pub trim_left_space: bool,
    pub trim_right_space: bool,
    pub completed: bool,
    pub aborted: bool,
    pub start_time: Option<Instant>,
    pub time_elapsed: Duration,
    pub eta: Estimater,
    pub prepend_funcs: Vec<Decorator>,
    pub append_funcs: Vec<Decorator>,
    /// Only present if the total was unknown at construction
    pub spinner: Option<Spinner>,
    pub refill: Option<Refill>,
}

impl State {
    pub fn new(id: usize, total: i64) -> Self {
        Self {
            id,
            width: crate::bar::DEFAULT_WIDTH,
            format: BarFormat::default(),
            total,
            current: 0,
            trim_left_space: false,
            trim_right_space: false,
            completed: false,
            aborted: false,
            start_time: None,
            time_elapsed: Duration::ZERO,
            eta: Estimater::default(),
            prepend_funcs: vec![],
            append_funcs: vec![],
            spinner: (total <= 0).then(Spinner::default),
            refill: None,
        }
    }

    /// Add `amount` to the progress, as observed at `now`
    pub fn increment(&mut self, amount: i64, now: Instant) {
        if amount < 1 || self.completed {
            return;
        }
        let start = match self.start_time {
            Some(start) => start,
            None => {
                self.start_time = Some(now);
                self.eta.start_block(now);
                now
            }
        };
        let sum = self.current.saturating_add(amount);
        self.time_elapsed = now.saturating_duration_since(start);
        self.eta.update(now, amount);
        if self.total > 0 && sum >= self.total {
            self.current = self.total;
            self.completed = true;
            return;
        }
        self.current = sum;
        self.eta.start_block(now);
    }

    pub fn resume_fill(&mut self, glyph: char, till: i64) {
        if till < 1 {
            return;
        }
        self.refill = Some(Refill { glyph, till });
    }
}
