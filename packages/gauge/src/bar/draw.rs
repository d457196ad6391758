use std::panic::{self, AssertUnwindSafe};

use crate::bar::{BarFormat, Decorator, Refill, State, Statistics, WidthSync};
use crate::fmt::display_width;

/// Map `current / total` onto `[0, ratio]`.
///
/// Rounds up, unless the fractional remainder is small (the distance to
/// the next integer is at least `0.6`), in which case it rounds down.
/// Returns 0 if the total is not positive or `current` is out of range.
///
/// ```rust
/// assert_eq!(gauge::percentage(100, 50, 10), 5);
/// assert_eq!(gauge::percentage(100, 1, 10), 0);
/// assert_eq!(gauge::percentage(100, 45, 10), 5);
/// ```
pub fn percentage(total: i64, current: i64, ratio: usize) -> usize {
    if total <= 0 || current < 0 || current > total {
        return 0;
    }
    let num = ratio as f64 * current as f64 / total as f64;
    let ceil = num.ceil();
    // num = 2.34 will return 2
    // num = 2.44 will return 3
    if ceil - num >= 0.6 {
        num as usize
    } else {
        ceil as usize
    }
}

/// Draw the body of a bar with a known total, `width` cells including the caps.
///
/// Returns an empty string if `width < 2` or the total is not positive.
pub fn fill_bar(
    total: i64,
    current: i64,
    width: usize,
    format: &BarFormat,
    refill: Option<&Refill>,
) -> String {
    if width < 2 || total <= 0 {
        return String::new();
    }
    // bar width without the caps
    let bar_width = width - 2;
    let filled = percentage(total, current, bar_width);
    let (refill_glyph, refilled) = match refill {
        Some(rf) => (rf.glyph, percentage(total, rf.till, bar_width).min(filled)),
        None => (format.fill, 0),
    };

    let mut out = String::with_capacity(width);
    out.push(format.left);
    for i in 0..filled {
        if i + 1 == filled && filled < bar_width {
            out.push(format.tip);
        } else if i < refilled {
            out.push(refill_glyph);
        } else {
            out.push(format.fill);
        }
    }
    for _ in filled..bar_width {
        out.push(format.empty);
    }
    out.push(format.right);
    out
}

/// Draw one line of the bar, without the line terminator.
///
/// Returns an empty string if the number of decorators on either side does
/// not match the columns of the width sync.
pub(crate) fn draw(
    state: &State,
    term_width: usize,
    prepend: &WidthSync,
    append: &WidthSync,
) -> String {
    if state.prepend_funcs.len() != prepend.columns()
        || state.append_funcs.len() != append.columns()
    {
        return String::new();
    }
    let term_width = if term_width == 0 {
        state.width
    } else {
        term_width
    };

    let stats = Statistics::from(state);
    let prepend_block = run_decorators(&state.prepend_funcs, &stats, prepend);
    let append_block = run_decorators(&state.append_funcs, &stats, append);
    let mut prepend_count = display_width(&prepend_block);
    let mut append_count = display_width(&append_block);
    if !state.trim_left_space {
        prepend_count += 1;
    }
    if !state.trim_right_space {
        append_count += 1;
    }

    let bar_block = match &state.spinner {
        Some(spinner) => {
            let mut out = String::with_capacity(3);
            out.push(state.format.left);
            out.push(spinner.glyph());
            out.push(state.format.right);
            out
        }
        None => {
            let refill = state.refill.as_ref();
            let bar = fill_bar(state.total, state.current, state.width, &state.format, refill);
            let bar_count = bar.chars().count();
            if prepend_count + bar_count + append_count > term_width {
                // decorators are never truncated, only the bar shrinks
                let width = term_width.saturating_sub(prepend_count + append_count);
                fill_bar(state.total, state.current, width, &state.format, refill)
            } else {
                bar
            }
        }
    };

    let mut out = String::with_capacity(prepend_block.len() + bar_block.len() + append_block.len() + 2);
    out.push_str(&prepend_block);
    if !state.trim_left_space {
        out.push(' ');
    }
    out.push_str(&bar_block);
    if !state.trim_right_space {
        out.push(' ');
    }
    out.push_str(&append_block);
    out
}

fn run_decorators(funcs: &[Decorator], stats: &Statistics, sync: &WidthSync) -> String {
    let mut out = String::new();
    for (i, f) in funcs.iter().enumerate() {
        // column count is checked by the caller
        let Some(column) = sync.column(i) else {
            break;
        };
        out.push_str(&f(stats, column.constraint(), column));
    }
    out
}

/// Draw the line followed by a line terminator.
///
/// A panic inside a decorator is caught here and the panic message is
/// rendered as the line instead.
pub(crate) fn render_line(
    state: &State,
    term_width: usize,
    prepend: &WidthSync,
    append: &WidthSync,
) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| draw(state, term_width, prepend, append))) {
        Ok(mut line) => {
            line.push('\n');
            line
        }
        Err(payload) => {
            let info = crate::best_effort_panic_info(&payload);
            crate::warn!("bar {}: decorator panicked: {info}", state.id);
            let mut line = info.lines().collect::<Vec<_>>().join(" ");
            line.push('\n');
            line
        }
    }
}
