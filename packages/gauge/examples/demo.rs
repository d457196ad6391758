use std::io::Write as _;
use std::time::Duration;

use clap::Parser;
use gauge::{Bar, CompletionCounter, Context as _, Signal, Statistics, WidthSlot, WidthSync};

#[derive(Parser)]
struct Args {
    /// Total steps of the first bar, each next bar has more
    #[clap(short, long, default_value_t = 100)]
    total: i64,
    /// Number of bars with a known total
    #[clap(short, long, default_value_t = 3)]
    bars: usize,
    /// Also show a bar with an unknown total
    #[clap(short, long)]
    unknown: bool,
    /// Width used when the terminal size cannot be detected
    #[clap(short, long, default_value_t = gauge::DEFAULT_WIDTH)]
    width: usize,
}

/// Run with cargo run --example demo -- --unknown
fn main() -> gauge::Result<()> {
    gauge::log_init("info");
    let args = Args::parse();

    let cancel = Signal::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.signal();
        })
        .context("failed to set ctrl-c handler")?;
    }

    let counter = CompletionCounter::new();
    let mut bars = vec![];
    for i in 0..args.bars {
        let total = args.total * (i as i64 + 1);
        bars.push((total, spawn_bar(total, &args, &cancel, &counter)));
    }
    if args.unknown {
        bars.push((0, spawn_bar(0, &args, &cancel, &counter)));
    }

    let producers: Vec<_> = bars
        .iter()
        .enumerate()
        .map(|(i, (total, bar))| {
            let bar = bar.clone();
            let steps = if *total > 0 { *total } else { args.total };
            let unknown = *total <= 0;
            std::thread::spawn(move || produce(bar, steps, unknown, 20 + 10 * i as u64))
        })
        .collect();

    let prepend = WidthSync::new(1);
    let append = WidthSync::new(1);
    let mut stdout = std::io::stdout();
    let mut lines_drawn = 0;
    loop {
        let width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(0);
        let flushed = Signal::new();
        let mut frame = String::new();
        if lines_drawn > 0 {
            frame.push_str(&format!("\x1b[{lines_drawn}A"));
        }
        for (_, bar) in &bars {
            frame.push_str("\x1b[2K");
            frame.push_str(&bar.render(width, &flushed, &prepend, &append));
        }
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
        flushed.signal();
        lines_drawn = bars.len();
        prepend.converge();
        append.converge();
        if counter.count() == 0 {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    for producer in producers {
        if let Err(e) = producer.join() {
            gauge::error!("producer panicked: {}", gauge::best_effort_panic_info(&e));
        }
    }
    if cancel.signaled() {
        gauge::warn!("cancelled");
    } else {
        gauge::info!("all {} bars finished", bars.len());
    }
    Ok(())
}

fn spawn_bar(total: i64, args: &Args, cancel: &Signal, counter: &CompletionCounter) -> Bar {
    gauge::bar(total)
        .width(args.width)
        .cancel(cancel)
        .counter(counter)
        .prepend(count_column)
        .append(eta_column)
        .spawn()
}

fn produce(bar: Bar, steps: i64, unknown: bool, delay_ms: u64) {
    for _ in 0..steps {
        if !bar.in_progress() {
            return;
        }
        bar.increment(1);
        std::thread::sleep(Duration::from_millis(delay_ms));
    }
    if unknown {
        bar.complete();
    }
}

fn count_column(stats: &Statistics, width: usize, slot: &WidthSlot) -> String {
    let text = if stats.total > 0 {
        format!("{}/{}", stats.current, stats.total)
    } else {
        stats.current.to_string()
    };
    slot.publish(gauge::display_width(&text));
    format!("{text:>width$}")
}

fn eta_column(stats: &Statistics, width: usize, slot: &WidthSlot) -> String {
    let text = if stats.aborted {
        "\x1b[93maborted\x1b[0m".to_string()
    } else if stats.completed {
        format!("\x1b[92mdone\x1b[0m in {:.1}s", stats.time_elapsed.as_secs_f64())
    } else if stats.total > 0 {
        let percent = gauge::percentage(stats.total, stats.current, 100);
        format!("{percent:>3}% ETA {:.1}s", stats.eta().as_secs_f64())
    } else {
        format!("{:.1}s", stats.time_elapsed.as_secs_f64())
    };
    let used = gauge::display_width(&text);
    slot.publish(used);
    let pad = width.saturating_sub(used);
    format!("{text}{:pad$}", "")
}
