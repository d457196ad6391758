use std::io::Read as _;
use std::time::Duration;

use gauge::{CompletionCounter, Signal, WidthSync};

fn no_columns() -> WidthSync {
    WidthSync::new(0)
}

#[test]
fn test_increments_to_total() {
    let bar = gauge::bar(10).spawn();
    for _ in 0..3 {
        bar.increment(3);
    }
    let stats = bar.statistics();
    assert_eq!(stats.current, 9);
    assert!(!stats.completed);
    bar.increment(1);
    let stats = bar.statistics();
    assert_eq!(stats.current, 10);
    assert!(stats.completed);
    assert!(!stats.aborted);
    // no effect after completion
    bar.increment(5);
    assert_eq!(bar.statistics().current, 10);
}

#[test]
fn test_overshoot_clamps_to_total() {
    let bar = gauge::bar(10).spawn();
    bar.increment(25);
    let stats = bar.statistics();
    assert_eq!(stats.current, 10);
    assert!(stats.completed);
}

#[test]
fn test_invalid_increment_is_ignored() {
    let bar = gauge::bar(10).spawn();
    bar.increment(0);
    bar.increment(-5);
    let stats = bar.statistics();
    assert_eq!(stats.current, 0);
    assert_eq!(stats.time_elapsed, Duration::ZERO);
    assert!(stats.start_time.is_none());
}

#[test]
fn test_time_elapsed() {
    let bar = gauge::bar(10).spawn();
    bar.increment(1);
    let start = bar.statistics().start_time;
    assert!(start.is_some());
    std::thread::sleep(Duration::from_millis(50));
    bar.increment(1);
    let stats = bar.statistics();
    assert_eq!(stats.start_time, start);
    assert!(stats.time_elapsed >= Duration::from_millis(50));
    assert!(stats.time_per_item > Duration::ZERO);
    assert!(stats.eta() > Duration::ZERO);
}

#[test]
fn test_id() {
    let bar = gauge::bar(10).id(42).spawn();
    assert_eq!(bar.id(), 42);
    assert_eq!(bar.statistics().id, 42);
    let a = gauge::bar(10).spawn();
    let b = gauge::bar(10).spawn();
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_complete_twice() {
    let counter = CompletionCounter::new();
    let bar = gauge::bar(0).counter(&counter).spawn();
    let other = gauge::bar(0).counter(&counter).spawn();
    assert_eq!(counter.count(), 2);
    assert!(bar.in_progress());
    bar.complete();
    assert!(!bar.in_progress());
    bar.complete();
    bar.wait();
    bar.complete();
    assert!(bar.is_done());
    assert!(bar.statistics().completed);
    // the counter went down exactly once
    assert_eq!(counter.count(), 1);
    assert!(other.in_progress());
    other.complete();
    counter.wait();
    assert_eq!(counter.count(), 0);
}

#[test]
fn test_cancel() {
    let cancel = Signal::new();
    let counter = CompletionCounter::new();
    let bars: Vec<_> = (0..3)
        .map(|_| gauge::bar(100).cancel(&cancel).counter(&counter).spawn())
        .collect();
    bars[0].increment(10);
    assert_eq!(bars[0].statistics().current, 10);
    cancel.signal();
    counter.wait();
    for bar in &bars {
        bar.wait();
        assert!(bar.is_done());
        let stats = bar.statistics();
        assert!(stats.aborted);
        assert!(stats.completed);
    }
    assert_eq!(bars[0].statistics().current, 10);
}

#[test]
fn test_cancel_and_complete_race() {
    for _ in 0..20 {
        let cancel = Signal::new();
        let counter = CompletionCounter::new();
        let bar = gauge::bar(0).cancel(&cancel).counter(&counter).spawn();
        let keep_alive = gauge::bar(0).counter(&counter).spawn();
        let handle = {
            let bar = bar.clone();
            std::thread::spawn(move || bar.complete())
        };
        cancel.signal();
        bar.complete();
        assert!(handle.join().is_ok());
        bar.wait();
        assert_eq!(counter.count(), 1);
        keep_alive.complete();
        counter.wait();
    }
}

#[test]
fn test_cancel_while_flushing_completed_bar() {
    for _ in 0..20 {
        let cancel = Signal::new();
        let counter = CompletionCounter::new();
        let bar = gauge::bar(3).cancel(&cancel).counter(&counter).spawn();
        let keep_alive = gauge::bar(0).counter(&counter).spawn();
        bar.increment(3);
        let flushed = Signal::new();
        let none = no_columns();
        // completed, the actor now waits for the frame to be flushed
        assert!(bar.render(80, &flushed, &none, &none).starts_with(" [="));
        let handles = [cancel.clone(), flushed.clone()]
            .map(|signal| std::thread::spawn(move || signal.signal()));
        for handle in handles {
            assert!(handle.join().is_ok());
        }
        bar.wait();
        assert!(bar.is_done());
        assert_eq!(counter.count(), 1);
        let stats = bar.statistics();
        assert!(stats.completed);
        assert_eq!(stats.current, 3);
        keep_alive.complete();
        counter.wait();
        assert_eq!(counter.count(), 0);
    }
}

#[test]
fn test_accepted_updates_survive_completion() {
    for _ in 0..200 {
        let bar = gauge::bar(0).spawn();
        bar.increment(5);
        bar.complete();
        bar.wait();
        assert_eq!(bar.statistics().current, 5);
    }
    for _ in 0..50 {
        let bar = gauge::bar(10)
            .width(12)
            .append(|_, _, _| "x".to_string())
            .spawn();
        bar.increment(5);
        bar.resume_fill('+', 5);
        bar.remove_all_appenders();
        bar.complete();
        bar.wait();
        assert_eq!(bar.num_appenders(), 0);
        let flushed = Signal::new();
        let none = no_columns();
        assert_eq!(bar.render(80, &flushed, &none, &none), " [++++>-----] \n");
    }
}

#[test]
fn test_accepted_updates_survive_cancel() {
    for _ in 0..100 {
        let cancel = Signal::new();
        let bar = gauge::bar(100).cancel(&cancel).spawn();
        bar.increment(7);
        cancel.signal();
        bar.wait();
        let stats = bar.statistics();
        assert!(stats.aborted);
        assert_eq!(stats.current, 7);
    }
}

#[test]
fn test_drop_handles_completes() {
    let counter = CompletionCounter::new();
    let bar = gauge::bar(10).counter(&counter).spawn();
    bar.increment(3);
    drop(bar);
    counter.wait();
    assert_eq!(counter.count(), 0);
}

#[test]
fn test_after_termination() {
    let bar = gauge::bar(10)
        .id(7)
        .width(12)
        .append(|_, _, _| "!".to_string())
        .spawn();
    bar.increment(5);
    assert_eq!(bar.statistics().current, 5);
    bar.complete();
    bar.wait();
    // queries read the final state
    assert_eq!(bar.id(), 7);
    assert_eq!(bar.num_appenders(), 1);
    assert_eq!(bar.num_prependers(), 0);
    // updates are ignored
    bar.increment(3);
    bar.resume_fill('+', 5);
    bar.remove_all_appenders();
    let stats = bar.statistics();
    assert_eq!(stats.current, 5);
    assert!(stats.completed);
    assert_eq!(bar.num_appenders(), 1);
    let append = WidthSync::new(1);
    let flushed = Signal::new();
    // 1 + 12 + 2 does not fit in the fallback width of 12
    assert_eq!(
        bar.render(0, &flushed, &no_columns(), &append),
        " [===>---] !\n"
    );
}

#[test]
fn test_render() {
    let bar = gauge::bar(50)
        .width(12)
        .prepend(|stats, width, slot| {
            let text = format!("{}/{}", stats.current, stats.total);
            slot.publish(text.len());
            format!("{text:>width$}")
        })
        .spawn();
    let flushed = Signal::new();
    let prepend = WidthSync::new(1);
    bar.increment(25);
    assert_eq!(
        bar.render(80, &flushed, &prepend, &no_columns()),
        "25/50 [====>-----] \n"
    );
    prepend.column(0).unwrap().publish(7);
    prepend.converge();
    assert_eq!(
        bar.render(80, &flushed, &prepend, &no_columns()),
        "  25/50 [====>-----] \n"
    );
}

#[test]
fn test_render_column_mismatch() {
    let bar = gauge::bar(50).append(|_, _, _| "x".to_string()).spawn();
    let flushed = Signal::new();
    assert_eq!(bar.render(80, &flushed, &no_columns(), &no_columns()), "\n");
    bar.remove_all_appenders();
    assert_eq!(bar.num_appenders(), 0);
    assert_ne!(bar.render(80, &flushed, &no_columns(), &no_columns()), "\n");
}

#[test]
fn test_remove_all_prependers() {
    let bar = gauge::bar(50)
        .prepend(|_, _, _| "a".to_string())
        .prepend(|_, _, _| "b".to_string())
        .spawn();
    assert_eq!(bar.num_prependers(), 2);
    bar.remove_all_prependers();
    assert_eq!(bar.num_prependers(), 0);
}

#[test]
fn test_render_spinner() {
    let bar = gauge::bar(0).spawn();
    let flushed = Signal::new();
    let none = no_columns();
    let frames: Vec<_> = (0..5)
        .map(|_| bar.render(80, &flushed, &none, &none))
        .collect();
    assert_eq!(frames, [" [-] \n", " [\\] \n", " [|] \n", " [/] \n", " [-] \n"]);
    // increments don't move the spinner
    bar.increment(100);
    assert_eq!(bar.render(80, &flushed, &none, &none), " [\\] \n");
}

#[test]
fn test_render_spinner_concurrently() {
    let bar = gauge::bar(-1).spawn();
    let flushed = Signal::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let bar = bar.clone();
            let flushed = flushed.clone();
            std::thread::spawn(move || {
                let none = WidthSync::new(0);
                (0..10)
                    .map(|_| bar.render(80, &flushed, &none, &none))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut counts = [0; 4];
    for handle in handles {
        let Ok(frames) = handle.join() else {
            panic!("render thread panicked");
        };
        for frame in frames {
            let i = ["-", "\\", "|", "/"]
                .iter()
                .position(|g| frame == format!(" [{g}] \n"))
                .unwrap();
            counts[i] += 1;
        }
    }
    // every snapshot took its own glyph
    assert_eq!(counts, [10, 10, 10, 10]);
}

#[test]
fn test_resume_fill() {
    let bar = gauge::bar(50).width(12).spawn();
    let flushed = Signal::new();
    let none = no_columns();
    bar.increment(40);
    bar.resume_fill('+', 0);
    assert_eq!(bar.render(80, &flushed, &none, &none), " [=======>--] \n");
    bar.resume_fill('+', 20);
    assert_eq!(bar.render(80, &flushed, &none, &none), " [++++===>--] \n");
}

#[test]
fn test_render_decorator_panic() {
    let bar = gauge::bar(50)
        .append(|stats, _, _| {
            if stats.current > 10 {
                panic!("too far: {}", stats.current);
            }
            "ok".to_string()
        })
        .spawn();
    let flushed = Signal::new();
    let append = WidthSync::new(1);
    bar.increment(5);
    assert!(bar.render(80, &flushed, &no_columns(), &append).ends_with(" ok\n"));
    bar.increment(10);
    assert_eq!(
        bar.render(80, &flushed, &no_columns(), &append),
        "too far: 15\n"
    );
    // the bar is still usable
    bar.increment(1);
    assert_eq!(bar.statistics().current, 16);
}

#[test]
fn test_completed_waits_for_flushed() {
    let counter = CompletionCounter::new();
    let bar = gauge::bar(3).width(5).counter(&counter).spawn();
    bar.increment(3);
    assert!(bar.in_progress());
    let flushed = Signal::new();
    let none = no_columns();
    assert_eq!(bar.render(80, &flushed, &none, &none), " [===] \n");
    std::thread::sleep(Duration::from_millis(20));
    assert!(!bar.is_done());
    assert_eq!(counter.count(), 1);
    flushed.signal();
    bar.wait();
    assert!(!bar.in_progress());
    assert_eq!(counter.count(), 0);
}

#[test]
fn test_proxy_reader() {
    let bar = gauge::bar(1000).spawn();
    let data = vec![7u8; 1000];
    let mut reader = bar.proxy_reader(&data[..]);
    let mut out = Vec::new();
    let n = reader.read_to_end(&mut out).unwrap();
    assert_eq!(n, 1000);
    assert_eq!(out, data);
    let stats = bar.statistics();
    assert_eq!(stats.current, 1000);
    assert!(stats.completed);
}

#[test]
fn test_format() {
    let bar = gauge::bar(10).width(7).format("(#>.)").spawn();
    let flushed = Signal::new();
    let none = no_columns();
    bar.increment(5);
    assert_eq!(bar.render(80, &flushed, &none, &none), " (##>..) \n");

    // invalid format keeps the default
    let bar = gauge::bar(10).width(7).format("<>").spawn();
    bar.increment(5);
    assert_eq!(bar.render(80, &flushed, &none, &none), " [==>--] \n");
}

#[test]
fn test_trim_spaces() {
    let bar = gauge::bar(10)
        .width(7)
        .trim_left_space()
        .trim_right_space()
        .prepend(|_, _, _| "<".to_string())
        .append(|_, _, _| ">".to_string())
        .spawn();
    let flushed = Signal::new();
    let one = WidthSync::new(1);
    assert_eq!(bar.render(80, &flushed, &one, &one), "<[-----]>\n");
}
