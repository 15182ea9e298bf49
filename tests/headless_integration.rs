use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use keyrace::error::TextFetchError;
use keyrace::provider::{StaticText, TextProvider, FALLBACK_TEXT};
use keyrace::runtime::{ChannelEventSource, Hub, Runner, TypingEvent};
use keyrace::session::Tracker;
use keyrace::settings::{Mode, Settings, TimeLimit};

struct Offline;

impl TextProvider for Offline {
    fn fetch(&self, _word_count: usize) -> Result<String, TextFetchError> {
        Err(TextFetchError::EmptyContent)
    }
}

fn key(c: char) -> TypingEvent {
    TypingEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn drive<P: TextProvider>(tracker: &mut Tracker<P>, event: TypingEvent) {
    match event {
        TypingEvent::Tick => tracker.tick(),
        TypingEvent::Resize => {}
        TypingEvent::Key(key) => {
            if let KeyCode::Char(c) = key.code {
                tracker.on_key(c);
            }
        }
    }
}

// Headless integration using the runtime + Tracker without a TTY
#[test]
fn headless_typing_flow_completes() {
    let mut tracker = Tracker::new(StaticText::new("hi"));
    tracker.start(&Settings {
        mode: Mode::Words,
        time_limit: None,
        ..Settings::default()
    });

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(5));

    tx.send(key('h')).unwrap();
    tx.send(key('x')).unwrap();
    tx.send(key('i')).unwrap();

    for _ in 0..100u32 {
        drive(&mut tracker, runner.step());
        if !tracker.is_running() {
            break;
        }
    }

    assert!(!tracker.is_running(), "session should end once the text is typed");
    assert_eq!(tracker.cursor(), 2);
    let stats = tracker.stats();
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.accuracy, 67);
}

#[test]
fn headless_timed_session_with_fallback_text() {
    let keys = Hub::default();
    let timer = Hub::default();
    let mut tracker = Tracker::with_hubs(Offline, keys.clone(), timer.clone());

    tracker.start(&Settings {
        mode: Mode::Time,
        time_limit: Some(TimeLimit::Secs15),
        ..Settings::default()
    });

    assert_eq!(tracker.text(), FALLBACK_TEXT);
    assert_eq!(tracker.cursor(), 0);
    assert!(tracker.is_running());
    assert_eq!(tracker.remaining_seconds(), 15);
    assert_eq!(tracker.stats().accuracy, 100);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(2));

    for c in "The quick".chars() {
        tx.send(key(c)).unwrap();
    }

    let mut ticks = 0;
    for _ in 0..200u32 {
        let event = runner.step();
        if matches!(event, TypingEvent::Tick) {
            ticks += 1;
        }
        drive(&mut tracker, event);
        if !tracker.is_running() {
            break;
        }
    }

    assert_eq!(ticks, 15);
    assert_eq!(tracker.remaining_seconds(), 0);
    assert!(!tracker.is_running());
    assert_eq!(tracker.cursor(), 9);
    assert_eq!(keys.active(), 0);
    assert_eq!(timer.active(), 0);
}

#[test]
fn headless_keys_after_expiry_are_ignored() {
    let mut tracker = Tracker::new(StaticText::new("abc"));
    tracker.start(&Settings {
        mode: Mode::Time,
        time_limit: Some(TimeLimit::Secs15),
        ..Settings::default()
    });

    for _ in 0..15 {
        tracker.tick();
    }
    tracker.on_key('a');

    assert_eq!(tracker.cursor(), 0);
    assert!(!tracker.is_running());
}

#[test]
fn headless_keys_queued_while_loading_are_dropped() {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(5));

    // typed during the fetch, before the session exists
    for c in "hi".chars() {
        tx.send(key(c)).unwrap();
    }

    let mut tracker = Tracker::new(StaticText::new("hi"));
    tracker.start(&Settings {
        mode: Mode::Words,
        time_limit: None,
        ..Settings::default()
    });
    assert_eq!(runner.discard_pending(), 2);
    runner.restart_ticks();

    for _ in 0..5u32 {
        drive(&mut tracker, runner.step());
    }

    assert_eq!(tracker.cursor(), 0);
    assert!(tracker.is_running());
}
