use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Time between timer ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Input delivered to the app loop
#[derive(Clone, Debug)]
pub enum TypingEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Where the app loop pulls input from
pub trait EventSource {
    /// Wait up to `timeout` for the next event
    fn recv_timeout(&self, timeout: Duration) -> Result<TypingEvent, RecvTimeoutError>;

    /// Take an event only if one is already queued
    fn try_recv(&self) -> Option<TypingEvent>;
}

/// Event source fed through an mpsc channel.
///
/// [`ChannelEventSource::terminal`] forwards crossterm input from a reader
/// thread; [`ChannelEventSource::new`] wraps any receiver, which is how
/// tests and headless callers inject events.
pub struct ChannelEventSource {
    rx: Receiver<TypingEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<TypingEvent>) -> Self {
        Self { rx }
    }

    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || forward_terminal_events(tx));
        Self::new(rx)
    }
}

fn forward_terminal_events(tx: Sender<TypingEvent>) {
    loop {
        let forwarded = match event::read() {
            Ok(CtEvent::Key(key)) => TypingEvent::Key(key),
            Ok(CtEvent::Resize(_, _)) => TypingEvent::Resize,
            Ok(_) => continue,
            Err(e) => {
                tracing::error!(error = %e, "Terminal event stream closed");
                return;
            }
        };
        if tx.send(forwarded).is_err() {
            return;
        }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TypingEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn try_recv(&self) -> Option<TypingEvent> {
        self.rx.try_recv().ok()
    }
}

/// Merges an [`EventSource`] with a tick every `interval`.
///
/// Ticks fire on fixed deadlines, so a steady stream of key events does not
/// push the next tick back.
pub struct Runner<E: EventSource> {
    events: E,
    interval: Duration,
    next_tick: Cell<Instant>,
}

impl<E: EventSource> Runner<E> {
    pub fn new(events: E, interval: Duration) -> Self {
        Self {
            events,
            interval,
            next_tick: Cell::new(Instant::now() + interval),
        }
    }

    /// Schedule the next tick one full interval from now
    pub fn restart_ticks(&self) {
        self.next_tick.set(Instant::now() + self.interval);
    }

    /// Throw away queued input. Returns how many events were dropped.
    pub fn discard_pending(&self) -> usize {
        let mut dropped = 0;
        while self.events.try_recv().is_some() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Discarded input queued before session start");
        }
        dropped
    }

    /// Blocks until the next event or the tick deadline, whichever is first
    pub fn step(&self) -> TypingEvent {
        let deadline = self.next_tick.get();
        let now = Instant::now();
        if now >= deadline {
            self.advance(deadline, now);
            return TypingEvent::Tick;
        }

        match self.events.recv_timeout(deadline - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => {
                self.advance(deadline, Instant::now());
                TypingEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
                self.advance(deadline, Instant::now());
                TypingEvent::Tick
            }
        }
    }

    fn advance(&self, deadline: Instant, now: Instant) {
        let next = deadline + self.interval;
        // Skip missed ticks instead of firing a burst
        if next <= now {
            self.next_tick.set(now + self.interval);
        } else {
            self.next_tick.set(next);
        }
    }
}

/// Registration point for a listener or timer.
///
/// Clones share the same count, so a caller can hand one clone to a
/// [`crate::session::Tracker`] and observe its registrations through another.
#[derive(Clone, Debug, Default)]
pub struct Hub {
    active: Arc<AtomicUsize>,
}

impl Hub {
    pub fn subscribe(&self) -> Subscription {
        self.active.fetch_add(1, Ordering::SeqCst);
        Subscription {
            active: Arc::clone(&self.active),
        }
    }

    /// Number of live subscriptions
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// A live registration on a [`Hub`]; dropping it unsubscribes
#[must_use = "dropping a subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    active: Arc<AtomicUsize>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
