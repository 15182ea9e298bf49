use std::time::{Duration, Instant};

use crate::{
    provider::TextProvider,
    runtime::{Hub, Subscription},
    settings::{Mode, Settings},
    stats::{compute_stats, Stats},
};

/// State of one typing session
#[derive(Debug, Clone, Default)]
pub struct Session {
    text: String,
    chars: Vec<char>,
    cursor: usize,
    running: bool,
    remaining_seconds: u32,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    misses: u32,
}

impl Session {
    pub(crate) fn begin(text: String, remaining_seconds: u32, started_at: Instant) -> Self {
        let chars = text.chars().collect();
        Self {
            text,
            chars,
            cursor: 0,
            running: true,
            remaining_seconds,
            started_at: Some(started_at),
            ended_at: None,
            misses: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the target text in characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// When the session stopped running, by expiry, exhaustion or stop
    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    /// Keystrokes that did not match the expected character
    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// The character the typist has to press next
    pub fn expected_char(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    /// Text already typed correctly
    pub fn typed(&self) -> String {
        self.chars[..self.cursor].iter().collect()
    }

    /// Text after the expected character
    pub fn upcoming(&self) -> String {
        self.chars
            .get(self.cursor + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    /// Advance on an exact match. Returns whether the key was accepted.
    pub(crate) fn accept(&mut self, c: char) -> bool {
        match self.expected_char() {
            Some(expected) if expected == c => {
                self.cursor += 1;
                true
            }
            Some(_) => {
                self.misses += 1;
                false
            }
            None => false,
        }
    }

    /// Take one second off the clock. Returns true when time runs out.
    pub(crate) fn countdown(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.halt();
            true
        } else {
            false
        }
    }

    pub(crate) fn halt(&mut self) {
        self.running = false;
        self.ended_at.get_or_insert_with(Instant::now);
    }
}

/// Drives a [`Session`] from key input and a one-second timer.
///
/// The key listener and the timer are held as [`Subscription`]s on the
/// tracker's hubs; they exist only while a session is running and are
/// released on expiry, [`Tracker::stop`], a new [`Tracker::start`], or drop.
#[derive(Debug)]
pub struct Tracker<P: TextProvider> {
    provider: P,
    session: Session,
    stats: Stats,
    keys: Hub,
    timer: Hub,
    key_listener: Option<Subscription>,
    tick_timer: Option<Subscription>,
}

impl<P: TextProvider> Tracker<P> {
    pub fn new(provider: P) -> Self {
        Self::with_hubs(provider, Hub::default(), Hub::default())
    }

    pub fn with_hubs(provider: P, keys: Hub, timer: Hub) -> Self {
        Self {
            provider,
            session: Session::default(),
            stats: Stats::default(),
            keys,
            timer,
            key_listener: None,
            tick_timer: None,
        }
    }

    pub fn start(&mut self, settings: &Settings) {
        self.release();

        let word_count = settings.requested_word_count();
        let text = self.provider.text(word_count);

        self.session = Session::begin(text, settings.initial_seconds(), Instant::now());
        self.stats = Stats::default();

        self.key_listener = Some(self.keys.subscribe());
        if settings.mode == Mode::Time {
            self.tick_timer = Some(self.timer.subscribe());
        }

        tracing::info!(
            mode = %settings.mode,
            word_count,
            chars = self.session.len(),
            seconds = self.session.remaining_seconds(),
            "Session started"
        );
    }

    pub fn on_key(&mut self, c: char) {
        if !self.session.is_running() || self.key_listener.is_none() {
            return;
        }

        let accepted = self.session.accept(c);
        self.recompute();

        if accepted && self.session.is_exhausted() {
            self.session.halt();
            self.release();
            self.log_finish("text exhausted");
        }
    }

    pub fn tick(&mut self) {
        if !self.session.is_running() || self.tick_timer.is_none() {
            return;
        }

        if self.session.countdown() {
            self.release();
            self.log_finish("time expired");
        } else {
            self.recompute();
        }
    }

    /// End the running session early. Does nothing when idle.
    pub fn stop(&mut self) {
        if !self.session.is_running() {
            return;
        }
        self.session.halt();
        self.release();
        self.log_finish("stopped");
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn text(&self) -> &str {
        self.session.text()
    }

    pub fn cursor(&self) -> usize {
        self.session.cursor()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn has_started(&self) -> bool {
        self.session.started_at().is_some()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.session.remaining_seconds()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Time from start until the session ended, or until now while running
    pub fn elapsed(&self) -> Duration {
        let Some(start) = self.session.started_at() else {
            return Duration::ZERO;
        };
        self.session
            .ended_at()
            .unwrap_or_else(Instant::now)
            .saturating_duration_since(start)
    }

    fn recompute(&mut self) {
        self.stats = compute_stats(&self.session, &self.stats, Instant::now());
    }

    fn release(&mut self) {
        self.key_listener = None;
        self.tick_timer = None;
    }

    fn log_finish(&self, reason: &str) {
        tracing::info!(
            reason,
            cursor = self.session.cursor(),
            wpm = self.stats.wpm,
            accuracy = self.stats.accuracy,
            errors = self.stats.errors,
            "Session finished"
        );
    }
}
