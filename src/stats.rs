use std::time::Instant;

use crate::session::Session;

/// Characters per word for WPM figures
pub const CHARS_PER_WORD: f64 = 5.0;

/// Live typing statistics, derived from a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
    pub errors: u32,
    pub streak: u32,
    pub raw_wpm: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            wpm: 0,
            cpm: 0,
            accuracy: 100,
            errors: 0,
            streak: 0,
            raw_wpm: 0,
        }
    }
}

/// Recompute statistics for `session` as of `now`.
///
/// `previous` is the last value handed out for the same session; only its
/// error count and streak are read. Rates are zero until some time has
/// elapsed since the session started.
pub fn compute_stats(session: &Session, previous: &Stats, now: Instant) -> Stats {
    let cursor = session.cursor() as u32;
    let errors = session.misses();

    let accuracy = if cursor == 0 {
        100
    } else {
        per_cent(cursor, cursor + errors)
    };

    let streak = if errors == previous.errors {
        previous.streak + 1
    } else {
        0
    };

    let minutes = session
        .started_at()
        .map(|start| now.saturating_duration_since(start).as_secs_f64() / 60.0)
        .unwrap_or(0.0);

    let (wpm, cpm, raw_wpm) = if minutes > 0.0 {
        (
            rate(cursor as f64 / CHARS_PER_WORD, minutes),
            rate(cursor as f64, minutes),
            rate((cursor + errors) as f64 / CHARS_PER_WORD, minutes),
        )
    } else {
        (0, 0, 0)
    };

    Stats {
        wpm,
        cpm,
        accuracy,
        errors,
        streak,
        raw_wpm,
    }
}

fn rate(amount: f64, minutes: f64) -> u32 {
    (amount / minutes).round() as u32
}

fn per_cent(part: u32, whole: u32) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session_at(text: &str, typed: usize, misses: u32) -> (Session, Instant) {
        let start = Instant::now();
        let mut session = Session::begin(text.to_string(), 0, start);
        let chars: Vec<char> = text.chars().collect();
        for c in chars.iter().take(typed) {
            assert!(session.accept(*c));
        }
        for _ in 0..misses {
            assert!(!session.accept('\u{0}'));
        }
        (session, start)
    }

    #[test]
    fn test_default_stats() {
        let stats = Stats::default();
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn test_accuracy_is_full_with_nothing_typed() {
        let (session, start) = session_at("hello world", 0, 3);
        let stats = compute_stats(&session, &Stats::default(), start + Duration::from_secs(5));
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_rates_over_one_minute() {
        let text = "a".repeat(300);
        let (session, start) = session_at(&text, 250, 0);
        let stats = compute_stats(&session, &Stats::default(), start + Duration::from_secs(60));

        assert_eq!(stats.wpm, 50);
        assert_eq!(stats.cpm, 250);
        assert_eq!(stats.raw_wpm, 50);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_rates_over_half_a_minute() {
        let text = "b".repeat(100);
        let (session, start) = session_at(&text, 50, 0);
        let stats = compute_stats(&session, &Stats::default(), start + Duration::from_secs(30));

        assert_eq!(stats.wpm, 20);
        assert_eq!(stats.cpm, 100);
    }

    #[test]
    fn test_zero_elapsed_reports_zero_rates() {
        let (session, start) = session_at("hello", 3, 0);
        let stats = compute_stats(&session, &Stats::default(), start);

        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.cpm, 0);
        assert_eq!(stats.raw_wpm, 0);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_misses_lower_accuracy_and_raise_raw_wpm() {
        let text = "c".repeat(100);
        let (session, start) = session_at(&text, 45, 5);
        let stats = compute_stats(&session, &Stats::default(), start + Duration::from_secs(60));

        assert_eq!(stats.errors, 5);
        assert_eq!(stats.accuracy, 90);
        assert_eq!(stats.wpm, 9);
        assert_eq!(stats.raw_wpm, 10);
    }

    #[test]
    fn test_streak_grows_without_new_errors() {
        let (session, start) = session_at("hello", 2, 0);
        let now = start + Duration::from_secs(1);

        let first = compute_stats(&session, &Stats::default(), now);
        let second = compute_stats(&session, &first, now);
        let third = compute_stats(&session, &second, now);

        assert_eq!(first.streak, 1);
        assert_eq!(second.streak, 2);
        assert_eq!(third.streak, 3);
    }

    #[test]
    fn test_streak_resets_on_new_error() {
        let (mut session, start) = session_at("hello", 2, 0);
        let now = start + Duration::from_secs(1);

        let before = compute_stats(&session, &Stats::default(), now);
        let before = compute_stats(&session, &before, now);
        assert_eq!(before.streak, 2);

        assert!(!session.accept('z'));
        let after = compute_stats(&session, &before, now);
        assert_eq!(after.streak, 0);
        assert_eq!(after.errors, 1);

        let recovered = compute_stats(&session, &after, now);
        assert_eq!(recovered.streak, 1);
    }

    #[test]
    fn test_unstarted_session_has_zero_rates() {
        let session = Session::default();
        let stats = compute_stats(&session, &Stats::default(), Instant::now());
        assert_eq!(stats, Stats { streak: 1, ..Stats::default() });
    }
}
