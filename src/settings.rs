use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SettingsError;

/// Words requested from the provider when no time limit is configured.
pub const DEFAULT_WORD_COUNT: usize = 30;
/// Words requested per second of time limit.
pub const WORDS_PER_SECOND: usize = 3;

/// How a session is sized and when it terminates
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Time,
    Words,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimeLimit {
    Secs15,
    Secs30,
    #[default]
    Secs60,
    Secs120,
}

impl TimeLimit {
    pub fn as_secs(self) -> u32 {
        match self {
            TimeLimit::Secs15 => 15,
            TimeLimit::Secs30 => 30,
            TimeLimit::Secs60 => 60,
            TimeLimit::Secs120 => 120,
        }
    }
}

impl TryFrom<u32> for TimeLimit {
    type Error = SettingsError;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        match secs {
            15 => Ok(TimeLimit::Secs15),
            30 => Ok(TimeLimit::Secs30),
            60 => Ok(TimeLimit::Secs60),
            120 => Ok(TimeLimit::Secs120),
            other => Err(SettingsError::TimeLimit(other)),
        }
    }
}

impl From<TimeLimit> for u32 {
    fn from(t: TimeLimit) -> Self {
        t.as_secs()
    }
}

impl FromStr for TimeLimit {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: u32 = s
            .trim()
            .parse()
            .map_err(|_| SettingsError::NotANumber(s.to_string()))?;
        TimeLimit::try_from(secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum WordCount {
    Words10,
    Words25,
    Words50,
    Words100,
}

impl WordCount {
    pub fn as_count(self) -> u32 {
        match self {
            WordCount::Words10 => 10,
            WordCount::Words25 => 25,
            WordCount::Words50 => 50,
            WordCount::Words100 => 100,
        }
    }
}

impl TryFrom<u32> for WordCount {
    type Error = SettingsError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            10 => Ok(WordCount::Words10),
            25 => Ok(WordCount::Words25),
            50 => Ok(WordCount::Words50),
            100 => Ok(WordCount::Words100),
            other => Err(SettingsError::WordCount(other)),
        }
    }
}

impl From<WordCount> for u32 {
    fn from(w: WordCount) -> Self {
        w.as_count()
    }
}

impl FromStr for WordCount {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| SettingsError::NotANumber(s.to_string()))?;
        WordCount::try_from(n)
    }
}

/// Caller-owned session settings.
///
/// The session tracker only reads `mode` and `time_limit`. The remaining
/// fields shape text generation in [`crate::generator`] and are otherwise
/// carried as configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: Mode,
    pub time_limit: Option<TimeLimit>,
    pub word_count: Option<WordCount>,
    pub custom_text: Option<String>,
    pub language: String,
    pub include_caps: bool,
    pub include_punctuation: bool,
    pub include_numbers: bool,
    pub include_special_chars: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Time,
            time_limit: Some(TimeLimit::Secs60),
            word_count: None,
            custom_text: None,
            language: "english".to_string(),
            include_caps: true,
            include_punctuation: true,
            include_numbers: false,
            include_special_chars: false,
        }
    }
}

impl Settings {
    /// Number of words to ask the text provider for
    pub fn requested_word_count(&self) -> usize {
        self.time_limit
            .map(|t| t.as_secs() as usize * WORDS_PER_SECOND)
            .unwrap_or(DEFAULT_WORD_COUNT)
    }

    /// Seconds on the clock at start; zero outside time mode
    pub fn initial_seconds(&self) -> u32 {
        match self.mode {
            Mode::Time => self.time_limit.unwrap_or_default().as_secs(),
            Mode::Words | Mode::Custom => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_requested_word_count_scales_with_time_limit() {
        let settings = Settings {
            time_limit: Some(TimeLimit::Secs15),
            ..Settings::default()
        };
        assert_eq!(settings.requested_word_count(), 45);

        let settings = Settings {
            time_limit: Some(TimeLimit::Secs120),
            ..Settings::default()
        };
        assert_eq!(settings.requested_word_count(), 360);
    }

    #[test]
    fn test_requested_word_count_defaults_without_limit() {
        let settings = Settings {
            mode: Mode::Words,
            time_limit: None,
            ..Settings::default()
        };
        assert_eq!(settings.requested_word_count(), DEFAULT_WORD_COUNT);
    }

    #[test]
    fn test_initial_seconds_by_mode() {
        let mut settings = Settings {
            mode: Mode::Time,
            time_limit: Some(TimeLimit::Secs60),
            ..Settings::default()
        };
        assert_eq!(settings.initial_seconds(), 60);

        settings.mode = Mode::Words;
        assert_eq!(settings.initial_seconds(), 0);

        settings.mode = Mode::Custom;
        assert_eq!(settings.initial_seconds(), 0);

        settings.mode = Mode::Time;
        settings.time_limit = None;
        assert_eq!(settings.initial_seconds(), 60);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.mode, Mode::Time);
        assert_eq!(settings.time_limit, Some(TimeLimit::Secs60));
        assert_eq!(settings.initial_seconds(), 60);
        assert_eq!(settings.requested_word_count(), 180);
        assert!(settings.include_caps);
        assert!(settings.include_punctuation);
        assert!(!settings.include_numbers);
        assert!(!settings.include_special_chars);
    }

    #[test]
    fn test_time_limit_parsing() {
        assert_eq!("15".parse::<TimeLimit>(), Ok(TimeLimit::Secs15));
        assert_eq!("120".parse::<TimeLimit>(), Ok(TimeLimit::Secs120));
        assert_matches!("45".parse::<TimeLimit>(), Err(SettingsError::TimeLimit(45)));
        assert_matches!("soon".parse::<TimeLimit>(), Err(SettingsError::NotANumber(_)));
    }

    #[test]
    fn test_word_count_parsing() {
        assert_eq!("25".parse::<WordCount>(), Ok(WordCount::Words25));
        assert_matches!("7".parse::<WordCount>(), Err(SettingsError::WordCount(7)));
    }

    #[test]
    fn test_settings_serialize_limits_as_numbers() {
        let settings = Settings {
            time_limit: Some(TimeLimit::Secs60),
            word_count: Some(WordCount::Words50),
            ..Settings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["time_limit"], 60);
        assert_eq!(json["word_count"], 50);
        assert_eq!(json["mode"], "time");
    }

    #[test]
    fn test_settings_reject_unknown_time_limit() {
        let json = r#"{ "time_limit": 42 }"#;
        assert!(serde_json::from_str::<Settings>(json).is_err());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Time.to_string(), "time");
        assert_eq!(Mode::Words.to_string(), "words");
        assert_eq!(Mode::Custom.to_string(), "custom");
    }
}
