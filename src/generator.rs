use rand::seq::SliceRandom;
use rand::Rng;

use crate::{error::TextFetchError, provider::TextProvider, settings::Settings};

const COMMON_WORDS: &[&str] = &[
    "the", "be", "of", "and", "a", "to", "in", "he", "have", "it", "that", "for", "they", "with",
    "as", "not", "on", "she", "at", "by", "this", "we", "you", "do", "but", "from", "or", "which",
    "one", "would", "all", "will", "there", "say", "who", "make", "when", "can", "more", "if",
    "no", "man", "out", "other", "so", "what", "time", "up", "go", "about", "than", "into",
    "could", "state", "only", "new", "year", "some", "take", "come", "these", "know", "see",
    "use", "get", "like", "then", "first", "any", "work", "now", "may", "such", "give", "over",
    "think", "most", "even", "find", "day", "also", "after", "way", "many", "must", "look",
    "before", "great", "back", "through", "long", "where", "much", "should", "well", "people",
    "down", "own", "just", "because", "good", "each", "those", "feel", "seem", "how", "high",
    "too", "place", "little", "world", "very", "still", "nation", "hand", "old", "life", "tell",
    "write", "become", "here", "show", "house", "both", "between", "need", "mean", "call",
    "develop", "under", "last", "right", "move", "thing", "general", "school", "never", "same",
    "another", "begin", "while", "number", "part", "turn", "real", "leave", "might", "want",
    "point", "form", "off", "child", "few", "small", "since", "against", "ask", "late", "home",
    "interest", "large", "person", "end", "open", "public", "follow", "during", "present",
    "without", "again", "hold", "govern", "around", "possible", "head", "consider", "word",
    "program", "problem", "however", "lead", "system", "set", "order", "eye", "plan", "run",
    "keep", "face", "fact", "group", "play", "stand", "increase", "early", "course", "change",
    "help", "line",
];

const SPECIAL_WRAPS: &[(&str, &str)] = &[("(", ")"), ("[", "]"), ("{", "}"), ("\"", "\""), ("'", "'")];
const SPECIAL_MARKS: &[&str] = &["@", "#", "$", "%", "&", "*", "+", "=", "/", "-", "_", "~"];
const CLAUSE_MARKS: &[&str] = &[",", ",", ",", ";", ":"];
const SENTENCE_MARKS: &[&str] = &[".", ".", ".", "!", "?"];

/// Offline text source built from an embedded word list.
///
/// Honours the capitals, punctuation, numbers and special-character flags of
/// [`Settings`]. A configured word count takes precedence over the count the
/// tracker asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordListProvider {
    word_count: Option<usize>,
    caps: bool,
    punctuation: bool,
    numbers: bool,
    special_chars: bool,
}

impl WordListProvider {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            word_count: settings.word_count.map(|w| w.as_count() as usize),
            caps: settings.include_caps,
            punctuation: settings.include_punctuation,
            numbers: settings.include_numbers,
            special_chars: settings.include_special_chars,
        }
    }

    /// Build `word_count` tokens with the given random source
    pub fn generate<R: Rng + ?Sized>(&self, word_count: usize, rng: &mut R) -> String {
        let count = self.word_count.unwrap_or(word_count).max(1);

        let mut words: Vec<String> = (0..count)
            .map(|_| {
                COMMON_WORDS
                    .choose(rng)
                    .map(|w| w.to_string())
                    .unwrap_or_default()
            })
            .collect();

        if self.numbers {
            sprinkle(&mut words, rng, |_, rng| rng.gen_range(0..10_000).to_string());
        }
        if self.special_chars {
            sprinkle(&mut words, rng, |word, rng| {
                if rng.gen_bool(0.5) {
                    let (open, close) = SPECIAL_WRAPS.choose(rng).copied().unwrap_or(("(", ")"));
                    format!("{open}{word}{close}")
                } else {
                    let mark = SPECIAL_MARKS.choose(rng).copied().unwrap_or("#");
                    format!("{mark}{word}")
                }
            });
        }
        if self.punctuation {
            punctuate(&mut words, rng, self.caps);
        } else if self.caps {
            capitalize_some(&mut words, rng);
        }

        words.join(" ")
    }
}

impl TextProvider for WordListProvider {
    fn fetch(&self, word_count: usize) -> Result<String, TextFetchError> {
        Ok(self.generate(word_count, &mut rand::thread_rng()))
    }
}

/// Rewrite about one word in eight, and always at least one
fn sprinkle<R, F>(words: &mut [String], rng: &mut R, mut rewrite: F)
where
    R: Rng + ?Sized,
    F: FnMut(&str, &mut R) -> String,
{
    if words.is_empty() {
        return;
    }
    let forced = rng.gen_range(0..words.len());
    for i in 0..words.len() {
        if i == forced || rng.gen_bool(0.125) {
            words[i] = rewrite(&words[i], rng);
        }
    }
}

fn punctuate<R: Rng + ?Sized>(words: &mut [String], rng: &mut R, caps: bool) {
    let last = words.len() - 1;
    let mut sentence_start = true;
    for (i, word) in words.iter_mut().enumerate() {
        if caps && (sentence_start || rng.gen_bool(0.1)) {
            *word = capitalize_first_letter(word);
        }
        sentence_start = false;

        if i == last {
            word.push_str(SENTENCE_MARKS.choose(rng).copied().unwrap_or("."));
        } else if rng.gen_bool(0.1) {
            word.push_str(SENTENCE_MARKS.choose(rng).copied().unwrap_or("."));
            sentence_start = true;
        } else if rng.gen_bool(0.1) {
            word.push_str(CLAUSE_MARKS.choose(rng).copied().unwrap_or(","));
        }
    }
}

fn capitalize_some<R: Rng + ?Sized>(words: &mut [String], rng: &mut R) {
    for (i, word) in words.iter_mut().enumerate() {
        if i == 0 || rng.gen_bool(0.2) {
            *word = capitalize_first_letter(word);
        }
    }
}

/// Upper-case the first alphabetic character, leaving any leading symbols
fn capitalize_first_letter(word: &str) -> String {
    match word.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((idx, c)) => {
            let mut out = String::with_capacity(word.len());
            out.push_str(&word[..idx]);
            out.extend(c.to_uppercase());
            out.push_str(&word[idx + c.len_utf8()..]);
            out
        }
        None => word.to_string(),
    }
}
