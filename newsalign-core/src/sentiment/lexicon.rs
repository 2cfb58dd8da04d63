//! Polarity lexicon for headline scoring.
//!
//! Word scores are in [-1, 1]. General-purpose opinion words are mixed with
//! the vocabulary that dominates market headlines (beats, misses, upgrades,
//! downgrades).

use std::collections::{HashMap, HashSet};

const POSITIVE: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("better", 0.5),
    ("excellent", 1.0),
    ("strong", 0.43),
    ("stronger", 0.5),
    ("positive", 0.23),
    ("bullish", 0.8),
    ("optimistic", 0.6),
    ("confident", 0.5),
    ("surge", 0.7),
    ("surges", 0.7),
    ("soar", 0.8),
    ("soars", 0.8),
    ("rally", 0.6),
    ("rallies", 0.6),
    ("gain", 0.5),
    ("gains", 0.5),
    ("rise", 0.4),
    ("rises", 0.4),
    ("jump", 0.5),
    ("jumps", 0.5),
    ("climb", 0.4),
    ("climbs", 0.4),
    ("profit", 0.5),
    ("profitable", 0.6),
    ("growth", 0.5),
    ("grow", 0.4),
    ("grows", 0.4),
    ("beat", 0.5),
    ("beats", 0.5),
    ("exceed", 0.5),
    ("exceeds", 0.5),
    ("outperform", 0.6),
    ("outperforms", 0.6),
    ("upgrade", 0.6),
    ("upgrades", 0.6),
    ("upgraded", 0.6),
    ("buy", 0.3),
    ("record", 0.4),
    ("high", 0.16),
    ("higher", 0.25),
    ("top", 0.5),
    ("win", 0.8),
    ("wins", 0.8),
    ("success", 0.3),
    ("successful", 0.75),
    ("improve", 0.5),
    ("improves", 0.5),
    ("improved", 0.5),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("rebounds", 0.5),
    ("boost", 0.5),
    ("boosts", 0.5),
    ("new", 0.14),
    ("innovative", 0.5),
    ("favorable", 0.6),
    ("upside", 0.5),
    ("raise", 0.3),
    ("raises", 0.3),
    ("dividend", 0.2),
    ("approval", 0.5),
    ("approved", 0.5),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("poor", -0.4),
    ("weak", -0.38),
    ("weaker", -0.45),
    ("negative", -0.3),
    ("bearish", -0.8),
    ("pessimistic", -0.6),
    ("crash", -0.9),
    ("crashes", -0.9),
    ("plunge", -0.8),
    ("plunges", -0.8),
    ("tumble", -0.6),
    ("tumbles", -0.6),
    ("drop", -0.5),
    ("drops", -0.5),
    ("fall", -0.4),
    ("falls", -0.4),
    ("slide", -0.4),
    ("slides", -0.4),
    ("sink", -0.5),
    ("sinks", -0.5),
    ("decline", -0.5),
    ("declines", -0.5),
    ("loss", -0.5),
    ("losses", -0.5),
    ("lose", -0.5),
    ("lower", -0.2),
    ("low", -0.2),
    ("miss", -0.5),
    ("misses", -0.5),
    ("missed", -0.5),
    ("downgrade", -0.6),
    ("downgrades", -0.6),
    ("downgraded", -0.6),
    ("underperform", -0.6),
    ("underperforms", -0.6),
    ("sell", -0.3),
    ("cut", -0.4),
    ("cuts", -0.4),
    ("concern", -0.4),
    ("concerns", -0.4),
    ("worry", -0.5),
    ("worries", -0.5),
    ("fear", -0.6),
    ("fears", -0.6),
    ("risk", -0.3),
    ("risky", -0.5),
    ("volatile", -0.3),
    ("uncertainty", -0.4),
    ("disappoint", -0.7),
    ("disappointing", -0.6),
    ("warning", -0.5),
    ("warns", -0.5),
    ("lawsuit", -0.5),
    ("fraud", -0.9),
    ("crisis", -0.8),
    ("recall", -0.5),
    ("layoffs", -0.6),
    ("bankruptcy", -0.9),
    ("fail", -0.5),
    ("fails", -0.5),
    ("failed", -0.5),
    ("downside", -0.5),
    ("probe", -0.4),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nothing", "cannot", "can't", "cant",
    "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt",
    "aren't", "arent", "wasn't", "wasnt", "hardly", "barely", "without",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("sharply", 1.4),
    ("significantly", 1.3),
    ("strongly", 1.3),
    ("massively", 1.5),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("marginally", 0.5),
];

/// Word polarities plus negation and intensifier vocabularies.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, f64>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    pub fn new() -> Self {
        let words = POSITIVE
            .iter()
            .chain(NEGATIVE)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(w, m)| (w.to_string(), *m))
            .collect();
        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Add or override a word score. Scores are clamped to [-1, 1].
    pub fn insert(&mut self, word: &str, score: f64) {
        self.words
            .insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
    }

    /// Polarity of a lower-cased token, if it is a sentiment word.
    pub fn score(&self, token: &str) -> Option<f64> {
        self.words.get(token).copied()
    }

    pub fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token)
    }

    /// Multiplier of an intensifier token.
    pub fn intensifier(&self, token: &str) -> Option<f64> {
        self.intensifiers.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lower-cased alphabetic tokens; inner apostrophes are kept ("don't").
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphabetic() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
        .collect()
}
