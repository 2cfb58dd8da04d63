//! Sentiment models: headline text in, polarity in [-1, 1] out.

use super::lexicon::{tokenize, Lexicon};

/// Number of preceding tokens searched for a negation word.
const NEGATION_WINDOW: usize = 3;

/// Multiplier applied to a negated sentiment word.
const NEGATION_FACTOR: f64 = -0.5;

/// A deterministic headline polarity model.
///
/// The same text and `version()` always produce the same score.
pub trait SentimentModel: Send + Sync {
    /// Polarity in [-1, 1]; 0.0 for neutral or empty text.
    fn polarity(&self, text: &str) -> f64;

    /// Identifier recorded in run manifests.
    fn version(&self) -> &str;
}

/// Lexicon-based polarity: mean of the scored words with negation and
/// intensifier adjustments.
#[derive(Debug, Clone, Default)]
pub struct LexiconModel {
    lexicon: Lexicon,
}

impl LexiconModel {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl SentimentModel for LexiconModel {
    fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;
        let mut scored = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut score) = self.lexicon.score(token) else {
                continue;
            };
            if let Some(mult) = i
                .checked_sub(1)
                .and_then(|p| self.lexicon.intensifier(&tokens[p]))
            {
                score *= mult;
            }
            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| self.lexicon.is_negation(t)) {
                score *= NEGATION_FACTOR;
            }
            total += score;
            scored += 1;
        }

        if scored == 0 {
            return 0.0;
        }
        (total / scored as f64).clamp(-1.0, 1.0)
    }

    fn version(&self) -> &str {
        "lexicon-v1"
    }
}
