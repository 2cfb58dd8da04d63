//! Headline sentiment: lexicon, scoring models and daily aggregation.

mod aggregate;
mod lexicon;
mod model;

pub use aggregate::{aggregate_daily, group_daily_by_ticker};
pub use lexicon::{tokenize, Lexicon};
pub use model::{LexiconModel, SentimentModel};

use rayon::prelude::*;

use crate::domain::{NewsItem, ScoredNewsItem};

/// Score every headline. Items are scored in parallel; output order matches
/// input order.
pub fn score_news<M: SentimentModel + ?Sized>(items: Vec<NewsItem>, model: &M) -> Vec<ScoredNewsItem> {
    items
        .into_par_iter()
        .map(|item| {
            let sentiment = model.polarity(&item.headline);
            ScoredNewsItem { item, sentiment }
        })
        .collect()
}
