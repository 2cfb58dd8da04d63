//! Descriptive statistics over the headline table.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use newsalign_core::domain::{NewsItem, ScoredNewsItem};

/// English stopwords removed before word counting.
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthStats {
    pub count: usize,
    pub mean: f64,
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counted {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Headline statistics bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsStats {
    pub headline_length: LengthStats,
    pub top_publishers: Vec<Counted>,
    /// Every calendar day from first to last article, zero-count days included.
    pub articles_per_day: BTreeMap<NaiveDate, usize>,
    /// Monday..Sunday.
    pub articles_per_weekday: Vec<Counted>,
    pub top_words: Vec<Counted>,
    /// Present when the statistics were computed over scored headlines.
    pub sentiment_histogram: Option<Vec<HistogramBin>>,
}

impl NewsStats {
    pub fn from_news(items: &[NewsItem], top_words: usize, top_publishers: usize) -> Self {
        Self {
            headline_length: headline_lengths(items),
            top_publishers: publisher_counts(items, top_publishers),
            articles_per_day: articles_per_day(items),
            articles_per_weekday: articles_per_weekday(items),
            top_words: common_words(items.iter().map(|n| n.headline.as_str()), top_words),
            sentiment_histogram: None,
        }
    }

    pub fn from_scored(scored: &[ScoredNewsItem], top_words: usize, top_publishers: usize) -> Self {
        let items: Vec<NewsItem> = scored.iter().map(|s| s.item.clone()).collect();
        let sentiments: Vec<f64> = scored.iter().map(|s| s.sentiment).collect();
        Self {
            sentiment_histogram: Some(sentiment_histogram(&sentiments, DEFAULT_HISTOGRAM_BINS)),
            ..Self::from_news(&items, top_words, top_publishers)
        }
    }
}

/// Character-length distribution of headlines.
pub fn headline_lengths(items: &[NewsItem]) -> LengthStats {
    let lengths: Vec<usize> = items.iter().map(|n| n.headline.chars().count()).collect();
    if lengths.is_empty() {
        return LengthStats::default();
    }
    LengthStats {
        count: lengths.len(),
        mean: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
        min: lengths.iter().copied().min().unwrap_or(0),
        max: lengths.iter().copied().max().unwrap_or(0),
    }
}

/// Sort by count descending, then key ascending, and keep `n`.
fn top_n(counts: HashMap<String, usize>, n: usize) -> Vec<Counted> {
    let mut out: Vec<Counted> = counts
        .into_iter()
        .map(|(key, count)| Counted { key, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    out.truncate(n);
    out
}

pub fn publisher_counts(items: &[NewsItem], n: usize) -> Vec<Counted> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.publisher.clone()).or_default() += 1;
    }
    top_n(counts, n)
}

pub fn articles_per_day(items: &[NewsItem]) -> BTreeMap<NaiveDate, usize> {
    let mut out: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for item in items {
        *out.entry(item.day()).or_default() += 1;
    }
    if let (Some(&first), Some(&last)) = (out.keys().next(), out.keys().next_back()) {
        let mut day = first;
        while day < last {
            out.entry(day).or_default();
            day += Duration::days(1);
        }
    }
    out
}

pub fn articles_per_weekday(items: &[NewsItem]) -> Vec<Counted> {
    let mut counts = [0usize; 7];
    for item in items {
        counts[item.day().weekday().num_days_from_monday() as usize] += 1;
    }
    let mut day = Weekday::Mon;
    counts
        .iter()
        .map(|&count| {
            let key = weekday_name(day).to_string();
            day = day.succ();
            Counted { key, count }
        })
        .collect()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Most common words: lower-cased whitespace tokens that are purely
/// alphabetic and not stopwords. Ties are broken alphabetically.
pub fn common_words<'a>(headlines: impl Iterator<Item = &'a str>, n: usize) -> Vec<Counted> {
    let stop: HashSet<&str> = STOPWORDS.iter().copied().collect();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for headline in headlines {
        for word in headline.to_lowercase().split_whitespace() {
            if word.chars().all(char::is_alphabetic) && !stop.contains(word) {
                *counts.entry(word.to_string()).or_default() += 1;
            }
        }
    }
    top_n(counts, n)
}

/// Equal-width histogram over [-1, 1]; 1.0 falls in the last bin.
pub fn sentiment_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let width = 2.0 / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        let idx = (((v.clamp(-1.0, 1.0) + 1.0) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: -1.0 + i as f64 * width,
            upper: -1.0 + (i + 1) as f64 * width,
            count,
        })
        .collect()
}
