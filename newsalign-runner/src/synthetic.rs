//! Deterministic synthetic prices and headlines.
//!
//! Seeds derive from BLAKE3 of the ticker, so the same ticker and date range
//! always produce the same data. Output is clearly fake and runs built from it
//! are tagged as synthetic.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use newsalign_core::domain::{NewsItem, PriceBar};

const PUBLISHERS: [&str; 5] = [
    "Benzinga Newsdesk",
    "Market Wire",
    "Zacks",
    "Lisa Levin",
    "Street Insider",
];

const POSITIVE_TEMPLATES: [&str; 5] = [
    "{t} shares surge after earnings beat estimates",
    "Analysts upgrade {t} on strong growth outlook",
    "{t} rallies to record high",
    "{t} raises dividend, stock climbs",
    "Bullish options activity in {t}",
];

const NEGATIVE_TEMPLATES: [&str; 5] = [
    "{t} shares fall after revenue miss",
    "Analysts downgrade {t} citing weak demand",
    "{t} plunges on lawsuit concerns",
    "{t} cuts guidance amid uncertainty",
    "Bearish options activity in {t}",
];

const NEUTRAL_TEMPLATES: [&str; 4] = [
    "{t} to report quarterly results next week",
    "{t} announces board meeting date",
    "Earnings preview: what to expect from {t}",
    "{t} files quarterly report",
];

fn rng_for(ticker: &str, salt: &str) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ticker.as_bytes());
    hasher.update(salt.as_bytes());
    StdRng::from_seed(*hasher.finalize().as_bytes())
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn weekdays(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |d| *d <= end)
        .filter(|d| is_weekday(*d))
}

/// Weekday random-walk bars from a starting price of 100.0.
pub fn synthetic_bars(ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
    let mut rng = rng_for(ticker, "bars");
    let mut price = 100.0_f64;

    weekdays(start, end)
        .map(|date| {
            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64);
            price = close;
            PriceBar {
                ticker: ticker.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume,
            }
        })
        .collect()
}

/// One to three headlines for `ticker` on roughly one day in three,
/// weekends included.
pub fn synthetic_news(ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<NewsItem> {
    let mut rng = rng_for(ticker, "news");
    let mut items = Vec::new();
    let mut date = start;
    while date <= end {
        if rng.gen_bool(1.0 / 3.0) {
            let per_day = rng.gen_range(1..=3);
            for _ in 0..per_day {
                let roll: f64 = rng.gen();
                let templates: &[&str] = if roll < 0.4 {
                    &POSITIVE_TEMPLATES
                } else if roll < 0.75 {
                    &NEGATIVE_TEMPLATES
                } else {
                    &NEUTRAL_TEMPLATES
                };
                let template = templates.choose(&mut rng).copied().unwrap_or("{t}");
                let publisher = PUBLISHERS.choose(&mut rng).copied().unwrap_or("Market Wire");
                let time = NaiveTime::from_hms_opt(rng.gen_range(6..22), rng.gen_range(0..60), 0)
                    .unwrap_or_default();
                items.push(NewsItem {
                    headline: template.replace("{t}", ticker),
                    publisher: publisher.to_string(),
                    stock: ticker.to_string(),
                    date: date.and_time(time),
                });
            }
        }
        date += Duration::days(1);
    }
    items
}

/// Files written by [`write_synthetic_dataset`].
#[derive(Debug, Clone)]
pub struct SyntheticFiles {
    pub prices_dir: PathBuf,
    pub news_path: PathBuf,
}

/// Write synthetic data in the ingestion formats: `prices/<TICKER>.csv`
/// and `news.csv` under `dir`.
pub fn write_synthetic_dataset(
    dir: &Path,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SyntheticFiles> {
    let prices_dir = dir.join("prices");
    std::fs::create_dir_all(&prices_dir)
        .with_context(|| format!("failed to create {}", prices_dir.display()))?;

    let mut news = Vec::new();
    for ticker in tickers {
        let ticker = ticker.trim().to_uppercase();
        let path = prices_dir.join(format!("{ticker}.csv"));
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        wtr.write_record(["Date", "Open", "High", "Low", "Close", "Volume"])?;
        for b in synthetic_bars(&ticker, start, end) {
            wtr.write_record([
                b.date.to_string(),
                format!("{:.4}", b.open),
                format!("{:.4}", b.high),
                format!("{:.4}", b.low),
                format!("{:.4}", b.close),
                b.volume.to_string(),
            ])?;
        }
        wtr.flush()?;
        news.extend(synthetic_news(&ticker, start, end));
    }

    let news_path = dir.join("news.csv");
    let mut wtr = csv::Writer::from_path(&news_path)
        .with_context(|| format!("failed to create {}", news_path.display()))?;
    wtr.write_record(["headline", "publisher", "date", "stock"])?;
    for n in &news {
        let date = n.date.format("%Y-%m-%d %H:%M:%S").to_string();
        wtr.write_record([
            n.headline.as_str(),
            n.publisher.as_str(),
            date.as_str(),
            n.stock.as_str(),
        ])?;
    }
    wtr.flush()?;

    Ok(SyntheticFiles {
        prices_dir,
        news_path,
    })
}
