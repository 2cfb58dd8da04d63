//! Property tests for headline statistics and exports.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use newsalign_core::domain::NewsItem;
use newsalign_runner::reporting::text_stats::{
    articles_per_day, articles_per_weekday, sentiment_histogram,
};

fn arb_news() -> impl Strategy<Value = Vec<NewsItem>> {
    prop::collection::vec((0i64..60, 0u32..24, "[a-z ]{0,30}"), 0..80).prop_map(|raw| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        raw.into_iter()
            .map(|(day, hour, headline)| NewsItem {
                headline,
                publisher: "Wire".into(),
                stock: "ABC".into(),
                date: (base + Duration::days(day)).and_hms_opt(hour, 0, 0).unwrap(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn daily_and_weekday_counts_cover_every_item(news in arb_news()) {
        let per_day = articles_per_day(&news);
        let per_weekday = articles_per_weekday(&news);
        prop_assert_eq!(per_day.values().sum::<usize>(), news.len());
        prop_assert_eq!(per_weekday.iter().map(|c| c.count).sum::<usize>(), news.len());
        prop_assert_eq!(per_weekday.len(), 7);

        // Consecutive calendar days, no gaps.
        let days: Vec<NaiveDate> = per_day.keys().copied().collect();
        for w in days.windows(2) {
            prop_assert_eq!(w[1] - w[0], Duration::days(1));
        }
    }

    #[test]
    fn histogram_counts_every_score(scores in prop::collection::vec(-1.0f64..=1.0, 0..200), bins in 1usize..40) {
        let hist = sentiment_histogram(&scores, bins);
        prop_assert_eq!(hist.len(), bins);
        prop_assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), scores.len());
        prop_assert!((hist[0].lower + 1.0).abs() < 1e-12);
        prop_assert!((hist[bins - 1].upper - 1.0).abs() < 1e-9);
    }
}
