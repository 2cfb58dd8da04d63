//! End-to-end runs over CSV fixtures: load, compute, export.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use newsalign_core::data::AnomalyType;
use newsalign_runner::{
    run_from_config, save_outputs, table_fingerprint, ExportFormat, PipelineConfig, RunManifest,
};

fn weekdays(n: usize) -> Vec<NaiveDate> {
    let mut d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(d);
        }
        d += Duration::days(1);
    }
    out
}

fn write_prices(dir: &Path, ticker: &str, base: f64, n: usize) {
    let mut csv = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for (i, d) in weekdays(n).iter().enumerate() {
        let close = base + (i as f64 * 0.4).sin() * 2.0 + i as f64 * 0.05;
        writeln!(
            csv,
            "{d},{:.4},{:.4},{:.4},{close:.4},{close:.4},{}",
            close - 0.2,
            close + 0.6,
            close - 0.7,
            10_000 + i * 10
        )
        .unwrap();
    }
    fs::write(dir.join(format!("{ticker}.csv")), csv).unwrap();
}

fn write_news(path: &Path) {
    let csv = "headline,url,publisher,date,stock\n\
Shares surge after strong earnings,,Wire,2024-01-03 09:15:00,AAA\n\
Analysts warn of weak demand,,Desk,2024-02-10 18:00:00-04:00,AAA\n\
Record growth lifts outlook,,Wire,2024-04-01 08:00:00,BBB\n\
Lawsuit weighs on stock,,Desk,2024-04-10,BBB\n\
Headline for a ticker with no prices,,Wire,2024-03-01,ZZZ\n\
broken row,,Wire,not a date,AAA\n";
    fs::write(path, csv).unwrap();
}

fn fixture_config(root: &Path) -> PipelineConfig {
    let prices = root.join("prices");
    fs::create_dir_all(&prices).unwrap();
    write_prices(&prices, "AAA", 40.0, 90);
    write_prices(&prices, "BBB", 120.0, 90);
    let news = root.join("news.csv");
    write_news(&news);

    let mut config = PipelineConfig::default();
    config.data.prices_dir = Some(prices);
    config.data.news_path = Some(news);
    config.report.formats = vec![
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Parquet,
        ExportFormat::Markdown,
    ];
    config
}

#[test]
fn csv_fixtures_produce_enriched_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    let outcome = run_from_config(&config).unwrap();
    let out = &outcome.output;

    // 90 bars: 49 warm-up rows, then the first indicator row has no prior
    // return and the last has no next-day return.
    let per_ticker = 90 - 49 - 2;
    let aaa = out.rows.iter().filter(|r| r.ticker() == "AAA").count();
    let bbb = out.rows.iter().filter(|r| r.ticker() == "BBB").count();
    assert_eq!(aaa, per_ticker);
    assert!(bbb < per_ticker, "BBB rows before its first headline are dropped");
    assert!(out.rows.iter().all(|r| r.sentiment.is_some()));
    assert_eq!(out.unmatched_news_tickers, vec!["ZZZ".to_string()]);
    assert_eq!(outcome.inputs.news_report.rows_dropped(), 1);
    assert_eq!(outcome.inputs.price_report.files, 2);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());

    let first = run_from_config(&config).unwrap();
    let second = run_from_config(&config).unwrap();
    assert_eq!(
        table_fingerprint(&first.output.rows).unwrap(),
        table_fingerprint(&second.output.rows).unwrap()
    );
    assert_eq!(first.inputs.dataset_hash, second.inputs.dataset_hash);

    let out_a = dir.path().join("a");
    let out_b = dir.path().join("b");
    save_outputs(&first, &config, &out_a).unwrap();
    save_outputs(&second, &config, &out_b).unwrap();
    for name in ["enriched.csv", "daily_sentiment.csv", "scored_news.csv", "manifest.json"] {
        assert_eq!(
            fs::read(out_a.join(name)).unwrap(),
            fs::read(out_b.join(name)).unwrap(),
            "{name} differs between runs"
        );
    }
}

#[test]
fn every_format_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    let outcome = run_from_config(&config).unwrap();
    let out_dir = dir.path().join("out");
    let paths = save_outputs(&outcome, &config, &out_dir).unwrap();

    assert!(paths.enriched_csv.unwrap().exists());
    assert!(paths.parquet.unwrap().exists());
    assert!(paths.daily_sentiment_parquet.unwrap().exists());
    assert!(paths.indicators_csv.is_none());
    assert!(paths.news_stats.unwrap().exists());
    assert!(paths.summaries.unwrap().exists());

    let manifest: RunManifest =
        serde_json::from_str(&fs::read_to_string(paths.manifest.unwrap()).unwrap()).unwrap();
    assert!(!manifest.synthetic);
    assert_eq!(manifest.rows, outcome.output.rows.len());
    assert_eq!(manifest.config_hash, config.config_hash());
    assert_eq!(manifest.model_version, "lexicon-v1");
    assert_eq!(
        manifest.table_fingerprint,
        table_fingerprint(&outcome.output.rows).unwrap()
    );

    let report = fs::read_to_string(paths.report_markdown.unwrap()).unwrap();
    assert!(report.starts_with("# News Alignment Report"));
    assert!(report.contains("| AAA |"));
    assert!(report.contains("ZZZ"));
}

#[test]
fn synthetic_run_is_tagged() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = PipelineConfig::default();
    config.data.synthetic = true;
    config.data.synthetic_tickers = vec!["SYN".into()];
    config.report.formats = vec![ExportFormat::Json];

    let outcome = run_from_config(&config).unwrap();
    let paths = save_outputs(&outcome, &config, dir.path()).unwrap();
    let manifest: RunManifest =
        serde_json::from_str(&fs::read_to_string(paths.manifest.unwrap()).unwrap()).unwrap();
    assert!(manifest.synthetic);
    assert!(paths.enriched_csv.is_none());
}

#[test]
fn kept_indicator_tables_and_anomalies_reach_the_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture_config(dir.path());
    config.pipeline.keep_indicator_tables = true;

    // Push one AAA high below its close.
    let aaa = dir.path().join("prices").join("AAA.csv");
    let text = fs::read_to_string(&aaa).unwrap();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut fields: Vec<String> = lines[61].split(',').map(str::to_string).collect();
    let close: f64 = fields[4].parse().unwrap();
    fields[2] = format!("{:.4}", close - 0.01);
    lines[61] = fields.join(",");
    fs::write(&aaa, lines.join("\n") + "\n").unwrap();

    let outcome = run_from_config(&config).unwrap();
    assert_eq!(outcome.output.invalid_removed, 0);
    let paths = save_outputs(&outcome, &config, &dir.path().join("out")).unwrap();

    let indicators = fs::read_to_string(paths.indicators_csv.unwrap()).unwrap();
    assert!(indicators.starts_with("ticker,date,"));
    assert!(indicators.lines().any(|l| l.starts_with("BBB,")));

    let manifest: RunManifest =
        serde_json::from_str(&fs::read_to_string(paths.manifest.unwrap()).unwrap()).unwrap();
    assert!(manifest
        .anomalies
        .iter()
        .any(|a| a.ticker == "AAA" && a.anomaly_type == AnomalyType::OhlcInconsistent && a.count == 1));

    let report = fs::read_to_string(paths.report_markdown.unwrap()).unwrap();
    assert!(report.contains("- AAA: 1 bar(s) with high/low not bounding open/close"));
}
