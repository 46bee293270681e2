//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a dataset,
//! including genre counts, price distribution and, when available, how each
//! category fared during the crawl.

use crate::crawler::CrawlReport;
use crate::output::stats::DatasetStatistics;
use crate::output::ExportResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const TOP_GENRES: usize = 10;
const BAR_WIDTH: usize = 30;

/// Generates a markdown summary and writes it to disk
///
/// # Arguments
///
/// * `stats` - Statistics of the dataset being reported
/// * `report` - Crawl bookkeeping, if the data came from a crawl in this run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(ExportError)` - Failed to write summary
pub fn generate_markdown_summary(
    stats: &DatasetStatistics,
    report: Option<&CrawlReport>,
    output_path: &Path,
) -> ExportResult<()> {
    let markdown = format_markdown_summary(stats, report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats dataset statistics as markdown
pub fn format_markdown_summary(stats: &DatasetStatistics, report: Option<&CrawlReport>) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Shelf Catalog Summary\n\n");

    // Overview
    md.push_str("## Overview\n\n");
    md.push_str(&format!("- **Total Books**: {}\n", stats.total_books));
    md.push_str(&format!("- **Average Price**: £{:.2}\n", stats.average_price));
    md.push_str(&format!("- **Unique Genres**: {}\n", stats.unique_genres()));
    if let Some(top) = &stats.top_genre {
        md.push_str(&format!("- **Top Genre**: {}\n", top));
    }
    md.push('\n');

    if let Some(report) = report {
        md.push_str("## Crawl Information\n\n");
        md.push_str(&format!("- **Root URL**: {}\n", report.root_url));
        md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
        md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
        md.push_str(&format!(
            "- **Duration**: {} seconds\n",
            report.duration_seconds()
        ));
        md.push_str(&format!("- **Skipped Items**: {}\n", report.total_skipped()));
        md.push_str(&format!(
            "- **Abandoned Categories**: {}\n\n",
            report.failed_categories()
        ));
    }

    if !stats.genres.is_empty() {
        let ranked = stats.genres_by_count();
        let widest = ranked.first().map(|g| g.count).unwrap_or(0).max(1);

        md.push_str(&format!("## Top {} Genres\n\n", TOP_GENRES));
        md.push_str("```text\n");
        for genre in ranked.iter().take(TOP_GENRES) {
            let bar_len = (genre.count * BAR_WIDTH).div_ceil(widest);
            md.push_str(&format!(
                "{:<24} {} {}\n",
                genre.genre,
                "#".repeat(bar_len),
                genre.count
            ));
        }
        md.push_str("```\n\n");

        md.push_str("## Price Distribution by Genre\n\n");
        md.push_str("| Genre | Books | Min | Median | Mean | Max |\n");
        md.push_str("|-------|-------|-----|--------|------|-----|\n");
        for genre in &ranked {
            md.push_str(&format!(
                "| {} | {} | £{:.2} | £{:.2} | £{:.2} | £{:.2} |\n",
                genre.genre,
                genre.count,
                genre.min_price,
                genre.median_price,
                genre.mean_price,
                genre.max_price
            ));
        }
        md.push('\n');
    }

    if let Some(report) = report {
        if !report.categories.is_empty() {
            md.push_str("## Category Outcomes\n\n");
            md.push_str("| Category | Pages | Extracted | Skipped | Outcome |\n");
            md.push_str("|----------|-------|-----------|---------|---------|\n");
            for category in &report.categories {
                let outcome = match &category.failure {
                    Some(reason) => format!("{} ({})", category.end, reason),
                    None => category.end.to_string(),
                };
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    category.name, category.pages, category.extracted, category.skipped, outcome
                ));
            }
            md.push('\n');
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookRecord;
    use crate::crawler::CategoryReport;
    use crate::state::TraversalState;
    use chrono::Utc;

    fn record(genre: &str, price: f64) -> BookRecord {
        BookRecord {
            title: "t".to_string(),
            price,
            genre: genre.to_string(),
            isbn: None,
            description: String::new(),
        }
    }

    fn create_test_stats() -> DatasetStatistics {
        DatasetStatistics::from_records(&[
            record("Poetry", 10.0),
            record("Poetry", 30.0),
            record("Travel", 45.17),
        ])
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_stats(), None);

        assert!(markdown.contains("# Sumi-Shelf Catalog Summary"));
        assert!(markdown.contains("- **Total Books**: 3"));
        assert!(markdown.contains("- **Top Genre**: Poetry"));
        assert!(markdown.contains("| Travel | 1 | £45.17 | £45.17 | £45.17 | £45.17 |"));
        assert!(!markdown.contains("Category Outcomes"));
    }

    #[test]
    fn test_genre_bars_scale_to_largest() {
        let markdown = format_markdown_summary(&create_test_stats(), None);
        assert!(markdown.contains(&format!("{} 2", "#".repeat(BAR_WIDTH))));
        assert!(markdown.contains(&format!("{} 1", "#".repeat(BAR_WIDTH / 2))));
    }

    #[test]
    fn test_markdown_with_crawl_report() {
        let now = Utc::now();
        let report = CrawlReport {
            root_url: "http://books.example.com/".to_string(),
            started_at: now,
            finished_at: now,
            categories: vec![
                CategoryReport {
                    name: "Poetry".to_string(),
                    url: "http://books.example.com/poetry/index.html".to_string(),
                    pages: 1,
                    extracted: 2,
                    skipped: 0,
                    end: TraversalState::Exhausted,
                    failure: None,
                },
                CategoryReport {
                    name: "Travel".to_string(),
                    url: "http://books.example.com/travel/index.html".to_string(),
                    pages: 0,
                    extracted: 0,
                    skipped: 0,
                    end: TraversalState::Failed,
                    failure: Some("request timed out".to_string()),
                },
            ],
        };

        let markdown = format_markdown_summary(&create_test_stats(), Some(&report));
        assert!(markdown.contains("## Category Outcomes"));
        assert!(markdown.contains("| Poetry | 1 | 2 | 0 | exhausted |"));
        assert!(markdown.contains("| Travel | 0 | 0 | 0 | failed (request timed out) |"));
        assert!(markdown.contains("- **Abandoned Categories**: 1"));
    }

    #[test]
    fn test_empty_dataset_has_no_tables() {
        let stats = DatasetStatistics::from_records(&[]);
        let markdown = format_markdown_summary(&stats, None);
        assert!(markdown.contains("- **Total Books**: 0"));
        assert!(!markdown.contains("Price Distribution"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        generate_markdown_summary(&create_test_stats(), None, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Sumi-Shelf Catalog Summary"));
    }
}
