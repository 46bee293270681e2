//! Dataset statistics
//!
//! This module computes the aggregates behind the summary report and the
//! `--stats` / `--dashboard` modes: overall totals, the most frequent genre and
//! a per-genre price distribution.

use crate::catalog::BookRecord;
use crate::output::clean::median;

/// Price distribution of one genre
#[derive(Debug, Clone, PartialEq)]
pub struct GenreStats {
    pub genre: String,
    pub count: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub mean_price: f64,
    pub median_price: f64,
}

/// Dataset statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStatistics {
    /// Number of records
    pub total_books: usize,

    /// Mean of the finite prices (0.0 when there are none)
    pub average_price: f64,

    /// Most frequent genre; ties go to the genre seen first
    pub top_genre: Option<String>,

    /// One entry per genre, in order of first appearance
    pub genres: Vec<GenreStats>,
}

impl DatasetStatistics {
    /// Computes statistics over a set of records
    ///
    /// Non-finite prices are counted as books but left out of price aggregates.
    pub fn from_records(records: &[BookRecord]) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut prices: Vec<Vec<f64>> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();

        for record in records {
            let index = match order.iter().position(|g| *g == record.genre) {
                Some(index) => index,
                None => {
                    order.push(&record.genre);
                    prices.push(Vec::new());
                    counts.push(0);
                    order.len() - 1
                }
            };
            counts[index] += 1;
            if record.price.is_finite() {
                prices[index].push(record.price);
            }
        }

        let genres: Vec<GenreStats> = order
            .iter()
            .zip(prices.iter_mut())
            .zip(counts.iter())
            .map(|((genre, prices), count)| genre_stats(genre, *count, prices))
            .collect();

        let mut top_genre: Option<&GenreStats> = None;
        for stats in &genres {
            if top_genre.map_or(true, |top| stats.count > top.count) {
                top_genre = Some(stats);
            }
        }

        let finite: Vec<f64> = records
            .iter()
            .map(|r| r.price)
            .filter(|p| p.is_finite())
            .collect();

        Self {
            total_books: records.len(),
            average_price: mean(&finite),
            top_genre: top_genre.map(|g| g.genre.clone()),
            genres,
        }
    }

    /// Number of distinct genres
    pub fn unique_genres(&self) -> usize {
        self.genres.len()
    }

    /// Genres sorted by descending count, keeping first-appearance order on ties
    pub fn genres_by_count(&self) -> Vec<&GenreStats> {
        let mut sorted: Vec<&GenreStats> = self.genres.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.total_books == 0
    }
}

fn genre_stats(genre: &str, count: usize, prices: &mut [f64]) -> GenreStats {
    let mean_price = mean(prices);
    let median_price = median(prices).unwrap_or(0.0);
    // median() sorted the slice
    let min_price = prices.first().copied().unwrap_or(0.0);
    let max_price = prices.last().copied().unwrap_or(0.0);

    GenreStats {
        genre: genre.to_string(),
        count,
        min_price,
        max_price,
        mean_price,
        median_price,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &DatasetStatistics) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Total books: {}", stats.total_books);
    println!("  Average price: £{:.2}", stats.average_price);
    println!("  Unique genres: {}", stats.unique_genres());
    if let Some(top) = &stats.top_genre {
        println!("  Top genre: {}", top);
    }
    println!();

    if stats.genres.is_empty() {
        return;
    }

    println!("Books by Genre:");
    for genre in stats.genres_by_count() {
        let percentage = (genre.count as f64 / stats.total_books as f64) * 100.0;
        println!(
            "  {:<24} {:>5} ({:.1}%)  min £{:.2}  median £{:.2}  max £{:.2}",
            genre.genre,
            genre.count,
            percentage,
            genre.min_price,
            genre.median_price,
            genre.max_price
        );
    }
}
