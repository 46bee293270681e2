//! Record cleaning applied between the raw and cleaned exports

use crate::catalog::BookRecord;

/// Returns a cleaned copy of the records
///
/// - whitespace runs in `genre` collapse to one space
/// - `isbn` keeps only `0-9`, `X` and `-`; nothing left means absent
/// - `title` and `description` are trimmed
/// - non-finite prices are replaced with the median of the finite ones
///
/// Order and count are preserved.
pub fn clean_records(records: &[BookRecord]) -> Vec<BookRecord> {
    let fill_price = median_price(records).unwrap_or(0.0);

    records
        .iter()
        .map(|record| BookRecord {
            title: record.title.trim().to_string(),
            price: if record.price.is_finite() {
                record.price
            } else {
                fill_price
            },
            genre: record.genre.split_whitespace().collect::<Vec<_>>().join(" "),
            isbn: record.isbn.as_deref().and_then(clean_isbn),
            description: record.description.trim().to_string(),
        })
        .collect()
}

fn clean_isbn(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Median of the finite prices, or `None` if there are none
pub(crate) fn median_price(records: &[BookRecord]) -> Option<f64> {
    let mut prices: Vec<f64> = records
        .iter()
        .map(|r| r.price)
        .filter(|p| p.is_finite())
        .collect();
    median(&mut prices)
}

/// Median of a slice of finite values; sorts in place
pub(crate) fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
