//! Rating statistics over a catalog.

use crate::storage::Catalog;

/// Aggregate rating figures. `best`/`worst` carry every title tied at
/// the extreme, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub average: f64,
    pub median: f64,
    pub highest: f64,
    pub lowest: f64,
    pub best: Vec<String>,
    pub worst: Vec<String>,
}

/// Compute rating statistics, or `None` for an empty catalog.
pub fn rating_stats(catalog: &Catalog) -> Option<RatingStats> {
    if catalog.is_empty() {
        return None;
    }

    let mut ratings: Vec<f64> = catalog.values().map(|r| r.rating).collect();
    ratings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;

    let mid = ratings.len() / 2;
    let median = if ratings.len() % 2 == 0 {
        (ratings[mid - 1] + ratings[mid]) / 2.0
    } else {
        ratings[mid]
    };

    let lowest = ratings[0];
    let highest = ratings[ratings.len() - 1];

    let best = catalog
        .iter()
        .filter(|(_, r)| r.rating == highest)
        .map(|(title, _)| title.clone())
        .collect();
    let worst = catalog
        .iter()
        .filter(|(_, r)| r.rating == lowest)
        .map(|(title, _)| title.clone())
        .collect();

    Some(RatingStats {
        average,
        median,
        highest,
        lowest,
        best,
        worst,
    })
}
