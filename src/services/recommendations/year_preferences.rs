//! Per-genre release-year preferences
//!
//! Years of everything a user has engaged with are grouped by unified genre,
//! then clustered into decades to find the window the user gravitates to.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::{
    models::{Confidence, Content, GenreYearPreference, YearRange},
    services::genre_catalog::GenreCatalog,
};

pub const MIN_VALID_YEAR: i32 = 1900;
pub const MAX_VALID_YEAR: i32 = 2050;

/// Share of a genre's items the preferred decades must cover
pub const DECADE_COVERAGE_THRESHOLD: f64 = 0.6;

/// Decades observed fewer times than this are treated as noise
const MIN_ITEMS_PER_DECADE: usize = 2;

/// Release year of an item, if its date is present, parseable and plausible
///
/// Accepts full `YYYY-MM-DD` dates as well as bare years.
pub fn extract_year(content: &Content) -> Option<i32> {
    let raw = content.date()?.trim();

    let year = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.year())
        .ok()
        .or_else(|| {
            if raw.len() == 4 {
                raw.parse::<i32>().ok()
            } else {
                None
            }
        })?;

    (MIN_VALID_YEAR..=MAX_VALID_YEAR)
        .contains(&year)
        .then_some(year)
}

/// Median of the years, rounding the midpoint of an even-sized sample
///
/// Returns `None` for an empty slice.
pub fn median_year(years: &[i32]) -> Option<i32> {
    if years.is_empty() {
        return None;
    }

    let mut sorted = years.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let avg = (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0;
        Some(avg.round() as i32)
    }
}

/// Decades that together cover `threshold` of the years, oldest first
///
/// Decades seen fewer than twice are ignored. The rest are taken in order of
/// popularity (ties go to the earlier decade) until the accepted decades
/// cover at least `threshold` of all years, including the ignored ones. If
/// the qualifying decades never reach the threshold, all of them are
/// returned.
pub fn preferred_decades(years: &[i32], threshold: f64) -> Vec<i32> {
    if years.is_empty() {
        return Vec::new();
    }

    let mut buckets: BTreeMap<i32, usize> = BTreeMap::new();
    for year in years {
        *buckets.entry(year.div_euclid(10) * 10).or_default() += 1;
    }

    let mut ranked: Vec<(i32, usize)> = buckets
        .into_iter()
        .filter(|(_, count)| *count >= MIN_ITEMS_PER_DECADE)
        .collect();
    // BTreeMap order is chronological; the stable sort keeps it for ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let total = years.len() as f64;
    let mut covered = 0usize;
    let mut accepted = Vec::new();

    for (decade, count) in ranked {
        accepted.push(decade);
        covered += count;
        if covered as f64 / total >= threshold {
            break;
        }
    }

    accepted.sort_unstable();
    accepted
}

/// Year window implied by the decades, widened by a confidence buffer
pub fn effective_year_range(decades: &[i32], confidence: Confidence) -> Option<YearRange> {
    let buffer = confidence.year_buffer()?;
    let first = decades.iter().min()?;
    let last = decades.iter().max()?;

    Some(YearRange {
        min: first - buffer,
        max: last + 10 + buffer,
    })
}

/// Computes release-year preferences for every genre the content touches
///
/// Each item contributes its year once per unified genre it maps to. The
/// result is ordered by sample size, largest first.
pub fn detect_year_preferences(
    catalog: &GenreCatalog,
    collections: &[&[Content]],
) -> Vec<GenreYearPreference> {
    let mut order: Vec<&'static str> = Vec::new();
    let mut years_by_genre: HashMap<&'static str, Vec<i32>> = HashMap::new();

    for item in collections.iter().flat_map(|c| c.iter()) {
        let Some(year) = extract_year(item) else {
            continue;
        };

        let mut seen_for_item: Vec<&'static str> = Vec::new();
        for &external_id in &item.genre_ids {
            let Some(genre) = catalog.genre_from_external_id(external_id, item.media_type) else {
                continue;
            };
            if seen_for_item.contains(&genre.id) {
                continue;
            }
            seen_for_item.push(genre.id);

            years_by_genre
                .entry(genre.id)
                .or_insert_with(|| {
                    order.push(genre.id);
                    Vec::new()
                })
                .push(year);
        }
    }

    let mut preferences: Vec<GenreYearPreference> = order
        .into_iter()
        .filter_map(|genre_id| {
            let years = years_by_genre.get(genre_id)?;
            let genre = catalog.find_genre(genre_id)?;
            build_preference(genre_id, genre.name, years)
        })
        .collect();

    preferences.sort_by(|a, b| b.sample_size.cmp(&a.sample_size));

    tracing::debug!(
        genres = preferences.len(),
        "Year preferences detected"
    );

    preferences
}

fn build_preference(genre_id: &str, genre_name: &str, years: &[i32]) -> Option<GenreYearPreference> {
    let year_min = *years.iter().min()?;
    let year_max = *years.iter().max()?;
    let year_median = median_year(years)?;
    let confidence = Confidence::from_sample_size(years.len());
    let preferred_decades = preferred_decades(years, DECADE_COVERAGE_THRESHOLD);
    let effective_year_range = effective_year_range(&preferred_decades, confidence);

    Some(GenreYearPreference {
        genre_id: genre_id.to_string(),
        genre_name: genre_name.to_string(),
        preferred_decades,
        sample_size: years.len(),
        year_median,
        year_min,
        year_max,
        confidence,
        effective_year_range,
    })
}
