use std::collections::HashMap;

use crate::{
    models::{Content, GenrePreference, UserSignals},
    services::genre_catalog::GenreCatalog,
};

use super::weights::{SignalKind, SignalWeights};

const UNKNOWN_GENRE: &str = "Unknown";

/// One contribution to an external genre's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenreSignal {
    pub genre_id: u32,
    pub weight: f64,
    pub counts_toward_sample_size: bool,
}

/// Running score and count per external genre id
///
/// Remembers first-seen order so equal scores sort deterministically.
#[derive(Debug, Default)]
struct GenreTally {
    order: Vec<u32>,
    totals: HashMap<u32, (f64, u32)>,
}

impl GenreTally {
    fn apply(&mut self, signal: GenreSignal) {
        let entry = self.totals.entry(signal.genre_id).or_insert_with(|| {
            self.order.push(signal.genre_id);
            (0.0, 0)
        });
        entry.0 += signal.weight;
        if signal.counts_toward_sample_size {
            entry.1 += 1;
        }
    }

    fn into_ordered(self) -> Vec<(u32, f64, u32)> {
        let totals = self.totals;
        self.order
            .into_iter()
            .filter_map(|id| totals.get(&id).map(|(score, count)| (id, *score, *count)))
            .collect()
    }
}

/// Expands all of a user's signals into per-genre contributions
pub fn collect_signals(
    catalog: &GenreCatalog,
    weights: &SignalWeights,
    signals: &UserSignals,
) -> Vec<GenreSignal> {
    let mut out = Vec::new();

    // explicit ratings apply to every external id of the unified genre
    for rating in &signals.genre_ratings {
        let kind = SignalKind::from(rating.rating);
        for genre_id in catalog.external_ids(&rating.genre_id) {
            out.push(GenreSignal {
                genre_id,
                weight: weights.weight(kind),
                counts_toward_sample_size: kind.counts_toward_sample_size(),
            });
        }
    }

    let sources: [(&[Content], SignalKind); 4] = [
        (signals.liked.as_slice(), SignalKind::Liked),
        (signals.watchlist.as_slice(), SignalKind::Watchlist),
        (signals.collection.as_slice(), SignalKind::Collection),
        (signals.hidden.as_slice(), SignalKind::Hidden),
    ];
    for (items, kind) in sources {
        for item in items {
            push_item_signals(&mut out, item, kind, weights);
        }
    }

    for vote in &signals.title_votes {
        push_item_signals(&mut out, &vote.content, SignalKind::from(vote.vote), weights);
    }

    out
}

fn push_item_signals(
    out: &mut Vec<GenreSignal>,
    item: &Content,
    kind: SignalKind,
    weights: &SignalWeights,
) {
    // duplicate tags on one item count once per occurrence
    out.extend(item.genre_ids.iter().map(|&genre_id| GenreSignal {
        genre_id,
        weight: weights.weight(kind),
        counts_toward_sample_size: kind.counts_toward_sample_size(),
    }));
}

/// Reduces a user's signals to positively-scored genres, best first
///
/// Ties keep the order in which genres were first seen.
pub fn calculate_genre_preferences(
    catalog: &GenreCatalog,
    weights: &SignalWeights,
    signals: &UserSignals,
) -> Vec<GenrePreference> {
    let mut tally = GenreTally::default();
    for signal in collect_signals(catalog, weights, signals) {
        tally.apply(signal);
    }

    let mut preferences: Vec<GenrePreference> = tally
        .into_ordered()
        .into_iter()
        .filter(|(_, score, _)| *score > 0.0)
        .map(|(genre_id, score, count)| GenrePreference {
            genre_id,
            genre_name: catalog
                .genre_name(genre_id)
                .unwrap_or(UNKNOWN_GENRE)
                .to_string(),
            score,
            count,
        })
        .collect();

    // stable sort keeps first-seen order among equal scores
    preferences.sort_by(|a, b| b.score.total_cmp(&a.score));
    preferences
}
