use std::cmp::Ordering;
use std::sync::Arc;

use roaring::RoaringBitmap;
use tracing::{debug, instrument};

use crate::error::{HearthError, Result};
use crate::index::SimilarityStore;
use crate::types::{RankingScope, Recommendation};

/// Ranks the neighbours of a property by combined similarity.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    store: Arc<SimilarityStore>,
}

/// A scored neighbour before name resolution.
#[derive(Debug, Clone, Copy)]
struct Scored {
    index: usize,
    score: f64,
}

/// Higher score first; equal scores fall back to the lower index.
fn rank_order(a: &Scored, b: &Scored) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.index.cmp(&b.index))
}

impl RecommendationEngine {
    pub fn new(store: Arc<SimilarityStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SimilarityStore {
        &self.store
    }

    /// The `top_n` properties most similar to `property`, best first.
    ///
    /// The query itself is removed by index before ranking, so it never
    /// appears in its own results whatever its self-similarity.
    ///
    /// # Errors
    /// - `InvalidState` if the similarity space is empty.
    /// - `InvalidArgument` if `top_n` is zero.
    /// - `NotFound` if `property` is not in the similarity space.
    #[instrument(skip(self, scope), fields(scope = scope.label()))]
    pub fn recommend(
        &self,
        property: &str,
        top_n: usize,
        scope: RankingScope<'_>,
    ) -> Result<Vec<Recommendation>> {
        if self.store.is_empty() {
            return Err(HearthError::InvalidState(
                "similarity space is empty".into(),
            ));
        }
        if top_n == 0 {
            return Err(HearthError::InvalidArgument("top_n must be > 0".into()));
        }
        let query = self.store.index_of(property)?;
        let row = self.store.row(query);

        let mut scored: Vec<Scored> = match scope {
            RankingScope::Universe => row
                .iter()
                .enumerate()
                .filter(|&(index, _)| index != query)
                .map(|(index, &score)| Scored { index, score })
                .collect(),
            RankingScope::Candidates(names) => {
                let allowed = self.candidate_bitmap(names);
                allowed
                    .iter()
                    .map(|i| i as usize)
                    .filter(|&index| index != query)
                    .map(|index| Scored {
                        index,
                        score: row[index],
                    })
                    .collect()
            }
        };

        let eligible = scored.len();
        if scored.len() > top_n {
            scored.select_nth_unstable_by(top_n - 1, rank_order);
            scored.truncate(top_n);
        }
        scored.sort_unstable_by(rank_order);

        let results: Vec<Recommendation> = scored
            .into_iter()
            .filter_map(|s| {
                self.store.name_at(s.index).map(|name| Recommendation {
                    name: name.to_string(),
                    score: s.score,
                })
            })
            .collect();

        debug!(
            property,
            eligible,
            returned = results.len(),
            "recommendation ranked"
        );
        Ok(results)
    }

    /// Resolve candidate names to similarity indices. Unknown names are skipped.
    fn candidate_bitmap(&self, names: &[String]) -> RoaringBitmap {
        let mut bitmap = RoaringBitmap::new();
        for name in names {
            match self.store.index_of(name) {
                Ok(index) => {
                    bitmap.insert(index as u32);
                }
                Err(_) => debug!(candidate = %name, "candidate outside similarity space, skipped"),
            }
        }
        bitmap
    }
}
