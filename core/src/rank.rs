use crate::corpus::{Corpus, Document};
use crate::index::{SimilarityIndex, SparseVector};
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 5;
/// Rescaled scores at or below this are dropped.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParams {
    pub top_n: usize,
    pub threshold: f32,
}

impl Default for RankParams {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N, threshold: DEFAULT_THRESHOLD }
    }
}

impl RankParams {
    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n, ..Self::default() }
    }
}

/// A document paired with its score for one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedResult<'a> {
    pub document: &'a Document,
    pub score: f32,
}

/// Cosine similarity, 0 when either vector has zero norm.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    let score = a.dot(b) / denom;
    if score.is_finite() { score } else { 0.0 }
}

/// Ranked hits plus how many documents passed the threshold before truncation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking<'a> {
    pub results: Vec<RankedResult<'a>>,
    pub total_hits: usize,
}

/// Rank corpus documents against `query` using an index built from that same corpus.
///
/// Scores are rescaled so the best hit is exactly 1.0, filtered by `params.threshold`,
/// sorted descending (ties keep corpus order) and truncated to `params.top_n`.
pub fn rank<'c>(
    corpus: &'c Corpus,
    index: &SimilarityIndex,
    query: &str,
    params: RankParams,
) -> Vec<RankedResult<'c>> {
    rank_with_total(corpus, index, query, params).results
}

/// Like [`rank`], also reporting the surviving hit count before `top_n` applies.
pub fn rank_with_total<'c>(
    corpus: &'c Corpus,
    index: &SimilarityIndex,
    query: &str,
    params: RankParams,
) -> Ranking<'c> {
    let query = query.trim();
    if query.is_empty() || corpus.is_empty() || params.top_n == 0 {
        return Ranking::default();
    }
    if index.source() != corpus.fingerprint() {
        tracing::warn!(
            index = %index.source(),
            corpus = %corpus.fingerprint(),
            "index was built from a different corpus; refusing to rank"
        );
        return Ranking::default();
    }
    if index.vocabulary().is_empty() {
        tracing::debug!("empty vocabulary, no description matches possible");
        return Ranking::default();
    }

    let query_vec = index.vocabulary().embed(query);
    if query_vec.is_empty() {
        tracing::debug!(query, "query has no in-vocabulary terms");
        return Ranking::default();
    }

    let mut scores: Vec<f32> = index
        .matrix()
        .rows()
        .map(|row| cosine_similarity(row, &query_vec))
        .collect();
    let max = scores.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for s in scores.iter_mut() {
            *s /= max;
        }
    }

    let mut hits: Vec<(usize, f32)> = scores
        .into_iter()
        .enumerate()
        .filter(|(_, s)| *s > params.threshold)
        .collect();
    // Stable sort: equal scores stay in corpus order.
    hits.sort_by(|a, b| b.1.total_cmp(&a.1));
    let total_hits = hits.len();
    hits.truncate(params.top_n);

    let results = hits
        .into_iter()
        .filter_map(|(row, score)| corpus.get(row).map(|document| RankedResult { document, score }))
        .collect();
    Ranking { results, total_hits }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;
    use crate::index::build_index;

    fn corpus() -> Corpus {
        let overviews = [
            "A young wizard discovers a hidden school of magic",
            "A young detective hunts a killer in a dark city",
            "A retired detective returns to the dark city streets",
            "Giant spiders attack a small desert town",
            "A small town faces giant spiders from the desert",
        ];
        let docs = overviews
            .iter()
            .enumerate()
            .map(|(i, o)| Document::new(i as u64 + 1, format!("Film {}", i + 1), *o, ["Cast Member"]))
            .collect();
        Corpus::new(docs).unwrap()
    }

    #[test]
    fn best_match_scores_exactly_one() {
        let c = corpus();
        let ix = build_index(&c);
        let hits = rank(&c, &ix, "dark city detective", RankParams::default());
        let ids: Vec<u64> = hits.iter().map(|h| h.document.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(hits[0].score, 1.0);
        // Doc 2 carries one extra term ("young"): 2 / sqrt(5).
        assert!((hits[1].score - 2.0 / 5.0f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let c = corpus();
        let ix = build_index(&c);
        let hits = rank(&c, &ix, "giant spiders", RankParams::default());
        let ids: Vec<u64> = hits.iter().map(|h| h.document.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert!(hits.iter().all(|h| h.score == 1.0));
    }

    #[test]
    fn threshold_is_exclusive_filter() {
        let c = corpus();
        let ix = build_index(&c);
        let params = RankParams { threshold: 0.9, ..RankParams::default() };
        let hits = rank(&c, &ix, "dark city detective", params);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document.id, 3);
    }

    #[test]
    fn score_equal_to_threshold_is_dropped() {
        let c = corpus();
        let ix = build_index(&c);
        let open = RankParams { threshold: 0.0, ..RankParams::default() };
        let hits = rank(&c, &ix, "dark city detective", open);
        assert_eq!(hits.len(), 2);
        let runner_up = hits[1].score;

        let at_boundary = RankParams { threshold: runner_up, ..RankParams::default() };
        let hits = rank(&c, &ix, "dark city detective", at_boundary);
        let ids: Vec<u64> = hits.iter().map(|h| h.document.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn total_hits_counts_before_truncation() {
        let c = corpus();
        let ix = build_index(&c);
        let ranking = rank_with_total(&c, &ix, "dark city detective", RankParams::with_top_n(1));
        assert_eq!(ranking.results.len(), 1);
        assert_eq!(ranking.results[0].document.id, 3);
        assert_eq!(ranking.total_hits, 2);
        assert_eq!(rank_with_total(&c, &ix, "zebra", RankParams::default()), Ranking::default());
    }

    #[test]
    fn degenerate_queries_return_nothing() {
        let c = corpus();
        let ix = build_index(&c);
        assert!(rank(&c, &ix, "", RankParams::default()).is_empty());
        assert!(rank(&c, &ix, "   ", RankParams::default()).is_empty());
        assert!(rank(&c, &ix, "the of and", RankParams::default()).is_empty());
        assert!(rank(&c, &ix, "zebra", RankParams::default()).is_empty());
        assert!(rank(&c, &ix, "dark city", RankParams::with_top_n(0)).is_empty());
    }

    #[test]
    fn refuses_index_from_another_corpus() {
        let c = corpus();
        let other = Corpus::new(vec![Document::new(1, "x", "dark city", ["a"])]).unwrap();
        let ix = build_index(&other);
        assert!(rank(&c, &ix, "dark city", RankParams::default()).is_empty());
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        let zero = SparseVector::default();
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }
}
