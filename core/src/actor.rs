use crate::corpus::{Corpus, Document};
use crate::rank::RankedResult;

/// Score reported for every cast match.
pub const ACTOR_MATCH_SCORE: f32 = 1.0;

/// Documents whose cast contains `actor` as a case-insensitive substring, in corpus order.
pub fn search_by_actor<'c>(corpus: &'c Corpus, actor: &str) -> Vec<&'c Document> {
    let needle = actor.trim().to_lowercase();
    if needle.is_empty() {
        tracing::debug!("empty actor query");
        return Vec::new();
    }
    if corpus.is_empty() {
        tracing::warn!("no movies available for actor search");
        return Vec::new();
    }
    let hits: Vec<&Document> = corpus
        .iter()
        .filter(|doc| doc.cast.iter().any(|name| name.to_lowercase().contains(&needle)))
        .collect();
    tracing::debug!(actor = %needle, hits = hits.len(), "actor search complete");
    hits
}

/// Actor hits in the shared result shape, each with [`ACTOR_MATCH_SCORE`].
pub fn actor_results<'c>(corpus: &'c Corpus, actor: &str) -> Vec<RankedResult<'c>> {
    search_by_actor(corpus, actor)
        .into_iter()
        .map(|document| RankedResult { document, score: ACTOR_MATCH_SCORE })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::new(vec![
            Document::new(1, "Space War", "", ["Ann Lee", "Annabel Stone"]),
            Document::new(2, "City Noir", "", ["Bob Ray"]),
            Document::new(3, "Quiet Film", "", Vec::<String>::new()),
            Document::new(4, "Harbor", "", ["Joanna Reyes"]),
        ])
        .unwrap()
    }

    #[test]
    fn matches_substrings_once_per_document() {
        let c = corpus();
        let ids: Vec<u64> = search_by_actor(&c, "ann").iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn trims_and_ignores_case() {
        let c = corpus();
        let ids: Vec<u64> = search_by_actor(&c, "  BOB ray ").iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let c = corpus();
        assert!(search_by_actor(&c, "").is_empty());
        assert!(search_by_actor(&c, " \t ").is_empty());
    }

    #[test]
    fn results_carry_full_match_score() {
        let c = corpus();
        let hits = actor_results(&c, "lee");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, ACTOR_MATCH_SCORE);
    }
}
