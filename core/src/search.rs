use crate::actor::actor_results;
use crate::cache::IndexCache;
use crate::corpus::Corpus;
use crate::index::build_index;
use crate::rank::{rank, RankParams, RankedResult};
use crate::Error;

/// Which retrieval path a search takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    /// Case-insensitive substring match over cast names.
    Actor(String),
    /// TF-IDF similarity over overviews.
    Description(String),
}

impl SearchRequest {
    /// Route raw form inputs. A non-blank actor name wins over a description.
    pub fn from_inputs(actor: Option<&str>, description: Option<&str>) -> Result<Self, Error> {
        let actor = actor.map(str::trim).filter(|s| !s.is_empty());
        let description = description.map(str::trim).filter(|s| !s.is_empty());
        match (actor, description) {
            (Some(a), _) => Ok(Self::Actor(a.to_string())),
            (None, Some(d)) => Ok(Self::Description(d.to_string())),
            (None, None) => Err(Error::EmptyQuery),
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Actor(q) | Self::Description(q) => q,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Actor(_) => "actor",
            Self::Description(_) => "description",
        }
    }
}

/// Rank by overview similarity, rebuilding the index from `corpus` for this query.
pub fn search_by_description<'c>(corpus: &'c Corpus, query: &str, params: RankParams) -> Vec<RankedResult<'c>> {
    if query.trim().is_empty() || corpus.is_empty() {
        return Vec::new();
    }
    let index = build_index(corpus);
    let hits = rank(corpus, &index, query, params);
    tracing::debug!(query, hits = hits.len(), "description search complete");
    hits
}

pub fn search<'c>(corpus: &'c Corpus, request: &SearchRequest, params: RankParams) -> Vec<RankedResult<'c>> {
    tracing::debug!(mode = request.mode(), query = request.query(), "starting search");
    match request {
        SearchRequest::Actor(name) => actor_results(corpus, name),
        SearchRequest::Description(query) => search_by_description(corpus, query, params),
    }
}

/// Like [`search`], but description queries reuse the index held by `cache`.
pub fn search_cached<'c>(
    corpus: &'c Corpus,
    cache: &mut IndexCache,
    request: &SearchRequest,
    params: RankParams,
) -> Vec<RankedResult<'c>> {
    match request {
        SearchRequest::Actor(name) => actor_results(corpus, name),
        SearchRequest::Description(query) => {
            if query.trim().is_empty() || corpus.is_empty() {
                return Vec::new();
            }
            let index = cache.get_or_build(corpus);
            rank(corpus, &index, query, params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_takes_precedence() {
        let r = SearchRequest::from_inputs(Some(" Ann "), Some("space")).unwrap();
        assert_eq!(r, SearchRequest::Actor("Ann".into()));
        assert_eq!(r.mode(), "actor");
    }

    #[test]
    fn blank_actor_falls_back_to_description() {
        let r = SearchRequest::from_inputs(Some("  "), Some("space war")).unwrap();
        assert_eq!(r, SearchRequest::Description("space war".into()));
        assert_eq!(r.query(), "space war");
    }

    #[test]
    fn both_blank_is_empty_query() {
        assert!(matches!(SearchRequest::from_inputs(None, Some("")), Err(Error::EmptyQuery)));
        assert!(matches!(SearchRequest::from_inputs(None, None), Err(Error::EmptyQuery)));
    }
}
