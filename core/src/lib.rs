//! In-memory movie search.
//!
//! Two retrieval paths over one [`Corpus`]:
//! - cast search: case-insensitive substring match over cast names ([`actor`])
//! - description search: TF-IDF over overviews ranked by cosine similarity ([`index`], [`rank`])
//!
//! Searches never fail; degenerate input (blank query, empty corpus, empty
//! vocabulary) yields an empty result list.

pub mod actor;
pub mod cache;
pub mod corpus;
pub mod index;
pub mod load;
pub mod rank;
pub mod search;
pub mod tokenizer;

pub use actor::{actor_results, search_by_actor, ACTOR_MATCH_SCORE};
pub use cache::{CacheStats, IndexCache};
pub use corpus::{Corpus, DocId, Document, Fingerprint};
pub use index::{build_index, build_index_with, matched_terms, SimilarityIndex, TermId, VectorizerConfig};
pub use load::load_corpus;
pub use rank::{rank, rank_with_total, RankParams, RankedResult, Ranking, DEFAULT_THRESHOLD, DEFAULT_TOP_N};
pub use search::{search, search_by_description, search_cached, SearchRequest};

pub use error::Error;

mod error {
    use crate::corpus::DocId;

    /// Errors raised while constructing a corpus or validating input.
    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        /// Two documents share an id.
        #[error("duplicate document id {0}")]
        DuplicateId(DocId),
        /// Neither an actor name nor a description was supplied.
        #[error("please enter either an actor's name or a description")]
        EmptyQuery,
        /// Vectorizer configuration was invalid.
        #[error("invalid vectorizer configuration: {0}")]
        InvalidConfig(&'static str),
    }
}
