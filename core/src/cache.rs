use crate::corpus::{Corpus, Fingerprint};
use crate::index::{build_unchecked, SimilarityIndex, VectorizerConfig};
use crate::Error;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Single-entry index cache keyed by corpus fingerprint.
#[derive(Debug, Default)]
pub struct IndexCache {
    config: VectorizerConfig,
    entry: Option<Arc<SimilarityIndex>>,
    stats: CacheStats,
}

impl IndexCache {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: VectorizerConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    /// Fingerprint of the corpus the cached index was built from.
    pub fn key(&self) -> Option<Fingerprint> { self.entry.as_ref().map(|ix| ix.source()) }

    pub fn stats(&self) -> CacheStats { self.stats }

    pub fn invalidate(&mut self) { self.entry = None; }

    /// Return the cached index for `corpus`, rebuilding when the snapshot changed.
    pub fn get_or_build(&mut self, corpus: &Corpus) -> Arc<SimilarityIndex> {
        if let Some(ix) = &self.entry {
            if ix.source() == corpus.fingerprint() {
                self.stats.hits += 1;
                return Arc::clone(ix);
            }
        }
        self.stats.misses += 1;
        tracing::debug!(corpus = %corpus.fingerprint(), "rebuilding similarity index");
        let ix = Arc::new(build_unchecked(corpus, self.config));
        self.entry = Some(Arc::clone(&ix));
        ix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn corpus(extra: &str) -> Corpus {
        Corpus::new(vec![
            Document::new(1, "a", "dark city", ["x"]),
            Document::new(2, "b", format!("dark city {extra}"), ["y"]),
            Document::new(3, "c", "giant spiders", ["z"]),
        ])
        .unwrap()
    }

    #[test]
    fn reuses_index_for_same_snapshot() {
        let mut cache = IndexCache::new();
        let c = corpus("");
        let a = cache.get_or_build(&c);
        let b = cache.get_or_build(&c.clone());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.key(), Some(c.fingerprint()));
    }

    #[test]
    fn rebuilds_when_corpus_changes() {
        let mut cache = IndexCache::new();
        let a = cache.get_or_build(&corpus(""));
        let changed = corpus("night");
        let b = cache.get_or_build(&changed);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.source(), changed.fingerprint());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn configured_cache_builds_with_its_own_settings() {
        let c = corpus("");
        let unigrams = VectorizerConfig { ngram_range: (1, 1), ..VectorizerConfig::default() };
        let mut narrow = IndexCache::with_config(unigrams).unwrap();
        let mut default = IndexCache::new();

        let a = narrow.get_or_build(&c);
        let b = default.get_or_build(&c);
        assert!(a.vocabulary().contains("dark"));
        assert!(!a.vocabulary().contains("dark city"));
        assert!(b.vocabulary().contains("dark city"));
        assert_ne!(a.vocabulary().len(), b.vocabulary().len());
        assert_eq!(a.vocabulary().config().ngram_range, (1, 1));
    }

    #[test]
    fn rejects_invalid_config() {
        let bad = VectorizerConfig { min_df: 0, ..VectorizerConfig::default() };
        assert!(matches!(IndexCache::with_config(bad), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = IndexCache::new();
        let c = corpus("");
        cache.get_or_build(&c);
        cache.invalidate();
        assert!(cache.key().is_none());
        cache.get_or_build(&c);
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2 });
    }
}
