//! TF-IDF index over corpus overviews.
//!
//! Weights are `count * idf` with `idf = ln((1 + N) / (1 + df)) + 1`, and every
//! row is L2-normalized. A term is admitted to the vocabulary only when it occurs
//! in at least `min_df` documents and in no more than `max_df * N` documents.

use crate::corpus::{Corpus, Fingerprint};
use crate::tokenizer::{analyze, NgramRange};
use crate::Error;
use std::collections::{BTreeMap, HashMap, HashSet};

pub type TermId = u32;

/// Vectorizer parameters shared by index build and query embedding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorizerConfig {
    pub ngram_range: NgramRange,
    /// Minimum number of documents a term must occur in.
    pub min_df: usize,
    /// Maximum fraction of documents a term may occur in.
    pub max_df: f32,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { ngram_range: (1, 2), min_df: 2, max_df: 0.8 }
    }
}

impl VectorizerConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::InvalidConfig("ngram_range must satisfy 1 <= min <= max"));
        }
        if self.min_df == 0 {
            return Err(Error::InvalidConfig("min_df must be at least 1"));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(Error::InvalidConfig("max_df must be in (0, 1]"));
        }
        Ok(())
    }

    fn admits(&self, df: usize, num_docs: usize) -> bool {
        df >= self.min_df && (df as f64) <= f64::from(self.max_df) * num_docs as f64
    }
}

/// Smoothed IDF; finite and >= 1 whenever `df <= num_docs`.
pub fn smoothed_idf(num_docs: usize, df: usize) -> f32 {
    (((1 + num_docs) as f32) / ((1 + df) as f32)).ln() + 1.0
}

/// Sparse weight vector, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    /// TF-IDF weight raw counts, then L2-normalize.
    fn weighted(counts: BTreeMap<TermId, u32>, idf: &[f32]) -> Self {
        let entries = counts
            .into_iter()
            .filter_map(|(tid, tf)| idf.get(tid as usize).map(|w| (tid, tf as f32 * w)))
            .collect();
        let mut v = Self { entries };
        v.normalize();
        v
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() {
                *w /= norm;
            }
        }
    }

    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j, mut sum) = (0, 0, 0.0f32);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Admitted terms mapped to dense column ids (alphabetical order), with per-term statistics.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    df: Vec<u32>,
    idf: Vec<f32>,
    config: VectorizerConfig,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    pub fn contains(&self, term: &str) -> bool { self.dictionary.contains_key(term) }

    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }

    pub fn df(&self, id: TermId) -> Option<u32> { self.df.get(id as usize).copied() }

    pub fn idf(&self, id: TermId) -> Option<f32> { self.idf.get(id as usize).copied() }

    pub fn config(&self) -> &VectorizerConfig { &self.config }

    /// Terms in column order.
    pub fn terms(&self) -> impl Iterator<Item = (TermId, &str)> + '_ {
        self.terms.iter().enumerate().map(|(i, t)| (i as TermId, t.as_str()))
    }

    /// Embed text into this frozen term space; out-of-vocabulary terms are dropped.
    pub fn embed(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in analyze(text, self.config.ngram_range) {
            if let Some(&tid) = self.dictionary.get(&term) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        SparseVector::weighted(counts, &self.idf)
    }
}

/// Rows follow corpus order; columns follow the vocabulary.
#[derive(Debug, Clone, Default)]
pub struct TermWeightMatrix {
    rows: Vec<SparseVector>,
    num_columns: usize,
}

impl TermWeightMatrix {
    pub fn num_rows(&self) -> usize { self.rows.len() }

    pub fn num_columns(&self) -> usize { self.num_columns }

    pub fn rows(&self) -> impl Iterator<Item = &SparseVector> + '_ { self.rows.iter() }
}

/// Vocabulary plus matrix for one corpus snapshot.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    vocabulary: Vocabulary,
    matrix: TermWeightMatrix,
    source: Fingerprint,
}

impl SimilarityIndex {
    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

    pub fn matrix(&self) -> &TermWeightMatrix { &self.matrix }

    /// Fingerprint of the corpus this index was built from.
    pub fn source(&self) -> Fingerprint { self.source }
}

/// Build an index with the default vectorizer configuration.
pub fn build_index(corpus: &Corpus) -> SimilarityIndex {
    build_unchecked(corpus, VectorizerConfig::default())
}

pub fn build_index_with(corpus: &Corpus, config: VectorizerConfig) -> Result<SimilarityIndex, Error> {
    config.validate()?;
    Ok(build_unchecked(corpus, config))
}

/// Build with a config the caller has already validated.
pub(crate) fn build_unchecked(corpus: &Corpus, config: VectorizerConfig) -> SimilarityIndex {
    let num_docs = corpus.len();

    // First pass: raw counts per document and document frequency per term.
    let mut doc_counts: Vec<HashMap<String, u32>> = Vec::with_capacity(num_docs);
    let mut df: HashMap<String, usize> = HashMap::new();
    for doc in corpus.iter() {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in analyze(&doc.overview, config.ngram_range) {
            *counts.entry(term).or_insert(0) += 1;
        }
        for term in counts.keys() {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
        doc_counts.push(counts);
    }

    let mut admitted: Vec<(String, usize)> = df
        .into_iter()
        .filter(|(_, d)| config.admits(*d, num_docs))
        .collect();
    admitted.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut dictionary = HashMap::with_capacity(admitted.len());
    let mut terms = Vec::with_capacity(admitted.len());
    let mut dfs = Vec::with_capacity(admitted.len());
    let mut idf = Vec::with_capacity(admitted.len());
    for (tid, (term, d)) in admitted.into_iter().enumerate() {
        dictionary.insert(term.clone(), tid as TermId);
        terms.push(term);
        dfs.push(d as u32);
        idf.push(smoothed_idf(num_docs, d));
    }

    // Second pass: weighted, normalized rows.
    let rows: Vec<SparseVector> = doc_counts
        .into_iter()
        .map(|counts| {
            let ids: BTreeMap<TermId, u32> = counts
                .into_iter()
                .filter_map(|(term, tf)| dictionary.get(&term).map(|&tid| (tid, tf)))
                .collect();
            SparseVector::weighted(ids, &idf)
        })
        .collect();

    let empty_rows = rows.iter().filter(|r| r.is_empty()).count();
    tracing::debug!(num_docs, num_terms = terms.len(), empty_rows, "built similarity index");

    let num_columns = terms.len();
    SimilarityIndex {
        vocabulary: Vocabulary { dictionary, terms, df: dfs, idf, config },
        matrix: TermWeightMatrix { rows, num_columns },
        source: corpus.fingerprint(),
    }
}

/// Distinct in-vocabulary terms of `text`, in first-seen order.
pub fn matched_terms(vocabulary: &Vocabulary, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    analyze(text, vocabulary.config.ngram_range)
        .into_iter()
        .filter(|t| vocabulary.contains(t) && seen.insert(t.clone()))
        .collect()
}
