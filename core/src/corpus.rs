use crate::Error;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::fmt;

pub type DocId = u64;

/// One movie record. Missing `overview`/`cast` default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub cast: Vec<String>,
}

impl Document {
    pub fn new<S: Into<String>>(
        id: DocId,
        title: impl Into<String>,
        overview: impl Into<String>,
        cast: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            overview: overview.into(),
            cast: cast.into_iter().map(Into::into).collect(),
        }
    }
}

/// SHA-1 over the full content of a corpus, used as its snapshot identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 20]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Ordered, immutable set of documents with unique ids.
///
/// A document's position is its row in any index built from this corpus.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
    fingerprint: Fingerprint,
}

impl Default for Corpus {
    fn default() -> Self { Self::from_unique(Vec::new()) }
}

impl Corpus {
    /// Build a corpus, rejecting duplicate ids.
    pub fn new(documents: Vec<Document>) -> Result<Self, Error> {
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in &documents {
            if !seen.insert(doc.id) {
                return Err(Error::DuplicateId(doc.id));
            }
        }
        Ok(Self::from_unique(documents))
    }

    pub fn empty() -> Self { Self::default() }

    fn from_unique(documents: Vec<Document>) -> Self {
        let fingerprint = fingerprint(&documents);
        Self { documents, fingerprint }
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn iter(&self) -> impl Iterator<Item = &Document> + '_ { self.documents.iter() }

    /// Document at a row position.
    pub fn get(&self, row: usize) -> Option<&Document> { self.documents.get(row) }

    /// Document by its caller-assigned id.
    pub fn find(&self, id: DocId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn fingerprint(&self) -> Fingerprint { self.fingerprint }
}

fn fingerprint(documents: &[Document]) -> Fingerprint {
    fn put_str(h: &mut Sha1, s: &str) {
        h.update((s.len() as u64).to_le_bytes());
        h.update(s.as_bytes());
    }
    let mut h = Sha1::new();
    h.update((documents.len() as u64).to_le_bytes());
    for doc in documents {
        h.update(doc.id.to_le_bytes());
        put_str(&mut h, &doc.title);
        put_str(&mut h, &doc.overview);
        h.update((doc.cast.len() as u64).to_le_bytes());
        for name in &doc.cast {
            put_str(&mut h, name);
        }
    }
    let digest = h.finalize();
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    Fingerprint(out)
}
