//! Corpus ingestion from JSON, JSONL, or a directory of either.
//!
//! Records are normalized once here: missing text fields become empty strings,
//! cast entries may be plain names or `{ "name": ... }` objects, and records
//! without a usable id are skipped.

use crate::corpus::{Corpus, DocId, Document};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Load a corpus from a `.json`/`.jsonl` file or a directory of them.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && is_corpus_file(p) {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else {
        files.push(path.to_path_buf());
    }

    let mut documents = Vec::new();
    for file in &files {
        let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        let mut docs = if has_extension(file, "jsonl") {
            parse_jsonl(&text)
        } else {
            parse_json(&text).with_context(|| format!("parsing {}", file.display()))?
        };
        documents.append(&mut docs);
    }

    let corpus = Corpus::new(dedup(documents))?;
    tracing::info!(num_docs = corpus.len(), files = files.len(), "loaded corpus");
    Ok(corpus)
}

fn has_extension(p: &Path, ext: &str) -> bool {
    p.extension().and_then(|s| s.to_str()) == Some(ext)
}

fn is_corpus_file(p: &Path) -> bool {
    has_extension(p, "json") || has_extension(p, "jsonl")
}

/// Parse a JSON array of records, or a single record object.
pub fn parse_json(text: &str) -> Result<Vec<Document>> {
    let json: Value = serde_json::from_str(text)?;
    Ok(match json {
        Value::Array(arr) => arr.iter().filter_map(document_from_value).collect(),
        Value::Object(_) => document_from_value(&json).into_iter().collect(),
        _ => Vec::new(),
    })
}

/// Parse one record per line; blank and unparseable lines are skipped.
pub fn parse_jsonl(text: &str) -> Vec<Document> {
    let mut docs = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        match serde_json::from_str::<Value>(line) {
            Ok(v) => docs.extend(document_from_value(&v)),
            Err(err) => tracing::warn!(line = lineno + 1, %err, "skipping malformed record"),
        }
    }
    docs
}

/// Normalize one loosely-shaped record. Returns `None` only when no id can be read.
pub fn document_from_value(value: &Value) -> Option<Document> {
    let Some(id) = value.get("id").and_then(read_id) else {
        tracing::warn!(title = ?value.get("title"), "skipping record without a usable id");
        return None;
    };
    let text = |key: &str| value.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    let cast = value
        .get("cast")
        .or_else(|| value.get("actors"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(cast_name).collect())
        .unwrap_or_default();
    Some(Document { id, title: text("title"), overview: text("overview"), cast })
}

fn read_id(v: &Value) -> Option<DocId> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cast_name(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => v.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Keep the first record for each id.
fn dedup(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|d| {
            let fresh = seen.insert(d.id);
            if !fresh {
                tracing::warn!(id = d.id, title = %d.title, "skipping duplicate id");
            }
            fresh
        })
        .collect()
}
