use crate::error::{Error, Result};
use crate::naive::NaiveIndex;
use crate::persist::{load_records, save_records, MetaRecord, PostingRecord, TermRecord};
use crate::{Query, SearchResults, TokenizedDocument};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The capability set shared by every index implementation.
///
/// An index is either built with `add_document` and then written, or read
/// from storage and then queried. The two lifecycles never mix on one value.
pub trait Index: Send + Sync {
    fn add_document(&mut self, doc: TokenizedDocument);
    fn search(&self, query: &Query) -> SearchResults;
    /// Replace the in-memory state with the index stored at `path`.
    fn read(&mut self, path: &Path) -> Result<()>;
    fn write(&self, path: &Path) -> Result<()>;
}

impl<I: Index + ?Sized> Index for Box<I> {
    fn add_document(&mut self, doc: TokenizedDocument) { (**self).add_document(doc) }
    fn search(&self, query: &Query) -> SearchResults { (**self).search(query) }
    fn read(&mut self, path: &Path) -> Result<()> { (**self).read(path) }
    fn write(&self, path: &Path) -> Result<()> { (**self).write(path) }
}

/// Selects an index implementation at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    Naive,
    #[default]
    TfIdf,
}

impl IndexKind {
    /// A fresh, empty index of this kind.
    pub fn create(self) -> Box<dyn Index> {
        match self {
            IndexKind::Naive => Box::new(NaiveIndex::new()),
            IndexKind::TfIdf => Box::new(TfIdfIndex::new()),
        }
    }

    pub fn load(self, path: &Path) -> Result<Box<dyn Index>> {
        let mut index = self.create();
        index.read(path)?;
        Ok(index)
    }
}

impl FromStr for IndexKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" => Ok(IndexKind::Naive),
            "tfidf" | "tf-idf" => Ok(IndexKind::TfIdf),
            other => Err(format!("unknown index kind '{other}', expected 'naive' or 'tfidf'")),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Naive => f.write_str("naive"),
            IndexKind::TfIdf => f.write_str("tfidf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc_id: String,
    /// Occurrences of the term divided by the document's token count.
    pub term_frequency: f64,
}

/// A ranked hit, as produced by [`TfIdfIndex::search_scored`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: String,
    pub score: f64,
}

pub fn term_frequency(term_count: u32, document_length: usize) -> f64 {
    term_count as f64 / document_length as f64
}

/// `ln(N / df)` without smoothing. Callers guarantee `document_frequency > 0`.
pub fn inverse_document_frequency(document_frequency: u32, number_of_documents: u32) -> f64 {
    (number_of_documents as f64 / document_frequency as f64).ln()
}

/// Inverted index with per-document term frequencies, searched by
/// conjunctive TF-IDF ranking.
#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    document_count: u32,
    document_frequency: HashMap<String, u32>,
    // term -> doc_id -> tf
    postings: HashMap<String, HashMap<String, f64>>,
}

impl TfIdfIndex {
    pub fn new() -> Self { Self::default() }

    pub fn document_count(&self) -> u32 { self.document_count }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn document_frequency(&self, term: &str) -> Option<u32> {
        self.document_frequency.get(term).copied()
    }

    /// Postings for `term`, ordered by doc_id.
    pub fn postings(&self, term: &str) -> Option<Vec<Posting>> {
        let plist = self.postings.get(term)?;
        let mut out: Vec<Posting> = plist
            .iter()
            .map(|(doc_id, &tf)| Posting { doc_id: doc_id.clone(), term_frequency: tf })
            .collect();
        out.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));
        Some(out)
    }

    /// Conjunctive search returning scores alongside ids. Results are ordered
    /// by descending score, then ascending doc_id, and capped at
    /// `query.max_results`.
    pub fn search_scored(&self, query: &Query) -> Vec<ScoredDoc> {
        if query.terms.is_empty() {
            return Vec::new();
        }

        // Any unknown term empties the result set.
        let mut weighted: Vec<(&HashMap<String, f64>, f64)> = Vec::with_capacity(query.terms.len());
        for term in &query.terms {
            match (self.postings.get(term), self.document_frequency.get(term)) {
                (Some(plist), Some(&df)) => {
                    weighted.push((plist, inverse_document_frequency(df, self.document_count)))
                }
                _ => return Vec::new(),
            }
        }

        let Some(smallest) = weighted.iter().map(|(plist, _)| *plist).min_by_key(|plist| plist.len()) else {
            return Vec::new();
        };
        let candidates: Vec<&String> = smallest
            .keys()
            .filter(|doc_id| weighted.iter().all(|(plist, _)| plist.contains_key(*doc_id)))
            .collect();

        let mut scored: Vec<ScoredDoc> = candidates
            .into_iter()
            .map(|doc_id| {
                let score = weighted.iter().map(|(plist, idf)| plist[doc_id] * idf).sum();
                ScoredDoc { doc_id: doc_id.clone(), score }
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id)));
        scored.truncate(query.max_results);
        scored
    }

    fn to_records(&self) -> Vec<TermRecord> {
        let mut terms: Vec<&String> = self.postings.keys().collect();
        terms.sort();
        terms
            .into_iter()
            .map(|term| TermRecord {
                term: term.clone(),
                documents_count: self.document_frequency.get(term).copied().unwrap_or_default(),
                index: self
                    .postings(term)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| PostingRecord { doc_id: p.doc_id, tf: p.term_frequency })
                    .collect(),
            })
            .collect()
    }
}

impl Index for TfIdfIndex {
    fn add_document(&mut self, doc: TokenizedDocument) {
        self.document_count += 1;

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for token in &doc.tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let length = doc.tokens.len();
        let mut replaced = false;
        for (term, count) in counts {
            let tf = term_frequency(count, length);
            let plist = self.postings.entry(term.to_string()).or_default();
            if plist.insert(doc.doc_id.clone(), tf).is_some() {
                replaced = true;
            } else {
                *self.document_frequency.entry(term.to_string()).or_insert(0) += 1;
            }
        }
        if replaced {
            tracing::warn!(doc_id = %doc.doc_id, "document id indexed more than once, postings replaced");
        }
    }

    fn search(&self, query: &Query) -> SearchResults {
        let hits = self.search_scored(query);
        tracing::debug!(terms = ?query.terms, hits = hits.len(), "tf-idf search");
        SearchResults::new(hits.into_iter().map(|hit| hit.doc_id).collect())
    }

    fn read(&mut self, path: &Path) -> Result<()> {
        let (meta, records) = load_records(path)?;

        let mut document_frequency = HashMap::with_capacity(records.len());
        let mut postings = HashMap::with_capacity(records.len());
        for (line, record) in records {
            if record.documents_count as usize != record.index.len() {
                return Err(Error::malformed_index(
                    path,
                    line,
                    format!(
                        "term '{}' has documents_count {} but {} postings",
                        record.term,
                        record.documents_count,
                        record.index.len()
                    ),
                ));
            }
            if record.documents_count > meta.number_of_documents {
                return Err(Error::malformed_index(
                    path,
                    line,
                    format!(
                        "term '{}' has documents_count {} but the index holds {} documents",
                        record.term, record.documents_count, meta.number_of_documents
                    ),
                ));
            }
            let mut plist = HashMap::with_capacity(record.index.len());
            for posting in record.index {
                // tf is a share of a document's tokens: finite and in (0, 1].
                if !(posting.tf.is_finite() && posting.tf > 0.0 && posting.tf <= 1.0) {
                    return Err(Error::malformed_index(
                        path,
                        line,
                        format!("term '{}' has tf {} for document '{}'", record.term, posting.tf, posting.doc_id),
                    ));
                }
                if plist.insert(posting.doc_id.clone(), posting.tf).is_some() {
                    return Err(Error::malformed_index(
                        path,
                        line,
                        format!("term '{}' lists document '{}' twice", record.term, posting.doc_id),
                    ));
                }
            }
            match postings.entry(record.term.clone()) {
                Entry::Occupied(_) => {
                    return Err(Error::malformed_index(path, line, format!("duplicate term '{}'", record.term)))
                }
                Entry::Vacant(slot) => {
                    slot.insert(plist);
                }
            }
            document_frequency.insert(record.term, record.documents_count);
        }

        self.document_count = meta.number_of_documents;
        self.document_frequency = document_frequency;
        self.postings = postings;
        tracing::info!(path = %path.display(), num_docs = self.document_count, num_terms = self.postings.len(), "loaded tf-idf index");
        Ok(())
    }

    fn write(&self, path: &Path) -> Result<()> {
        let meta = MetaRecord { number_of_documents: self.document_count };
        save_records(path, &meta, self.to_records())?;
        tracing::info!(path = %path.display(), num_docs = self.document_count, num_terms = self.postings.len(), "wrote tf-idf index");
        Ok(())
    }
}
