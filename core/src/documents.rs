use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A document as produced by acquisition, before any text transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub doc_id: String,
    pub text: String,
    pub title: String,
}

impl RawDocument {
    pub fn new(doc_id: impl Into<String>, text: impl Into<String>, title: impl Into<String>) -> Self {
        Self { doc_id: doc_id.into(), text: text.into(), title: title.into() }
    }
}

/// A document after tokenization. This is what the index consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedDocument {
    pub doc_id: String,
    pub tokens: Vec<String>,
}

impl TokenizedDocument {
    pub fn new(doc_id: impl Into<String>, tokens: Vec<String>) -> Self {
        Self { doc_id: doc_id.into(), tokens }
    }
}

/// In-memory document store keyed by `doc_id`. Iteration follows insertion
/// order; inserting an existing id replaces the stored document in place.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    docs: Vec<RawDocument>,
    positions: HashMap<String, usize>,
}

impl DocumentCollection {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, doc: RawDocument) {
        match self.positions.get(&doc.doc_id) {
            Some(&pos) => self.docs[pos] = doc,
            None => {
                self.positions.insert(doc.doc_id.clone(), self.docs.len());
                self.docs.push(doc);
            }
        }
    }

    pub fn get_doc(&self, doc_id: &str) -> Option<&RawDocument> {
        self.positions.get(doc_id).map(|&pos| &self.docs[pos])
    }

    /// Batch lookup. Ids that are not in the collection are skipped.
    pub fn get_docs<'a, I>(&self, doc_ids: I) -> DocumentCollection
    where
        I: IntoIterator<Item = &'a str>,
    {
        doc_ids
            .into_iter()
            .filter_map(|id| self.get_doc(id).cloned())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawDocument> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

impl FromIterator<RawDocument> for DocumentCollection {
    fn from_iter<T: IntoIterator<Item = RawDocument>>(iter: T) -> Self {
        let mut collection = DocumentCollection::new();
        for doc in iter {
            collection.insert(doc);
        }
        collection
    }
}

impl IntoIterator for DocumentCollection {
    type Item = RawDocument;
    type IntoIter = std::vec::IntoIter<RawDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a RawDocument;
    type IntoIter = std::slice::Iter<'a, RawDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}
