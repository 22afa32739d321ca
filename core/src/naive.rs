//! Unranked index: keeps whole tokenized documents and answers a query with
//! the first documents whose token set contains every query term.

use crate::error::Result;
use crate::persist::{load_documents, save_documents};
use crate::{Index, Query, SearchResults, TokenizedDocument};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct NaiveIndex {
    docs: Vec<TokenizedDocument>,
}

impl NaiveIndex {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

impl Index for NaiveIndex {
    fn add_document(&mut self, doc: TokenizedDocument) {
        self.docs.push(doc);
    }

    fn search(&self, query: &Query) -> SearchResults {
        if query.terms.is_empty() {
            return SearchResults::default();
        }
        let wanted: HashSet<&str> = query.terms.iter().map(String::as_str).collect();
        let doc_ids = self
            .docs
            .iter()
            .filter(|doc| {
                let present: HashSet<&str> = doc.tokens.iter().map(String::as_str).collect();
                wanted.is_subset(&present)
            })
            .take(query.max_results)
            .map(|doc| doc.doc_id.clone())
            .collect();
        SearchResults::new(doc_ids)
    }

    fn read(&mut self, path: &Path) -> Result<()> {
        self.docs = load_documents(path)?;
        tracing::info!(path = %path.display(), num_docs = self.docs.len(), "loaded naive index");
        Ok(())
    }

    fn write(&self, path: &Path) -> Result<()> {
        save_documents(path, &self.docs)?;
        tracing::info!(path = %path.display(), num_docs = self.docs.len(), "wrote naive index");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tokenize, Error};
    use tempfile::tempdir;

    fn build() -> NaiveIndex {
        let mut index = NaiveIndex::new();
        index.add_document(TokenizedDocument::new("1", tokenize("the cat sat")));
        index.add_document(TokenizedDocument::new("2", tokenize("the dog sat")));
        index.add_document(TokenizedDocument::new("3", tokenize("a cat and a dog")));
        index
    }

    fn query(terms: &[&str], max_results: usize) -> Query {
        Query::new(terms.iter().map(|t| t.to_string()).collect(), max_results)
    }

    #[test]
    fn returns_supersets_in_insertion_order() {
        let index = build();
        assert_eq!(index.search(&query(&["sat"], 10)).doc_ids, vec!["1", "2"]);
        assert_eq!(index.search(&query(&["cat", "dog"], 10)).doc_ids, vec!["3"]);
        assert_eq!(index.search(&query(&["cat"], 1)).doc_ids, vec!["1"]);
    }

    #[test]
    fn empty_or_unknown_queries_match_nothing() {
        let index = build();
        assert!(index.search(&query(&[], 10)).doc_ids.is_empty());
        assert!(index.search(&query(&["bird"], 10)).doc_ids.is_empty());
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("naive.json");
        let index = build();
        index.write(&path).unwrap();

        let mut loaded = NaiveIndex::new();
        loaded.read(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.search(&query(&["cat"], 10)).doc_ids, vec!["1", "3"]);
    }

    #[test]
    fn records_without_tokens_are_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("naive.json");
        std::fs::write(&path, r#"[{"doc_id": "1"}]"#).unwrap();
        let err = NaiveIndex::new().read(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { .. }));
    }
}
