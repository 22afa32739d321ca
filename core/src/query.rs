use crate::{DocumentCollection, Index, RegexTokenizer, Tokenizer};
use std::fmt::Write as _;

/// A parsed query. Terms keep their order and duplicates; a duplicated term
/// contributes to the score once per occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub terms: Vec<String>,
    pub max_results: usize,
}

impl Query {
    pub fn new(terms: Vec<String>, max_results: usize) -> Self {
        Self { terms, max_results }
    }
}

/// Matching doc ids, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub doc_ids: Vec<String>,
}

impl SearchResults {
    pub fn new(doc_ids: Vec<String>) -> Self { Self { doc_ids } }

    pub fn len(&self) -> usize { self.doc_ids.len() }

    pub fn is_empty(&self) -> bool { self.doc_ids.is_empty() }
}

/// Converts the text a user typed into a structured [`Query`].
pub trait QueryParser: Send + Sync {
    fn parse_query(&self, query_str: &str, max_results: usize) -> Query;
}

/// Parses a query by running it through a tokenizer.
#[derive(Debug, Clone, Default)]
pub struct NaiveQueryParser<T = RegexTokenizer> {
    tokenizer: T,
}

impl<T: Tokenizer> NaiveQueryParser<T> {
    pub fn new(tokenizer: T) -> Self { Self { tokenizer } }
}

impl<T: Tokenizer> QueryParser for NaiveQueryParser<T> {
    fn parse_query(&self, query_str: &str, max_results: usize) -> Query {
        Query::new(self.tokenizer.tokenize(query_str), max_results)
    }
}

/// Renders search results for display.
pub trait ResultFormatter: Send + Sync {
    fn format_results_for_display(&self, results: &SearchResults) -> String;
}

/// Shows the raw doc ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocIdsFormatter;

impl ResultFormatter for DocIdsFormatter {
    fn format_results_for_display(&self, results: &SearchResults) -> String {
        format!("{:?}", results.doc_ids)
    }
}

/// One `(<doc_id>) <title>` line per result.
#[derive(Debug, Clone)]
pub struct TitlesFormatter {
    documents: DocumentCollection,
}

impl TitlesFormatter {
    pub fn new(documents: DocumentCollection) -> Self { Self { documents } }
}

impl ResultFormatter for TitlesFormatter {
    fn format_results_for_display(&self, results: &SearchResults) -> String {
        let mut out = String::new();
        for doc_id in &results.doc_ids {
            let title = self.documents.get_doc(doc_id).map(|d| d.title.as_str()).unwrap_or("");
            let _ = writeln!(out, "({doc_id}) {title}");
        }
        out
    }
}

/// Parse, search and format, wired from interchangeable parts.
pub struct QueryProcess<P, I, F> {
    parser: P,
    index: I,
    formatter: F,
}

impl<P: QueryParser, I: Index, F: ResultFormatter> QueryProcess<P, I, F> {
    pub fn new(parser: P, index: I, formatter: F) -> Self {
        Self { parser, index, formatter }
    }

    pub fn parser(&self) -> &P { &self.parser }

    pub fn index(&self) -> &I { &self.index }

    pub fn search(&self, query_str: &str, max_results: usize) -> SearchResults {
        let query = self.parser.parse_query(query_str, max_results);
        self.index.search(&query)
    }

    pub fn run(&self, query_str: &str, max_results: usize) -> String {
        let results = self.search(query_str, max_results);
        tracing::debug!(query = query_str, hits = results.len(), "query processed");
        self.formatter.format_results_for_display(&results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawDocument, TfIdfIndex, TokenizedDocument};

    #[test]
    fn parse_query_tokenizes() {
        let parser = NaiveQueryParser::new(RegexTokenizer);
        let query = parser.parse_query("Cats, DOGS", 5);
        assert_eq!(query.terms, vec!["cats", ",", "dogs"]);
        assert_eq!(query.max_results, 5);
        assert!(parser.parse_query("", 5).terms.is_empty());
    }

    #[test]
    fn titles_formatter_lists_titles() {
        let docs: DocumentCollection = vec![
            RawDocument::new("1", "the cat sat", "Cats"),
            RawDocument::new("2", "the dog sat", "Dogs"),
        ]
        .into_iter()
        .collect();
        let formatter = TitlesFormatter::new(docs);
        let out = formatter.format_results_for_display(&SearchResults::new(vec!["2".into(), "9".into()]));
        assert_eq!(out, "(2) Dogs\n(9) \n");
    }

    #[test]
    fn doc_ids_formatter_is_debug_list() {
        let out = DocIdsFormatter.format_results_for_display(&SearchResults::new(vec!["a".into()]));
        assert_eq!(out, "[\"a\"]");
    }

    #[test]
    fn process_runs_end_to_end() {
        let mut index = TfIdfIndex::new();
        index.add_document(TokenizedDocument::new("1", vec!["cat".into(), "sat".into()]));
        index.add_document(TokenizedDocument::new("2", vec!["dog".into(), "sat".into()]));
        let process = QueryProcess::new(NaiveQueryParser::new(RegexTokenizer), index, DocIdsFormatter);
        assert_eq!(process.search("Cat", 10).doc_ids, vec!["1"]);
        assert_eq!(process.run("cat dog", 10), "[]");
    }
}
