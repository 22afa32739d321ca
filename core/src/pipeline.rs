use crate::{Index, RawDocument, RegexTokenizer, TokenizedDocument, Tokenizer};

/// Text transformation followed by indexing, one document at a time in input
/// order.
#[derive(Debug, Clone, Default)]
pub struct IndexingProcess<T = RegexTokenizer> {
    tokenizer: T,
}

impl<T: Tokenizer> IndexingProcess<T> {
    pub fn new(tokenizer: T) -> Self { Self { tokenizer } }

    pub fn transform_document(&self, doc: &RawDocument) -> TokenizedDocument {
        TokenizedDocument::new(doc.doc_id.clone(), self.tokenizer.tokenize(&doc.text))
    }

    /// Index `documents` into a fresh `I`.
    pub fn run<I, D>(&self, documents: D) -> I
    where
        I: Index + Default,
        D: IntoIterator<Item = RawDocument>,
    {
        self.run_into(documents, I::default())
    }

    /// Index `documents` into `index`, which is expected to be empty.
    pub fn run_into<I, D>(&self, documents: D, mut index: I) -> I
    where
        I: Index,
        D: IntoIterator<Item = RawDocument>,
    {
        let mut num_docs = 0usize;
        let mut num_tokens = 0usize;
        for doc in documents {
            let transformed = self.transform_document(&doc);
            tracing::trace!(doc_id = %transformed.doc_id, tokens = transformed.tokens.len(), "indexing document");
            num_docs += 1;
            num_tokens += transformed.tokens.len();
            index.add_document(transformed);
        }
        tracing::info!(num_docs, num_tokens, "ingested documents");
        index
    }
}
