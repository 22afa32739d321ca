//! Tokenization, TF-IDF inverted indexing and ranked conjunctive search.

pub mod documents;
pub mod error;
pub mod eval;
pub mod index;
pub mod naive;
pub mod persist;
pub mod pipeline;
pub mod query;
pub mod source;
pub mod tokenizer;

pub use documents::{DocumentCollection, RawDocument, TokenizedDocument};
pub use error::{Error, Result};
pub use index::{Index, IndexKind, Posting, ScoredDoc, TfIdfIndex};
pub use naive::NaiveIndex;
pub use pipeline::IndexingProcess;
pub use query::{
    DocIdsFormatter, NaiveQueryParser, Query, QueryParser, QueryProcess, ResultFormatter, SearchResults,
    TitlesFormatter,
};
pub use source::{DocumentSource, FileSource};
pub use tokenizer::{tokenize, RegexTokenizer, Tokenizer};
