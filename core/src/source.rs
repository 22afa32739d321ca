//! Document acquisition from JSON files on disk.

use crate::error::{Error, Result};
use crate::{DocumentCollection, RawDocument};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Anything that can hand over a finite set of raw documents.
pub trait DocumentSource {
    fn read(&self) -> Result<DocumentCollection>;
}

// Accepts the field names used by the corpora we ingest: wiki dumps
// (`id`, `init_text`), BEIR/TREC-COVID (`_id`, `text`) and plain exports
// (`doc_id`, `body`).
#[derive(Debug, Deserialize)]
struct InputDoc {
    #[serde(alias = "_id", alias = "doc_id")]
    id: IdValue,
    #[serde(default, alias = "init_text", alias = "body")]
    text: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(i64),
}

impl From<InputDoc> for RawDocument {
    fn from(doc: InputDoc) -> Self {
        let doc_id = match doc.id {
            IdValue::Text(s) => s,
            IdValue::Number(n) => n.to_string(),
        };
        RawDocument::new(doc_id, doc.text.unwrap_or_default(), doc.title.unwrap_or_default())
    }
}

/// Reads `.json` (array or single object) and `.jsonl` files. A directory is
/// walked recursively and its matching files read in path order.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn files(&self) -> Result<Vec<PathBuf>> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }
        if !self.path.is_dir() {
            return Err(Error::io(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            ));
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && matches!(extension(p), Some("json" | "jsonl")))
            .collect();
        files.sort();
        Ok(files)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

impl DocumentSource for FileSource {
    fn read(&self) -> Result<DocumentCollection> {
        let mut docs = DocumentCollection::new();
        for file in self.files()? {
            if extension(&file) == Some("jsonl") {
                read_jsonl(&file, &mut docs)?;
            } else {
                read_json(&file, &mut docs)?;
            }
        }
        tracing::info!(path = %self.path.display(), num_docs = docs.len(), "read documents");
        Ok(docs)
    }
}

fn read_jsonl(file: &Path, docs: &mut DocumentCollection) -> Result<()> {
    let f = File::open(file).map_err(|e| Error::io(file, e))?;
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.map_err(|e| Error::io(file, e))?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line).map_err(|e| malformed(file, i + 1, e))?;
        docs.insert(doc.into());
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut DocumentCollection) -> Result<()> {
    let text = std::fs::read_to_string(file).map_err(|e| Error::io(file, e))?;
    // Decode straight into records so errors carry the line they occur on.
    let records: Vec<InputDoc> = match text.trim_start().chars().next() {
        Some('[') => serde_json::from_str(&text).map_err(|e| malformed(file, e.line(), e))?,
        Some('{') => vec![serde_json::from_str(&text).map_err(|e| malformed(file, e.line(), e))?],
        _ => return Err(malformed(file, 1, "expected an object or an array of objects")),
    };
    for doc in records {
        docs.insert(doc.into());
    }
    Ok(())
}

fn malformed(path: &Path, line: usize, reason: impl ToString) -> Error {
    Error::MalformedDocument { path: path.to_path_buf(), line, reason: reason.to_string() }
}
