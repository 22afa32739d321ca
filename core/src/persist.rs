//! Line-oriented JSON storage for the ranked index, and a JSON array dump for
//! the naive index.
//!
//! The ranked index file holds one metadata record on its first line followed
//! by one record per term:
//!
//! ```text
//! {"number_of_documents":2}
//! {"term":"cat","documents_count":1,"index":[{"doc_id":"1","tf":0.3333333333333333}]}
//! ```

use crate::error::{Error, Result};
use crate::TokenizedDocument;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaRecord {
    pub number_of_documents: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingRecord {
    pub doc_id: String,
    pub tf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    pub term: String,
    pub documents_count: u32,
    pub index: Vec<PostingRecord>,
}

/// Write the metadata line followed by one line per term record.
pub fn save_records<I>(path: &Path, meta: &MetaRecord, terms: I) -> Result<()>
where
    I: IntoIterator<Item = TermRecord>,
{
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_line(&mut out, path, meta)?;
    for record in terms {
        write_line(&mut out, path, &record)?;
    }
    out.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

fn write_line<W: Write, T: Serialize>(out: &mut W, path: &Path, record: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, record).map_err(|e| Error::io(path, e.into()))?;
    out.write_all(b"\n").map_err(|e| Error::io(path, e))
}

/// Read the metadata record and every term record, tagged with its 1-based
/// line number. Blank lines are skipped.
pub fn load_records(path: &Path) -> Result<(MetaRecord, Vec<(usize, TermRecord)>)> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut meta: Option<MetaRecord> = None;
    let mut terms = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() { continue; }
        if meta.is_none() {
            let record: MetaRecord = serde_json::from_str(&line)
                .map_err(|e| Error::malformed_index(path, line_no, format!("bad metadata record: {e}")))?;
            meta = Some(record);
        } else {
            let record: TermRecord = serde_json::from_str(&line)
                .map_err(|e| Error::malformed_index(path, line_no, format!("bad term record: {e}")))?;
            terms.push((line_no, record));
        }
    }

    let meta = meta.ok_or_else(|| Error::malformed_index(path, 1, "missing metadata record"))?;
    Ok((meta, terms))
}

/// Dump tokenized documents as a single JSON array.
pub fn save_documents(path: &Path, docs: &[TokenizedDocument]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, docs).map_err(|e| Error::io(path, e.into()))?;
    out.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

pub fn load_documents(path: &Path) -> Result<Vec<TokenizedDocument>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            Error::io(path, e.into())
        } else {
            Error::malformed_index(path, e.line(), e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn records_survive_a_write_read_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.jsonl");
        let record = TermRecord {
            term: "cat".into(),
            documents_count: 1,
            index: vec![PostingRecord { doc_id: "1".into(), tf: 1.0 / 3.0 }],
        };
        save_records(&path, &MetaRecord { number_of_documents: 2 }, vec![record.clone()]).unwrap();

        let (meta, terms) = load_records(&path).unwrap();
        assert_eq!(meta.number_of_documents, 2);
        assert_eq!(terms, vec![(2, record)]);
    }

    #[test]
    fn writes_one_record_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.jsonl");
        save_records(&path, &MetaRecord { number_of_documents: 0 }, Vec::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"number_of_documents\":0}\n");
    }

    #[test]
    fn empty_file_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.jsonl");
        fs::write(&path, "").unwrap();
        assert!(matches!(load_records(&path), Err(Error::MalformedIndex { line: 1, .. })));
    }

    #[test]
    fn missing_field_reports_its_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.jsonl");
        fs::write(&path, "{\"number_of_documents\":1}\n{\"term\":\"a\",\"index\":[]}\n").unwrap();
        assert!(matches!(load_records(&path), Err(Error::MalformedIndex { line: 2, .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_records(&dir.path().join("nope.jsonl")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
