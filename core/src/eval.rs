//! Offline evaluation of search quality against human relevance judgments.

use crate::error::{Error, Result};
use crate::{Index, QueryParser, QueryProcess, ResultFormatter};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One judged (or unjudged) result for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalEntry {
    pub query_id: u32,
    pub result_doc_id: String,
    pub eval_value: i32,
}

#[derive(Debug, Deserialize)]
struct QueryLine {
    #[serde(rename = "_id")]
    id: QueryId,
    metadata: QueryMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryId {
    Number(u32),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct QueryMetadata {
    query: String,
}

fn malformed(path: &Path, line: usize, reason: impl ToString) -> Error {
    Error::MalformedEvaluation { path: path.to_path_buf(), line, reason: reason.to_string() }
}

/// Query id to query text, from a JSON-lines queries file.
pub fn read_queries(path: &Path) -> Result<BTreeMap<u32, String>> {
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut queries = BTreeMap::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() { continue; }
        let record: QueryLine = serde_json::from_str(&line).map_err(|e| malformed(path, i + 1, e))?;
        let id = match record.id {
            QueryId::Number(n) => n,
            QueryId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| malformed(path, i + 1, format!("query id '{s}' is not an integer")))?,
        };
        queries.insert(id, record.metadata.query);
    }
    Ok(queries)
}

/// Run every query through `process`, keeping `max_results` doc ids each.
pub fn run_queries<P, I, F>(
    queries: &BTreeMap<u32, String>,
    process: &QueryProcess<P, I, F>,
    max_results: usize,
) -> BTreeMap<u32, Vec<String>>
where
    P: QueryParser,
    I: Index,
    F: ResultFormatter,
{
    queries
        .iter()
        .map(|(&id, text)| (id, process.search(text, max_results).doc_ids))
        .collect()
}

/// Relevance judgments from a whitespace separated file whose first line is a
/// header: `query-id corpus-id score`.
pub fn read_judgments(path: &Path) -> Result<Vec<EvalEntry>> {
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut out = Vec::new();
    for (i, line) in BufReader::new(f).lines().enumerate().skip(1) {
        let line = line.map_err(|e| Error::io(path, e))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() { continue; }
        let [query_id, doc_id, value] = fields.as_slice() else {
            return Err(malformed(path, i + 1, format!("expected 3 fields, found {}", fields.len())));
        };
        out.push(EvalEntry {
            query_id: query_id.parse().map_err(|_| malformed(path, i + 1, "query id is not an integer"))?,
            result_doc_id: doc_id.to_string(),
            eval_value: value.parse().map_err(|_| malformed(path, i + 1, "score is not an integer"))?,
        });
    }
    Ok(out)
}

/// Attach the judged value to every result; unjudged results count as 0.
pub fn annotate_results(results: &BTreeMap<u32, Vec<String>>, judgments: &[EvalEntry]) -> Vec<EvalEntry> {
    // The first judgment for a (query, doc) pair wins.
    let mut lookup: HashMap<(u32, &str), i32> = HashMap::with_capacity(judgments.len());
    for e in judgments {
        lookup.entry((e.query_id, e.result_doc_id.as_str())).or_insert(e.eval_value);
    }
    results
        .iter()
        .flat_map(|(&query_id, doc_ids)| {
            let lookup = &lookup;
            doc_ids.iter().map(move |doc_id| EvalEntry {
                query_id,
                result_doc_id: doc_id.clone(),
                eval_value: lookup.get(&(query_id, doc_id.as_str())).copied().unwrap_or(0),
            })
        })
        .collect()
}

pub fn score_by_sum_of_eval_values(annotated: &[EvalEntry]) -> i64 {
    annotated.iter().map(|e| i64::from(e.eval_value)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocIdsFormatter, IndexingProcess, NaiveQueryParser, RawDocument, RegexTokenizer, TfIdfIndex};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_queries_with_string_or_numeric_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queries.jsonl");
        fs::write(
            &path,
            "{\"_id\": \"1\", \"text\": \"x\", \"metadata\": {\"query\": \"cat\"}}\n{\"_id\": 2, \"metadata\": {\"query\": \"dog\"}}\n",
        )
        .unwrap();
        let queries = read_queries(&path).unwrap();
        assert_eq!(queries.get(&1).map(String::as_str), Some("cat"));
        assert_eq!(queries.get(&2).map(String::as_str), Some("dog"));
    }

    #[test]
    fn judgments_skip_header_and_reject_short_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tests.tsv");
        fs::write(&path, "query-id\tcorpus-id\tscore\n1\td1\t2\n1\td2\t1\n").unwrap();
        let judged = read_judgments(&path).unwrap();
        assert_eq!(judged.len(), 2);
        assert_eq!(judged[0], EvalEntry { query_id: 1, result_doc_id: "d1".into(), eval_value: 2 });

        fs::write(&path, "header\n1\td1\n").unwrap();
        assert!(matches!(read_judgments(&path), Err(Error::MalformedEvaluation { line: 2, .. })));
    }

    #[test]
    fn scores_annotated_results() {
        let process = IndexingProcess::new(RegexTokenizer);
        let index: TfIdfIndex = process.run(vec![
            RawDocument::new("d1", "cat food", "A"),
            RawDocument::new("d2", "cat toys", "B"),
            RawDocument::new("d3", "dog toys", "C"),
        ]);
        let query_process = QueryProcess::new(NaiveQueryParser::new(RegexTokenizer), index, DocIdsFormatter);

        let queries: BTreeMap<u32, String> = [(1, "cat".to_string()), (2, "toys dog".to_string())].into();
        let results = run_queries(&queries, &query_process, 10);
        assert_eq!(results[&1], vec!["d1", "d2"]);
        assert_eq!(results[&2], vec!["d3"]);

        let judgments = vec![
            EvalEntry { query_id: 1, result_doc_id: "d2".into(), eval_value: 2 },
            EvalEntry { query_id: 2, result_doc_id: "d3".into(), eval_value: 1 },
            EvalEntry { query_id: 2, result_doc_id: "d1".into(), eval_value: 5 },
        ];
        let annotated = annotate_results(&results, &judgments);
        assert_eq!(annotated.len(), 3);
        assert_eq!(annotated[0].eval_value, 0);
        assert_eq!(score_by_sum_of_eval_values(&annotated), 3);
    }

    #[test]
    fn first_duplicate_judgment_wins() {
        let results: BTreeMap<u32, Vec<String>> = [(1, vec!["d1".to_string()])].into();
        let judgments = vec![
            EvalEntry { query_id: 1, result_doc_id: "d1".into(), eval_value: 2 },
            EvalEntry { query_id: 1, result_doc_id: "d1".into(), eval_value: 0 },
        ];
        let annotated = annotate_results(&results, &judgments);
        assert_eq!(annotated, vec![EvalEntry { query_id: 1, result_doc_id: "d1".into(), eval_value: 2 }]);
    }
}
