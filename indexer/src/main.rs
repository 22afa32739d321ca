use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_core::eval::{annotate_results, read_judgments, read_queries, run_queries, score_by_sum_of_eval_values};
use search_core::{
    DocIdsFormatter, DocumentSource, FileSource, Index, IndexKind, IndexingProcess, NaiveQueryParser, QueryProcess,
    RegexTokenizer, ResultFormatter, TitlesFormatter,
};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build, query and evaluate a TF-IDF inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output index file
        #[arg(long)]
        output: PathBuf,
        /// Index implementation: tfidf or naive
        #[arg(long, default_value_t = IndexKind::TfIdf)]
        kind: IndexKind,
    },
    /// Read queries from stdin and print results until a blank line
    Query {
        /// Index file written by `build`
        #[arg(long)]
        index: PathBuf,
        #[arg(long, default_value_t = IndexKind::TfIdf)]
        kind: IndexKind,
        /// Corpus used to show titles next to doc ids
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Number of results per query
        #[arg(short, long, default_value_t = 10)]
        k: usize,
    },
    /// Score results for a queries file against relevance judgments
    Eval {
        #[arg(long)]
        index: PathBuf,
        #[arg(long, default_value_t = IndexKind::TfIdf)]
        kind: IndexKind,
        /// JSONL queries file (`_id`, `metadata.query`)
        #[arg(long)]
        queries: PathBuf,
        /// Judgments file with a header line: query-id corpus-id score
        #[arg(long)]
        judgments: PathBuf,
        #[arg(short, long, default_value_t = 10)]
        k: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, kind } => build_index(&input, &output, kind),
        Commands::Query { index, kind, corpus, k } => {
            let index = load_index(&index, kind)?;
            match corpus {
                Some(path) => {
                    let docs = FileSource::new(&path).read()?;
                    interactive(QueryProcess::new(parser(), index, TitlesFormatter::new(docs)), k)
                }
                None => interactive(QueryProcess::new(parser(), index, DocIdsFormatter), k),
            }
        }
        Commands::Eval { index, kind, queries, judgments, k } => {
            let index = load_index(&index, kind)?;
            let process = QueryProcess::new(parser(), index, DocIdsFormatter);
            let queries = read_queries(&queries)?;
            let judgments = read_judgments(&judgments)?;
            let results = run_queries(&queries, &process, k);
            let annotated = annotate_results(&results, &judgments);
            let score = score_by_sum_of_eval_values(&annotated);
            tracing::info!(num_queries = queries.len(), num_results = annotated.len(), score, "evaluation complete");
            println!("{score}");
            Ok(())
        }
    }
}

fn parser() -> NaiveQueryParser<RegexTokenizer> {
    NaiveQueryParser::new(RegexTokenizer)
}

fn load_index(path: &Path, kind: IndexKind) -> Result<Box<dyn Index>> {
    kind.load(path).with_context(|| format!("loading {kind} index from {}", path.display()))
}

fn build_index(input: &Path, output: &Path, kind: IndexKind) -> Result<()> {
    let docs = FileSource::new(input).read()?;
    tracing::info!(num_docs = docs.len(), %kind, "building index");

    let process = IndexingProcess::new(RegexTokenizer);
    let index = process.run_into(docs, kind.create());
    index.write(output)?;

    tracing::info!(output = %output.display(), "index build complete");
    Ok(())
}

fn interactive<F: ResultFormatter>(process: QueryProcess<NaiveQueryParser<RegexTokenizer>, Box<dyn Index>, F>, k: usize) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "Please enter a query: ")?;
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let query = line?;
        if query.trim().is_empty() { break; }
        writeln!(stdout, "{}", process.run(&query, k))?;
    }
    Ok(())
}
