use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use search_core::{DocumentCollection, DocumentSource, FileSource, Index, IndexKind, NaiveQueryParser, QueryParser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

/// Everything `build_app` needs; `main` fills it from flags and environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub index: PathBuf,
    pub kind: IndexKind,
    /// Optional corpus for titles, snippets and `/doc/:doc_id`.
    pub corpus: Option<PathBuf>,
    pub admin_token: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub index_path: PathBuf,
    pub kind: IndexKind,
    // Searches share the read guard; a reload swaps the whole index under the write guard.
    pub index: Arc<RwLock<Box<dyn Index>>>,
    pub parser: Arc<NaiveQueryParser>,
    pub docs: Arc<DocumentCollection>,
    pub admin_token: Option<String>,
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let index = config.kind.load(&config.index)?;
    let docs = match &config.corpus {
        Some(path) => FileSource::new(path).read()?,
        None => DocumentCollection::new(),
    };
    let app_state = AppState {
        index_path: config.index,
        kind: config.kind,
        index: Arc::new(RwLock::new(index)),
        parser: Arc::new(NaiveQueryParser::default()),
        docs: Arc::new(docs),
        admin_token: config.admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);
    let query = state.parser.parse_query(&params.q, k);
    let results = state.index.read().search(&query);

    let hits = results
        .doc_ids
        .into_iter()
        .map(|doc_id| {
            let doc = state.docs.get_doc(&doc_id);
            SearchHit {
                title: doc.map(|d| d.title.clone()),
                snippet: doc.and_then(|d| snippet(&d.text, &query.terms)),
                doc_id,
            }
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(q = %params.q, k, took_s = elapsed.as_secs_f64(), "search");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), results: hits })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.docs.get_doc(&doc_id) {
        Some(doc) => Ok(Json(serde_json::json!({
            "doc_id": doc.doc_id,
            "title": doc.title,
            "text": doc.text,
        }))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

/// Re-read the index file and swap it in.
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let fresh = state.kind.load(&state.index_path).map_err(|e| {
        tracing::error!(error = %e, "index reload failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    *state.index.write() = fresh;
    tracing::info!(path = %state.index_path.display(), kind = %state.kind, "index reloaded");
    Ok(Json(serde_json::json!({ "status": "reloaded" })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

const SNIPPET_BEFORE: usize = 100;
const SNIPPET_AFTER: usize = 200;

/// A window of `text` around the first query term found, with every term
/// wrapped in `<em>`. Falls back to the opening of the text.
fn snippet(text: &str, terms: &[String]) -> Option<String> {
    if text.is_empty() { return None; }
    let pattern = term_pattern(terms);
    let window = match pattern.as_ref().and_then(|re| re.find(text)) {
        Some(m) => {
            let start = floor_char_boundary(text, m.start().saturating_sub(SNIPPET_BEFORE));
            let end = floor_char_boundary(text, (m.start() + SNIPPET_AFTER).min(text.len()));
            &text[start..end]
        }
        None => &text[..floor_char_boundary(text, SNIPPET_AFTER.min(text.len()))],
    };
    Some(match &pattern {
        Some(re) => re.replace_all(window, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).into_owned(),
        None => window.to_string(),
    })
}

// Only word-like terms are highlighted; punctuation tokens would light up every comma.
fn term_pattern(terms: &[String]) -> Option<regex::Regex> {
    let alternatives: Vec<String> = terms
        .iter()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .map(|t| regex::escape(t))
        .collect();
    if alternatives.is_empty() { return None; }
    regex::RegexBuilder::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
        .case_insensitive(true)
        .build()
        .ok()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
