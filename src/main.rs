//! HTTP surface for the Ihya Tafsir corpus service

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ihya_tafsir::{library, reader, tafsir, ChapterMark, CorpusStore, TafsirError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Upper bound on the requested snippet context to keep payloads sane.
const MAX_CONTEXT_WORDS: usize = 500;

struct AppState {
    store: CorpusStore,
}

// === Request/Response types ===

#[derive(Deserialize)]
struct SurahQuery {
    id: String,
}

#[derive(Deserialize)]
struct AyahQuery {
    surah: String,
    ayah: String,
}

#[derive(Deserialize)]
struct BookQuery {
    id: String,
}

#[derive(Deserialize)]
struct SnippetQuery {
    book_id: String,
    word_start: usize,
    word_end: usize,
    context_words: Option<usize>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    surahs: usize,
}

#[derive(Serialize)]
struct SnippetResponse {
    snippet: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(e: TafsirError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        TafsirError::NotFound(_) => StatusCode::NOT_FOUND,
        TafsirError::Malformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let surahs = state.store.tafsir_index().map(|i| i.len()).unwrap_or(0);
    Json(HealthResponse {
        status: "ok".to_string(),
        surahs,
    })
}

async fn get_surahs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<tafsir::SurahSummary>>, (StatusCode, Json<ErrorResponse>)> {
    tafsir::surahs(&state.store).map(Json).map_err(error_response)
}

async fn get_surah(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SurahQuery>,
) -> Result<Json<tafsir::SurahView>, (StatusCode, Json<ErrorResponse>)> {
    tafsir::surah_view(&state.store, &params.id)
        .and_then(|view| {
            view.ok_or_else(|| TafsirError::NotFound(format!("surah {}", params.id)))
        })
        .map(Json)
        .map_err(error_response)
}

async fn get_ayah(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AyahQuery>,
) -> Result<Json<tafsir::AyahView>, (StatusCode, Json<ErrorResponse>)> {
    tafsir::ayah_view(&state.store, &params.surah, &params.ayah)
        .and_then(|view| {
            view.ok_or_else(|| {
                TafsirError::NotFound(format!("ayah {}:{}", params.surah, params.ayah))
            })
        })
        .map(Json)
        .map_err(error_response)
}

async fn get_tafsir_plus(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<tafsir::PlusEntry>>, (StatusCode, Json<ErrorResponse>)> {
    tafsir::tafsir_plus(&state.store).map(Json).map_err(error_response)
}

async fn get_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<library::BookSummary>>, (StatusCode, Json<ErrorResponse>)> {
    library::books(&state.store).map(Json).map_err(error_response)
}

async fn get_book(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookQuery>,
) -> Result<Json<library::BookView>, (StatusCode, Json<ErrorResponse>)> {
    library::book_view(&state.store, &params.id)
        .and_then(|view| view.ok_or_else(|| TafsirError::NotFound(format!("book {}", params.id))))
        .map(Json)
        .map_err(error_response)
}

async fn get_book_tokens(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookQuery>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    library::book_tokens(&state.store, &params.id)
        .and_then(|tokens| {
            tokens.ok_or_else(|| TafsirError::NotFound(format!("book {}", params.id)))
        })
        .map(Json)
        .map_err(error_response)
}

async fn get_book_structure(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookQuery>,
) -> Result<Json<Vec<ChapterMark>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .store
        .book_structure(&params.id)
        .map(|s| Json(s.map(|s| s.chapters).unwrap_or_default()))
        .map_err(error_response)
}

async fn get_snippet(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SnippetQuery>,
) -> Result<Json<SnippetResponse>, (StatusCode, Json<ErrorResponse>)> {
    let context_words = params
        .context_words
        .unwrap_or(reader::DEFAULT_CONTEXT_WORDS)
        .min(MAX_CONTEXT_WORDS);
    state
        .store
        .snippet(&params.book_id, params.word_start, params.word_end, context_words)
        .map(|snippet| Json(SnippetResponse { snippet }))
        .map_err(error_response)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let data_dir =
        PathBuf::from(std::env::var("IHYA_DATA_DIR").unwrap_or_else(|_| "data".to_string()));
    let bind = std::env::var("IHYA_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let state = Arc::new(AppState {
        store: CorpusStore::new(data_dir),
    });
    tracing::info!("Using data directory: {:?}", state.store.data_dir());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/surahs", get(get_surahs))
        .route("/surah", get(get_surah))
        .route("/ayah", get(get_ayah))
        .route("/tafsir/plus", get(get_tafsir_plus))
        .route("/books", get(get_books))
        .route("/book", get(get_book))
        .route("/book/tokens", get(get_book_tokens))
        .route("/book/structure", get(get_book_structure))
        .route("/snippet", get(get_snippet))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Listening on http://{}", bind);
    axum::serve(listener, app).await?;

    Ok(())
}
