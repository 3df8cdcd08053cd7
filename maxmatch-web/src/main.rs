//! Servidor web Axum com WebSocket para visualização da segmentação em tempo real

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use maxmatch_core::{
    corpus::{clean_line, demo_hashtags, parse_lexicon_line, parse_reference_line},
    pipeline::{BuildOptions, SegmentEvent, SegmentOptions, Segmenter},
    postprocess::Correction,
    tables::TableDefaults,
    MatchStrategy,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
struct AppState {
    segmenter: Segmenter,
}

/// Corpo do POST /segment e mensagem do WebSocket
#[derive(Deserialize)]
struct SegmentRequest {
    text: String,
    #[serde(default)]
    strategy: Option<MatchStrategy>,
    #[serde(default)]
    short_word_check: Option<bool>,
    #[serde(default)]
    split_tokens: Option<bool>,
    /// Segmentação correta, tokens separados por espaço
    #[serde(default)]
    reference: Option<String>,
}

impl SegmentRequest {
    fn options(&self) -> SegmentOptions {
        let defaults = SegmentOptions::default();
        SegmentOptions {
            strategy: self.strategy.unwrap_or_default(),
            short_word_check: self.short_word_check.unwrap_or(defaults.short_word_check),
            split_tokens: self.split_tokens.unwrap_or(defaults.split_tokens),
        }
    }
}

#[derive(Serialize)]
struct SegmentResponse {
    tokens: Vec<String>,
    corrections: Vec<Correction>,
    wer: Option<f64>,
    processing_ms: u64,
    total_tokens: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let segmenter = load_segmenter()?;
    let state = Arc::new(AppState { segmenter });

    let addr: SocketAddr = std::env::var("MAXMATCH_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .context("MAXMATCH_ADDR inválido")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("falha ao escutar em {addr}"))?;
    info!("🚀 Servidor de segmentação iniciado em http://{addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Monta o segmentador: léxico de `MAXMATCH_LEXICON` se definido, senão o de demonstração.
fn load_segmenter() -> anyhow::Result<Segmenter> {
    let Ok(path) = std::env::var("MAXMATCH_LEXICON") else {
        info!("MAXMATCH_LEXICON não definido, usando léxico de demonstração");
        return Ok(Segmenter::demo()?);
    };

    let mut params = TableDefaults::default();
    if let Ok(limit) = std::env::var("MAXMATCH_LIMIT") {
        params.lexicon_limit = limit.parse().context("MAXMATCH_LIMIT inválido")?;
    }

    let words = read_lexicon(Path::new(&path))?;
    info!("Léxico carregado de {path}: {} palavras", words.len());
    let options = BuildOptions {
        extra_words: true,
        short_words: true,
        split_tokens: true,
    };
    Ok(Segmenter::from_ranked_words(&words, &params, options)?)
}

fn read_lexicon(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("falha ao ler léxico: {}", path.display()))?;
    Ok(content.lines().filter_map(parse_lexicon_line).collect())
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/segment", post(segment_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-hashtags", get(demo_hashtags_handler))
        .layer(cors)
        .with_state(state)
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

/// Segmentação via HTTP POST (sem streaming)
async fn segment_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SegmentRequest>,
) -> Response {
    let text = clean_line(&req.text);
    if text.is_empty() {
        return bad_request("Texto vazio");
    }

    let start = Instant::now();
    let options = req.options();
    let segmentation = match req.reference.as_deref() {
        Some(reference) => {
            let reference = parse_reference_line(reference);
            match state.segmenter.score(&text, options, &reference) {
                Ok(segmentation) => segmentation,
                // Referência vazia: WER indefinida
                Err(err) => return bad_request(err.to_string()),
            }
        }
        None => state.segmenter.segment_with(&text, options),
    };

    Json(SegmentResponse {
        total_tokens: segmentation.tokens.len(),
        tokens: segmentation.tokens,
        corrections: segmentation.corrections,
        wer: segmentation.wer,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Retorna as hashtags de demonstração com suas referências
async fn demo_hashtags_handler() -> impl IntoResponse {
    let samples: Vec<serde_json::Value> = demo_hashtags()
        .iter()
        .map(|sample| {
            serde_json::json!({
                "domain": sample.domain,
                "hashtag": sample.hashtag,
                "reference": sample.reference.join(" "),
            })
        })
        .collect();
    Json(samples)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe uma hashtag, executa o pipeline e envia os eventos
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Tenta parsear como JSON {text, strategy, ...}; senão usa como texto puro
                let (text, options, reference) = match serde_json::from_str::<SegmentRequest>(&text) {
                    Ok(req) => {
                        let reference = req.reference.as_deref().map(parse_reference_line);
                        (clean_line(&req.text), req.options(), reference)
                    }
                    Err(_) => (clean_line(&text), SegmentOptions::default(), None),
                };

                if text.is_empty() {
                    continue;
                }

                info!("Segmentando via WebSocket [{}]: {} chars", options.strategy, text.chars().count());

                // O pipeline é síncrono: roda fora do runtime e devolve os eventos coletados
                let state_for_thread = Arc::clone(&state);
                let events = tokio::task::spawn_blocking(move || {
                    let (tx, rx) = std::sync::mpsc::channel::<SegmentEvent>();
                    state_for_thread
                        .segmenter
                        .segment_streaming(&text, options, reference.as_deref(), tx);
                    rx.try_iter().collect::<Vec<_>>()
                })
                .await;

                let events = match events {
                    Ok(events) => events,
                    Err(err) => {
                        warn!("pipeline falhou: {err}");
                        vec![SegmentEvent::Error { message: err.to_string() }]
                    }
                };

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
