use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::{debug, info};

use crate::AppState;
use crate::config::AppConfig;
use crate::conversation::{Conversation, MessageId, Session};
use crate::research::{self, HttpResearchBackend};
use crate::ui::{self, ChatSnapshot};

/// How often idle sessions are swept.
const PRUNE_PERIOD: Duration = Duration::from_secs(60);

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(index_handler))
        // API routes
        .route("/api/chat", post(api_chat))
        .route(
            "/api/sessions/{id}",
            get(api_get_session).delete(api_delete_session),
        )
        .route("/api/sessions/{id}/messages", get(api_get_messages))
        .route("/health", get(health))
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend = HttpResearchBackend::new(
        &config.research.base_url,
        Duration::from_secs(config.research.idle_timeout_secs),
    )?;

    info!(
        name: "research.config.loaded",
        base_url = %config.research.base_url,
        idle_timeout_secs = config.research.idle_timeout_secs,
        "Research backend configured"
    );

    let state = AppState::new(Arc::clone(&config), Arc::new(backend));

    spawn_session_pruner(&state, config.server.session_idle_secs);

    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

fn spawn_session_pruner(state: &AppState, idle_secs: u64) {
    let sessions = state.sessions.clone();
    let max_idle = TimeDelta::from_std(Duration::from_secs(idle_secs)).unwrap_or(TimeDelta::MAX);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_PERIOD);
        loop {
            interval.tick().await;
            let removed = sessions.prune_idle(max_idle);
            if removed > 0 {
                info!(
                    name: "session.pruned",
                    removed,
                    remaining = sessions.len(),
                    "Idle sessions dropped"
                );
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversation Wiring
// ─────────────────────────────────────────────────────────────────────────────

/// Submit the session's input and start streaming the reply.
///
/// Returns the reply id, or `None` when the input was blank.
fn submit_and_relay(state: &AppState, session: &Session) -> Option<MessageId> {
    let reply = session.update(Conversation::submit)?;
    let reply_id = reply.reply_id;

    info!(
        name: "chat.submitted",
        session_id = %session.id(),
        reply_id,
        query_len = reply.query.len(),
        continues_thread = reply.checkpoint_id.is_some(),
        "Question submitted"
    );

    tokio::spawn(research::relay(
        Arc::clone(&state.backend),
        session.clone(),
        reply,
    ));

    Some(reply_id)
}

fn snapshot(state: &AppState, session: &Session) -> ChatSnapshot {
    ChatSnapshot::capture(session, state.config.ui.poll_interval_ms)
}

fn page_url(session: &Session) -> String {
    format!("/?session_id={}", session.id())
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|v| v.as_bytes() == b"true")
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PageQuery {
    session_id: Option<String>,
}

/// GET / - Chat page; starts a session when none (or an unknown one) is given.
async fn index_handler(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let existing = query
        .session_id
        .as_deref()
        .and_then(|id| state.sessions.get(id));

    match existing {
        Some(session) => Html(ui::render_page(snapshot(&state, &session))).into_response(),
        None => {
            let session = state.sessions.create();
            info!(name: "session.created", session_id = %session.id(), "Session started");
            Redirect::to(&page_url(&session)).into_response()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Form body of the chat input bar.
#[derive(Debug, Deserialize)]
struct ChatForm {
    /// Session the question belongs to.
    session_id: String,
    /// Text of the input field.
    #[serde(default)]
    message: String,
}

/// POST /api/chat - Submit the input bar.
///
/// HTMX requests get the re-rendered feed plus the cleared input bar; plain
/// form posts are redirected back to the page.
async fn api_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Result<Response, StatusCode> {
    let session = state
        .sessions
        .get(&form.session_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    session.update(|c| c.set_input(form.message));
    if submit_and_relay(&state, &session).is_none() {
        debug!(session_id = %session.id(), "Blank message ignored");
    }

    if !is_htmx(&headers) {
        return Ok(Redirect::to(&page_url(&session)).into_response());
    }

    Ok(Html(ui::render_submit_response(snapshot(&state, &session))).into_response())
}

/// GET /api/sessions/:id/messages - Message feed fragment.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    match state.sessions.get(&id) {
        Some(session) => Ok(Html(ui::render_feed(snapshot(&state, &session)))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Session state for API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    id: String,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    streaming: bool,
    #[serde(flatten)]
    conversation: Conversation,
}

/// GET /api/sessions/:id - Session state as JSON.
async fn api_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfo>, StatusCode> {
    match state.sessions.get(&id) {
        Some(session) => {
            let conversation = session.snapshot();
            Ok(Json(SessionInfo {
                id: session.id().to_string(),
                created_at: session.created_at(),
                last_activity: session.last_activity(),
                streaming: conversation.is_streaming(),
                conversation,
            }))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /api/sessions/:id - Delete a session.
async fn api_delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    match state.sessions.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// GET /health - Liveness probe.
async fn health() -> &'static str {
    "ok"
}
