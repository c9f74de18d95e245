//! LexAI: server-rendered legal research chat.
//!
//! A user asks a legal question; a research backend searches legal sources
//! and streams back an answer. This crate renders the chat (header, input
//! bar, message list with inline search progress) and relays the backend's
//! event stream into each session's conversation.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server answering HTMX requests with HTML fragments
//! - **Conversation**: single owner of messages and input text per session
//! - **Research**: async backend seam plus the HTTP/SSE implementation
//! - **UI**: Leptos SSR components, pure functions of a state snapshot
//!
//! # Modules
//!
//! - [`conversation`]: messages, search progress, controller, session store
//! - [`stream`]: research events and their SSE framing
//! - [`research`]: backend trait, HTTP backend, stream relay
//! - [`ui`]: chat views
//! - [`server`]: router and handlers
//! - [`config`]: layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod conversation;
pub mod error;
pub mod research;
pub mod server;
pub mod stream;
pub mod ui;

use std::sync::Arc;

use config::AppConfig;
use conversation::SessionStore;
use research::ResearchBackend;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Live chat sessions.
    pub sessions: SessionStore,
    /// Where questions are sent.
    pub backend: Arc<dyn ResearchBackend>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state with an empty session store.
    pub fn new(config: Arc<AppConfig>, backend: Arc<dyn ResearchBackend>) -> Self {
        Self {
            sessions: SessionStore::new(),
            backend,
            config,
        }
    }
}
