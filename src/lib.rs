#![deny(missing_docs)]

//! Core library for the Draft Forge writing server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text-generation client abstraction and the Ollama adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Markdown-to-document-model conversion.
pub mod markdown;
/// Drafting metrics helpers.
pub mod metrics;
/// Research pipeline composing acquisition, storage, and generation.
pub mod pipeline;
/// Reference-material acquisition with retry, backoff, and fallback.
pub mod research;
/// Search provider integration.
pub mod search;
/// Vector/content store integration.
pub mod store;
