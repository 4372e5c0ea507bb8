// src/infra/errors.rs — Error types for Tiller

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TillerError {
    // Responder errors (recovered by the orchestrator, never fatal)
    #[error("Responder '{responder}' error: {message}")]
    Responder { responder: String, message: String },

    // Lookup transport
    #[error("Lookup transport error: {0}")]
    Transport(String),

    #[error("Lookup server is not running")]
    ServerNotRunning,

    // Session log
    #[error("Notebook error at {path}: {message}")]
    Notebook { path: PathBuf, message: String },

    // Infra
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
