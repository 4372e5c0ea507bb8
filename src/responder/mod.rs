// src/responder/mod.rs — Responder capability seam

pub mod command;
pub mod data;
pub mod lookup;
pub mod report;

use async_trait::async_trait;

use crate::infra::errors::TillerError;

/// An external capability that takes text and returns text.
///
/// Implementations are registered explicitly with the orchestrator, one per
/// team role. Failure is an ordinary `Err`, which the orchestrator
/// downgrades to placeholder text instead of aborting the pass — the
/// continue-regardless policy is a visible branch, not a catch-all.
#[async_trait]
pub trait Responder: Send + Sync {
    fn name(&self) -> &str;

    async fn respond(&self, input: &str) -> Result<String, TillerError>;

    /// Release any resources the responder holds (child processes,
    /// connections). Called once at team shutdown; the default is a no-op.
    async fn shutdown(&self) {}
}
