// src/core/mod.rs

pub mod artifacts;
pub mod fallback;
pub mod intent;
pub mod orchestrator;
pub mod search;
pub mod types;
