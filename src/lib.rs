// src/lib.rs — Library root for Tiller

pub mod core;
pub mod infra;
pub mod responder;
pub mod session;
pub mod util;
