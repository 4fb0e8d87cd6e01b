// src/lib.rs — Library root for Interpersonal

pub mod api;
pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
pub mod relay;
pub mod scenario;
pub mod session;
pub mod util;
