// src/core/mod.rs

pub mod cost;
