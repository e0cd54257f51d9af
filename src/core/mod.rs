// src/core/mod.rs

pub mod classifier;
pub mod engine;
pub mod index;
pub mod normalizer;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;
