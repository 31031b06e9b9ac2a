//! Markov chain text engine over an ordered-multiset store.
//!
//! This crate builds and queries an n-gram language model for sequences of
//! tokens (words and punctuation marks). The model lives in a key-value
//! store with sorted-set semantics: every fixed-width token window becomes
//! a key, and the tokens that historically followed it become members
//! scored by occurrence count.
//!
//! Three operations make up the engine:
//! - incremental index construction from training lines ([`index`])
//! - frequency-normalized scoring of arbitrary phrases ([`score`])
//! - random-walk generation with quality filtering and topic biasing
//!   ([`generate`], seeded by [`seed`])
//!
//! The store itself is pluggable through the [`store::Store`] trait;
//! [`store::MemoryStore`] is the bundled reference backend. A [`Chain`]
//! handle binds a store to a validated [`ChainConfig`] and exposes the
//! high-level API.

pub mod chain;
pub mod config;
pub mod error;
pub mod generate;
pub mod index;
pub mod key;
pub mod score;
pub mod seed;
pub mod store;

pub use chain::Chain;
pub use config::ChainConfig;
pub use error::{ChainError, Result};
pub use generate::GenerateOptions;
pub use seed::SeedSelection;
pub use store::{MemoryStore, Store, StoreError};
