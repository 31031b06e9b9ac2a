//! Model handle binding a store to a validated configuration.

use rand::Rng;
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::Result;
use crate::generate::{self, GenerateOptions};
use crate::index;
use crate::key;
use crate::score;
use crate::seed::{self, SeedSelection};
use crate::store::Store;

/// One chain model over one store namespace.
///
/// Construct it once and pass it around; there is no global state. All
/// methods take `&self`, so a `Chain` can be shared across threads as
/// freely as its store allows.
pub struct Chain<S> {
    store: S,
    config: ChainConfig,
}

impl<S: Store> Chain<S> {
    /// Bind a store to a configuration, validating the configuration.
    pub fn new(store: S, config: ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add one training line to the index. Returns the number of
    /// (key, completion) pairs written.
    pub fn add_line(&self, line: &[String]) -> Result<usize> {
        index::add_line(&self.store, &self.config, line)
    }

    /// Score a line against the model, 0..=100.
    pub fn score_line(&self, line: &[String]) -> Result<f64> {
        score::score_line(&self.store, &self.config, line)
    }

    /// Score one completion window against one key window, 0..=100.
    pub fn score_completion(
        &self,
        key_tokens: &[String],
        completion_tokens: &[String],
    ) -> Result<f64> {
        let key =
            key::encode_namespaced(key_tokens, &self.config.namespace, &self.config.separator)?;
        let member = key::encode(completion_tokens, &self.config.separator)?;
        score::score_completion(&self.store, &key, &member)
    }

    /// Generate a token sequence, using the thread-local rng.
    pub fn generate(&self, options: &GenerateOptions) -> Result<Vec<String>> {
        self.generate_with_rng(options, &mut rand::rng())
    }

    /// Generate a token sequence with a caller-supplied rng.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        options: &GenerateOptions,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        generate::generate(&self.store, &self.config, options, rng)
    }

    /// Choose a generation start, using the thread-local rng.
    pub fn select_seed(&self, relevant_terms: Option<&[String]>) -> Result<SeedSelection> {
        self.select_seed_with_rng(relevant_terms, &mut rand::rng())
    }

    /// Choose a generation start with a caller-supplied rng.
    pub fn select_seed_with_rng<R: Rng + ?Sized>(
        &self,
        relevant_terms: Option<&[String]>,
        rng: &mut R,
    ) -> Result<SeedSelection> {
        seed::select_seed(&self.store, &self.config, relevant_terms, rng)
    }

    /// Delete every key under this model's namespace. Housekeeping, not
    /// part of the indexing or generation paths. Returns the number of
    /// keys removed.
    pub fn clear(&self) -> Result<u64> {
        let pattern = format!("{}{}*", self.config.namespace, self.config.separator);
        let mut removed = 0u64;
        for key in self.store.keys_matching(&pattern)? {
            if self.store.delete(&key)? {
                removed += 1;
            }
        }
        debug!("cleared {} keys under {}", removed, self.config.namespace);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn test_chain() -> Chain<MemoryStore> {
        Chain::new(MemoryStore::new(), ChainConfig::with_namespace("testclass")).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ChainConfig {
            key_length: 0,
            ..ChainConfig::default()
        };
        assert!(Chain::new(MemoryStore::new(), config).is_err());
    }

    #[test]
    fn test_add_line() {
        let chain = test_chain();
        chain.add_line(&tokens(&["i", "ate", "a", "peach"])).unwrap();
        assert_eq!(
            chain.store().get_score("testclass:i:ate", "a").unwrap(),
            Some(1.0)
        );
        assert_eq!(
            chain.store().get_score("testclass:ate:a", "peach").unwrap(),
            Some(1.0)
        );
    }

    #[test]
    fn test_score_line() {
        let chain = test_chain();
        let line = tokens(&["i", "ate", "a", "peach"]);
        chain.add_line(&line).unwrap();
        let score = chain.score_line(&line).unwrap();
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_completion_encodes_windows() {
        let chain = test_chain();
        chain.add_line(&tokens(&["i", "ate", "a", "peach"])).unwrap();
        let score = chain
            .score_completion(&tokens(&["i", "ate"]), &tokens(&["a"]))
            .unwrap();
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear_removes_namespace() {
        let chain = test_chain();
        chain.add_line(&tokens(&["i", "ate", "a", "peach"])).unwrap();
        assert_eq!(chain.clear().unwrap(), 3);
        assert_eq!(chain.store().key_count(), 0);
        assert_eq!(chain.clear().unwrap(), 0);
    }
}
