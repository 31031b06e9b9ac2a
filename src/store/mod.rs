//! Ordered-multiset store contract.
//!
//! The chain model persists as `key -> {member: score}` associations in
//! a store with sorted-set semantics. The engine is written against the
//! [`Store`] trait only; [`MemoryStore`] is the bundled reference
//! backend, and a networked backend (a Redis sorted set is the obvious
//! shape) can be dropped in from the outside.

mod memory;

pub use memory::MemoryStore;

/// Errors surfaced by a store backend.
///
/// The engine propagates these unmodified; it performs no retries and
/// no suppression of transport failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store connection failed")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("store command failed")]
    Command(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A key-value store whose values are multisets of scored members.
///
/// Ranked reads order members by score descending with ascending member
/// ties, so results are deterministic for equal scores.
pub trait Store {
    /// Atomically add `delta` to the score of `member` under `key`,
    /// creating both if absent. Returns the score after the increment.
    ///
    /// Concurrent increments must not lose updates; implementations
    /// back this with a native atomic operation, not read-modify-write.
    fn increment_score(&self, key: &str, member: &str, delta: f64) -> Result<f64>;

    /// Up to `n` members with the highest scores, best first.
    fn top_members(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>>;

    /// Up to `n` members with the lowest scores, worst first.
    fn bottom_members(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>>;

    /// The score of `member` under `key`, or `None` if either is absent.
    fn get_score(&self, key: &str, member: &str) -> Result<Option<f64>>;

    /// All members under `key`, ordered by score descending.
    fn list_members(&self, key: &str) -> Result<Vec<String>>;

    /// A uniformly random key, or `None` if the store is empty.
    fn random_key(&self) -> Result<Option<String>>;

    /// All keys matching a glob pattern (`*` and `?`), sorted.
    fn keys_matching(&self, pattern: &str) -> Result<Vec<String>>;

    /// Remove a key and all its members. Returns whether it existed.
    fn delete(&self, key: &str) -> Result<bool>;
}

// Several models may share one store under different namespaces, so a
// shared reference is itself a store.
impl<S: Store + ?Sized> Store for &S {
    fn increment_score(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        (**self).increment_score(key, member, delta)
    }

    fn top_members(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        (**self).top_members(key, n)
    }

    fn bottom_members(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        (**self).bottom_members(key, n)
    }

    fn get_score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        (**self).get_score(key, member)
    }

    fn list_members(&self, key: &str) -> Result<Vec<String>> {
        (**self).list_members(key)
    }

    fn random_key(&self) -> Result<Option<String>> {
        (**self).random_key()
    }

    fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        (**self).keys_matching(pattern)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }
}
