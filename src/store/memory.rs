//! In-memory reference backend.

use std::collections::HashMap;

use parking_lot::RwLock;
use rand::prelude::IteratorRandom;

use super::{Result, Store};

/// An in-process [`Store`] holding every sorted set in a hash map.
///
/// Suitable for tests and for single-process models that do not need
/// persistence. All operations take `&self`; a write lock makes each
/// increment atomic with respect to concurrent indexers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: RwLock<HashMap<String, HashMap<String, f64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn key_count(&self) -> usize {
        self.keys.read().len()
    }

    fn ranked(members: &HashMap<String, f64>, descending: bool) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> =
            members.iter().map(|(m, s)| (m.clone(), *s)).collect();
        if descending {
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        } else {
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        }
        ranked
    }
}

/// Match `text` against a glob `pattern` supporting `*` (any run of
/// characters, including empty) and `?` (exactly one character).
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut p = 0;
    let mut t = 0;
    // Position of the last `*` seen and the text position it matched to
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            mark = t;
            p += 1;
        } else if let Some(s) = star {
            // Backtrack: let the star consume one more character
            p = s + 1;
            mark += 1;
            t = mark;
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

impl Store for MemoryStore {
    fn increment_score(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let mut keys = self.keys.write();
        let score = keys
            .entry(key.to_string())
            .or_default()
            .entry(member.to_string())
            .or_insert(0.0);
        *score += delta;
        Ok(*score)
    }

    fn top_members(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        let keys = self.keys.read();
        let Some(members) = keys.get(key) else {
            return Ok(Vec::new());
        };
        let mut ranked = Self::ranked(members, true);
        ranked.truncate(n);
        Ok(ranked)
    }

    fn bottom_members(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        let keys = self.keys.read();
        let Some(members) = keys.get(key) else {
            return Ok(Vec::new());
        };
        let mut ranked = Self::ranked(members, false);
        ranked.truncate(n);
        Ok(ranked)
    }

    fn get_score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        let keys = self.keys.read();
        Ok(keys.get(key).and_then(|members| members.get(member)).copied())
    }

    fn list_members(&self, key: &str) -> Result<Vec<String>> {
        let keys = self.keys.read();
        let Some(members) = keys.get(key) else {
            return Ok(Vec::new());
        };
        Ok(Self::ranked(members, true)
            .into_iter()
            .map(|(member, _)| member)
            .collect())
    }

    fn random_key(&self) -> Result<Option<String>> {
        let keys = self.keys.read();
        Ok(keys.keys().choose(&mut rand::rng()).cloned())
    }

    fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let keys = self.keys.read();
        let mut matched: Vec<String> = keys
            .keys()
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect();
        matched.sort();
        Ok(matched)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut keys = self.keys.write();
        Ok(keys.remove(key).is_some())
    }
}
