//! Frequency-normalized scoring against the model.
//!
//! A completion scores as its frequency relative to the most frequent
//! completion of the same key, scaled to 0..=100. A line scores as the
//! average over every window pair it contains. Scoring reads the store
//! and never mutates it.

use crate::config::ChainConfig;
use crate::error::Result;
use crate::index::window_at;
use crate::store::Store;

/// Upper bound of the normalized score range.
const NORMALIZED_MAX: f64 = 100.0;

/// Frequency of the most common completion for `key`, 0 when the key is
/// absent or empty.
pub fn max_for_key<S: Store>(store: &S, key: &str) -> Result<f64> {
    let top = store.top_members(key, 1)?;
    Ok(top.first().map(|(_, score)| *score).unwrap_or(0.0))
}

/// Frequency of the least common completion for `key`, 0 when the key is
/// absent or empty.
pub fn min_for_key<S: Store>(store: &S, key: &str) -> Result<f64> {
    let bottom = store.bottom_members(key, 1)?;
    Ok(bottom.first().map(|(_, score)| *score).unwrap_or(0.0))
}

/// Normalized score of an encoded completion member under an encoded
/// key: `raw / max * 100`.
///
/// An absent member counts as frequency 0, and the maximum is treated as
/// 1 when the key has no completions, so absent data scores 0 rather
/// than failing.
pub fn score_completion<S: Store>(store: &S, key: &str, member: &str) -> Result<f64> {
    let raw = store.get_score(key, member)?.unwrap_or(0.0);
    let max = max_for_key(store, key)?;
    let max = if max > 0.0 { max } else { 1.0 };
    Ok(raw / max * NORMALIZED_MAX)
}

/// Score a line as the average completion score over every window pair.
///
/// Returns 0 when the line produces no pairs at all.
pub fn score_line<S: Store>(store: &S, config: &ChainConfig, line: &[String]) -> Result<f64> {
    let mut total = 0.0;
    let mut pairs = 0u32;
    let mut offset = 0;
    while let Some((key, completion)) = window_at(line, offset, config) {
        total += score_completion(store, &key, &completion)?;
        pairs += 1;
        offset += 1;
    }
    if pairs == 0 {
        return Ok(0.0);
    }
    Ok(total / f64::from(pairs))
}
