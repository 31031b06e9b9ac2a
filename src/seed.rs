//! Seed selection for generation starts.
//!
//! A walk starts from some indexed key. With no relevance terms the key
//! is drawn uniformly from the namespace; with terms it is drawn from
//! the keys containing at least one term. Keys whose decoded window
//! contains punctuation make degenerate starts and are rejected.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::config::ChainConfig;
use crate::error::Result;
use crate::key;
use crate::store::Store;

/// How many relevance draws to attempt before accepting a punctuation
/// window anyway.
const RELEVANCE_DRAW_LIMIT: usize = 10;

/// Outcome of seed selection.
///
/// Both no-data outcomes are ordinary values: an untrained model and an
/// off-topic query are expected states, not failures, and callers need
/// to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSelection {
    /// A usable start: the chosen key and its namespace-stripped tokens.
    Seed { key: String, tokens: Vec<String> },
    /// The namespace holds no keys at all.
    Empty,
    /// Keys exist, but none contains any of the relevance terms.
    NoMatch,
}

fn namespace_pattern(config: &ChainConfig) -> String {
    format!("{}{}*", config.namespace, config.separator)
}

fn contains_punctuation(tokens: &[String], config: &ChainConfig) -> bool {
    tokens.iter().any(|t| config.is_punctuation(t))
}

/// Choose a starting key, biased toward `relevant_terms` when a
/// non-empty set is given.
pub fn select_seed<S: Store, R: Rng + ?Sized>(
    store: &S,
    config: &ChainConfig,
    relevant_terms: Option<&[String]>,
    rng: &mut R,
) -> Result<SeedSelection> {
    match relevant_terms {
        Some(terms) if !terms.is_empty() => relevant_seed(store, config, terms, rng),
        _ => random_seed(store, config, rng),
    }
}

/// Uniform draw over the namespace, rejecting punctuation windows.
///
/// The whole key space is enumerated once and filtered, so a
/// punctuation-saturated namespace resolves to [`SeedSelection::Empty`]
/// instead of retrying forever.
fn random_seed<S: Store, R: Rng + ?Sized>(
    store: &S,
    config: &ChainConfig,
    rng: &mut R,
) -> Result<SeedSelection> {
    let keys = store.keys_matching(&namespace_pattern(config))?;
    if keys.is_empty() {
        return Ok(SeedSelection::Empty);
    }

    let candidates: Vec<(String, Vec<String>)> = keys
        .into_iter()
        .map(|k| {
            let tokens = key::decode_seed(&k, &config.namespace, &config.separator);
            (k, tokens)
        })
        .filter(|(_, tokens)| !contains_punctuation(tokens, config))
        .collect();

    match candidates.choose(rng) {
        Some((key, tokens)) => {
            debug!("random seed {:?} from key {}", tokens, key);
            Ok(SeedSelection::Seed {
                key: key.clone(),
                tokens: tokens.clone(),
            })
        }
        None => {
            debug!("every key in the namespace is a punctuation window");
            Ok(SeedSelection::Empty)
        }
    }
}

/// Draw among keys containing at least one relevance term.
///
/// Punctuation windows are redrawn up to [`RELEVANCE_DRAW_LIMIT`] times;
/// after that the last candidate is kept as-is.
fn relevant_seed<S: Store, R: Rng + ?Sized>(
    store: &S,
    config: &ChainConfig,
    terms: &[String],
    rng: &mut R,
) -> Result<SeedSelection> {
    let mut keys: Vec<String> = Vec::new();
    for term in terms {
        let pattern = format!("{}{}*{}*", config.namespace, config.separator, term);
        keys.extend(store.keys_matching(&pattern)?);
    }
    keys.sort();
    keys.dedup();

    if keys.is_empty() {
        // An untrained model and an off-topic term look the same here;
        // only the namespace listing tells them apart.
        if store.keys_matching(&namespace_pattern(config))?.is_empty() {
            return Ok(SeedSelection::Empty);
        }
        debug!("no keys contain any of {} relevance terms", terms.len());
        return Ok(SeedSelection::NoMatch);
    }

    let mut chosen: Option<(String, Vec<String>)> = None;
    for _ in 0..RELEVANCE_DRAW_LIMIT {
        let Some(candidate) = keys.choose(rng) else {
            break;
        };
        let tokens = key::decode_seed(candidate, &config.namespace, &config.separator);
        let punctuated = contains_punctuation(&tokens, config);
        chosen = Some((candidate.clone(), tokens));
        if !punctuated {
            break;
        }
    }

    match chosen {
        Some((key, tokens)) => {
            if contains_punctuation(&tokens, config) {
                warn!(
                    "kept punctuation window {} after {} draws",
                    key, RELEVANCE_DRAW_LIMIT
                );
            }
            Ok(SeedSelection::Seed { key, tokens })
        }
        None => Ok(SeedSelection::NoMatch),
    }
}
