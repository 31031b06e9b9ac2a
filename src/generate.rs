//! Random-walk text generation over the chain model.
//!
//! Generation grows a token sequence one completion at a time: the
//! trailing window addresses the store, a candidate completion is drawn
//! from the members recorded for it, and the walk ends when the model
//! has nothing acceptable to offer or the word budget is reached.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{ChainError, Result};
use crate::key;
use crate::score;
use crate::seed::{self, SeedSelection};
use crate::store::Store;

/// Parameters for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Starting tokens; chosen from the model when absent.
    pub seed: Option<Vec<String>>,
    /// Upper bound on the generated token count.
    pub max_words: usize,
    /// Minimum normalized score a completion must clear; 0 disables the
    /// filter.
    pub quality_floor: f64,
    /// Whether punctuation tokens count toward `max_words`.
    pub count_punctuation: bool,
    /// Terms biasing seed selection and completion choice toward a topic.
    pub relevant_terms: Option<Vec<String>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            max_words: 1000,
            quality_floor: 0.0,
            count_punctuation: true,
            relevant_terms: None,
        }
    }
}

fn count_tokens(tokens: &[String], config: &ChainConfig, count_punctuation: bool) -> usize {
    if count_punctuation {
        tokens.len()
    } else {
        tokens.iter().filter(|t| !config.is_punctuation(t)).count()
    }
}

fn strip_stop(seed: &mut Vec<String>, config: &ChainConfig) {
    seed.retain(|t| *t != config.stop_token);
}

/// Draw a completion member for `key`, honoring relevance preference.
///
/// Members in `exclude` are never returned. With relevance terms, a
/// member that is itself one of the terms is preferred; otherwise any
/// member is drawn uniformly.
fn pick_candidate<S: Store, R: Rng + ?Sized>(
    store: &S,
    key: &str,
    relevant_terms: Option<&[String]>,
    exclude: &[String],
    rng: &mut R,
) -> Result<Option<String>> {
    let members: Vec<String> = store
        .list_members(key)?
        .into_iter()
        .filter(|m| !exclude.contains(m))
        .collect();
    if members.is_empty() {
        return Ok(None);
    }

    if let Some(terms) = relevant_terms {
        let on_topic: Vec<&String> = members
            .iter()
            .filter(|m| terms.iter().any(|t| t == *m))
            .collect();
        if let Some(member) = on_topic.choose(rng) {
            return Ok(Some((*member).clone()));
        }
    }

    Ok(members.choose(rng).cloned())
}

/// Draw candidates for `key` until one clears the quality floor.
///
/// Rejected members are excluded from subsequent draws, so a key whose
/// completions all score below the floor is exhausted in finitely many
/// steps and yields `None`.
fn next_completion<S: Store, R: Rng + ?Sized>(
    store: &S,
    key: &str,
    relevant_terms: Option<&[String]>,
    quality_floor: f64,
    rng: &mut R,
) -> Result<Option<String>> {
    let mut exclude: Vec<String> = Vec::new();
    loop {
        let Some(member) = pick_candidate(store, key, relevant_terms, &exclude, rng)? else {
            return Ok(None);
        };
        if quality_floor <= 0.0 {
            return Ok(Some(member));
        }
        let score = score::score_completion(store, key, &member)?;
        if score >= quality_floor {
            return Ok(Some(member));
        }
        exclude.push(member);
    }
}

/// Generate a token sequence by walking the chain.
///
/// Starts from `options.seed` or from seed selection. An untrained
/// namespace, or relevance terms matching no key, yield an empty
/// sequence rather than an error. The output never contains the stop
/// sentinel, and a model-selected start never grows past
/// `options.max_words` tokens: a completion that would overshoot the
/// budget is dropped and the walk ends.
///
/// # Errors
/// Returns [`ChainError::EmptyTokens`] when the caller passes an
/// explicitly empty seed.
pub fn generate<S: Store, R: Rng + ?Sized>(
    store: &S,
    config: &ChainConfig,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<Vec<String>> {
    let relevant_terms = options
        .relevant_terms
        .as_deref()
        .filter(|terms| !terms.is_empty());

    let mut seed: Vec<String> = match &options.seed {
        Some(tokens) => {
            if tokens.is_empty() {
                return Err(ChainError::EmptyTokens);
            }
            tokens.clone()
        }
        None => match seed::select_seed(store, config, relevant_terms, rng)? {
            SeedSelection::Seed { tokens, .. } => tokens,
            SeedSelection::Empty => {
                debug!("nothing indexed under namespace {}", config.namespace);
                return Ok(Vec::new());
            }
            SeedSelection::NoMatch => {
                debug!("no indexed key matches the relevance terms");
                return Ok(Vec::new());
            }
        },
    };

    loop {
        let start = seed.len().saturating_sub(config.key_length);
        let current_key =
            key::encode_namespaced(&seed[start..], &config.namespace, &config.separator)?;

        let candidate = next_completion(
            store,
            &current_key,
            relevant_terms,
            options.quality_floor,
            rng,
        )?;
        let Some(member) = candidate else {
            debug!("no completion for {}, ending walk", current_key);
            strip_stop(&mut seed, config);
            return Ok(seed);
        };

        if member == config.stop_token {
            strip_stop(&mut seed, config);
            return Ok(seed);
        }

        let completion = key::decode(&member, &config.separator);
        let total = count_tokens(&seed, config, options.count_punctuation)
            + count_tokens(&completion, config, options.count_punctuation);

        if total < options.max_words {
            seed.extend(completion);
            continue;
        }
        if total == options.max_words {
            seed.extend(completion);
            strip_stop(&mut seed, config);
            return Ok(seed);
        }
        // Appending would exceed the budget: drop the candidate and end
        // the walk, keeping the output within max_words.
        debug!("completion would exceed {} words, ending walk", options.max_words);
        strip_stop(&mut seed, config);
        return Ok(seed);
    }
}
