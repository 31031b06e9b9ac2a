//! Incremental index construction.
//!
//! Indexing slides a `key_length`-wide window across a training line and
//! bumps the frequency of the completion observed after each window. The
//! scan is a plain loop over a moving offset, so arbitrarily long lines
//! cost constant stack.

use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{ChainError, Result};
use crate::key;
use crate::store::Store;

/// Extract the (key, completion member) pair at `offset`, or `None` when
/// the scan is over.
///
/// The scan ends when fewer than `key_length` tokens remain, when the
/// window contains the stop sentinel, or when `completion_length > 1`
/// and no completion tokens follow the window. For
/// `completion_length == 1` a window at the very end of the line yields
/// the stop sentinel as its completion; that is how termination is
/// recorded in the model. A multi-token completion cut short by the end
/// of the line is used as-is.
pub(crate) fn window_at(
    line: &[String],
    offset: usize,
    config: &ChainConfig,
) -> Option<(String, String)> {
    let end = offset.checked_add(config.key_length)?;
    if end > line.len() {
        return None;
    }
    let window = &line[offset..end];
    if window.iter().any(|t| *t == config.stop_token) {
        return None;
    }
    let key = format!(
        "{}{}{}",
        config.namespace,
        config.separator,
        key::join(window, &config.separator)
    );

    let completion = if config.completion_length == 1 {
        match line.get(end) {
            Some(token) => token.clone(),
            None => config.stop_token.clone(),
        }
    } else {
        let tail = &line[end..line.len().min(end + config.completion_length)];
        if tail.is_empty() {
            return None;
        }
        key::join(tail, &config.separator)
    };

    Some((key, completion))
}

/// Add one training line to the model.
///
/// Returns the number of (key, completion) pairs written. A line shorter
/// than `key_length` produces no windows and writes nothing.
///
/// # Errors
/// Returns [`ChainError::EmptyTokens`] for an empty line, before any
/// store mutation.
pub fn add_line<S: Store>(store: &S, config: &ChainConfig, line: &[String]) -> Result<usize> {
    if line.is_empty() {
        return Err(ChainError::EmptyTokens);
    }

    let mut written = 0;
    let mut offset = 0;
    while let Some((key, completion)) = window_at(line, offset, config) {
        store.increment_score(&key, &completion, 1.0)?;
        written += 1;
        offset += 1;
    }
    debug!("indexed {} pairs from a {}-token line", written, line.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn test_config() -> ChainConfig {
        ChainConfig::with_namespace("test")
    }

    #[test]
    fn test_add_line_indexes_every_window() {
        let store = MemoryStore::new();
        let config = test_config();
        let line = tokens(&["i", "ate", "a", "peach"]);

        let written = add_line(&store, &config, &line).unwrap();
        assert_eq!(written, 3);
        assert_eq!(store.get_score("test:i:ate", "a").unwrap(), Some(1.0));
        assert_eq!(store.get_score("test:ate:a", "peach").unwrap(), Some(1.0));
        assert_eq!(
            store.get_score("test:a:peach", "\u{0002}").unwrap(),
            Some(1.0)
        );
    }

    #[test]
    fn test_repeat_lines_accumulate() {
        let store = MemoryStore::new();
        let config = test_config();

        add_line(&store, &config, &tokens(&["i", "ate", "a", "peach"])).unwrap();
        add_line(&store, &config, &tokens(&["i", "ate", "one", "peach"])).unwrap();
        assert_eq!(store.get_score("test:i:ate", "a").unwrap(), Some(1.0));
        assert_eq!(store.get_score("test:i:ate", "one").unwrap(), Some(1.0));
        assert_eq!(store.get_score("test:ate:one", "peach").unwrap(), Some(1.0));

        add_line(&store, &config, &tokens(&["i", "ate", "a", "sandwich"])).unwrap();
        assert_eq!(store.get_score("test:i:ate", "a").unwrap(), Some(2.0));
        assert_eq!(store.get_score("test:ate:a", "sandwich").unwrap(), Some(1.0));
    }

    #[test]
    fn test_empty_line_rejected() {
        let store = MemoryStore::new();
        let config = test_config();
        let result = add_line(&store, &config, &[]);
        assert!(matches!(result, Err(ChainError::EmptyTokens)));
        assert_eq!(store.key_count(), 0);
    }

    #[test]
    fn test_short_line_is_a_noop() {
        let store = MemoryStore::new();
        let config = test_config();
        let written = add_line(&store, &config, &tokens(&["peach"])).unwrap();
        assert_eq!(written, 0);
        assert_eq!(store.key_count(), 0);
    }

    #[test]
    fn test_stop_token_in_window_ends_scan() {
        let store = MemoryStore::new();
        let config = test_config();
        let line = tokens(&["i", "ate", "\u{0002}", "a", "peach"]);
        let written = add_line(&store, &config, &line).unwrap();
        // Only the first window precedes the sentinel
        assert_eq!(written, 1);
        assert_eq!(
            store.get_score("test:i:ate", "\u{0002}").unwrap(),
            Some(1.0)
        );
    }

    #[test]
    fn test_window_at_whole_line_key() {
        let config = ChainConfig {
            key_length: 4,
            ..test_config()
        };
        let line = tokens(&["i", "ate", "a", "peach"]);
        let (key, completion) = window_at(&line, 0, &config).unwrap();
        assert_eq!(key, "test:i:ate:a:peach");
        assert_eq!(completion, "\u{0002}");
    }

    #[test]
    fn test_window_at_multi_token_completion() {
        let config = ChainConfig {
            completion_length: 2,
            ..test_config()
        };
        let line = tokens(&["i", "ate", "a", "peach"]);
        let (key, completion) = window_at(&line, 0, &config).unwrap();
        assert_eq!(key, "test:i:ate");
        assert_eq!(completion, "a:peach");
    }

    #[test]
    fn test_window_at_short_tail_completion() {
        let config = ChainConfig {
            key_length: 3,
            completion_length: 2,
            ..test_config()
        };
        let line = tokens(&["i", "ate", "a", "peach"]);
        let (key, completion) = window_at(&line, 0, &config).unwrap();
        assert_eq!(key, "test:i:ate:a");
        assert_eq!(completion, "peach");
    }

    #[test]
    fn test_window_at_no_tail_for_multi_token_completion() {
        let config = ChainConfig {
            completion_length: 2,
            ..test_config()
        };
        let line = tokens(&["i", "ate"]);
        assert!(window_at(&line, 0, &config).is_none());
    }

    #[test]
    fn test_window_at_past_end() {
        let config = test_config();
        let line = tokens(&["i", "ate", "a"]);
        assert!(window_at(&line, 2, &config).is_none());
        assert!(window_at(&line, usize::MAX, &config).is_none());
    }
}
