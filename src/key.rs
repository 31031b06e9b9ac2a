//! Key codec: token windows to store keys and back.
//!
//! A key is an ordered token window joined with the model separator,
//! optionally prefixed by the model namespace. Completions are encoded
//! the same way without the namespace. Token sequences and already
//! encoded keys are kept as distinct entry points; nothing inspects a
//! value at runtime to guess which one it is.

use crate::error::{ChainError, Result};

/// Join tokens with the separator, without any validation.
pub(crate) fn join<S: AsRef<str>>(tokens: &[S], separator: &str) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Encode a token window as a bare key (no namespace).
///
/// # Errors
/// Returns [`ChainError::EmptyTokens`] if the window is empty.
pub fn encode<S: AsRef<str>>(tokens: &[S], separator: &str) -> Result<String> {
    if tokens.is_empty() {
        return Err(ChainError::EmptyTokens);
    }
    Ok(join(tokens, separator))
}

/// Encode a token window as a namespace-qualified key.
///
/// # Errors
/// Returns [`ChainError::EmptyTokens`] if the window is empty.
pub fn encode_namespaced<S: AsRef<str>>(
    tokens: &[S],
    namespace: &str,
    separator: &str,
) -> Result<String> {
    if tokens.is_empty() {
        return Err(ChainError::EmptyTokens);
    }
    Ok(format!("{namespace}{separator}{}", join(tokens, separator)))
}

/// Split an encoded key back into tokens.
///
/// Not guaranteed to round-trip when a token itself contains the
/// separator character; that ambiguity is inherent to the encoding.
pub fn decode(key: &str, separator: &str) -> Vec<String> {
    key.split(separator).map(str::to_string).collect()
}

/// Split an encoded key into tokens and drop the leading namespace
/// component if present. This is the form used as a generation seed.
pub fn decode_seed(key: &str, namespace: &str, separator: &str) -> Vec<String> {
    let mut tokens = decode(key, separator);
    if tokens.first().is_some_and(|t| t == namespace) {
        tokens.remove(0);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let key = encode(&["foo", "bar"], ":").unwrap();
        assert_eq!(key, "foo:bar");
    }

    #[test]
    fn test_encode_namespaced() {
        let key = encode_namespaced(&["foo", "bar"], "test", ":").unwrap();
        assert_eq!(key, "test:foo:bar");
    }

    #[test]
    fn test_encode_single_token() {
        assert_eq!(encode(&["foo"], ":").unwrap(), "foo");
    }

    #[test]
    fn test_encode_empty_rejected() {
        let empty: &[&str] = &[];
        assert!(matches!(encode(empty, ":"), Err(ChainError::EmptyTokens)));
        assert!(matches!(
            encode_namespaced(empty, "test", ":"),
            Err(ChainError::EmptyTokens)
        ));
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("test:foo:bar", ":"), vec!["test", "foo", "bar"]);
        assert_eq!(decode("foo", ":"), vec!["foo"]);
    }

    #[test]
    fn test_decode_seed_strips_namespace() {
        assert_eq!(decode_seed("test:foo:bar", "test", ":"), vec!["foo", "bar"]);
        // No namespace prefix: tokens pass through untouched
        assert_eq!(decode_seed("foo:bar", "test", ":"), vec!["foo", "bar"]);
    }

    #[test]
    fn test_separator_inside_token_does_not_round_trip() {
        let key = encode(&["a:b", "c"], ":").unwrap();
        assert_eq!(decode(&key, ":"), vec!["a", "b", "c"]);
    }
}
