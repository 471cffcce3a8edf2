//! Runtime invariant assertions for tokenizer correctness.
//!
//! These are debug-mode checks that catch bugs during development and
//! testing without impacting release performance; they compile to no-ops
//! when `debug_assertions` is off.

use crate::pretokenizer::{spans_cover_exactly, Span};
use crate::vocab::cl100k_vocab::Cl100kVocab;

/// Asserts that all token IDs in the slice are within vocabulary bounds.
#[inline]
pub fn assert_tokens_in_bounds(tokens: &[u32], vocab_size: usize) {
    #[cfg(debug_assertions)]
    {
        for (i, &token) in tokens.iter().enumerate() {
            debug_assert!(
                (token as usize) < vocab_size,
                "Invariant violation: token[{i}] = {token} >= vocab_size ({vocab_size})"
            );
        }
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (tokens, vocab_size);
    }
}

/// Asserts postconditions after encoding text to tokens: ids in bounds and
/// token count within the sanity bound [`crate::MAX_OUTPUT_TOKENS`].
#[inline]
pub fn assert_encode_postconditions(tokens: &[u32], vocab_size: usize) {
    #[cfg(debug_assertions)]
    {
        assert_tokens_in_bounds(tokens, vocab_size);
        debug_assert!(
            tokens.len() <= crate::MAX_OUTPUT_TOKENS,
            "Invariant violation: token count {} exceeds MAX_OUTPUT_TOKENS ({})",
            tokens.len(),
            crate::MAX_OUTPUT_TOKENS
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (tokens, vocab_size);
    }
}

/// Asserts preconditions before decoding tokens to text.
///
/// Only for tokens produced internally by the tokenizer; user-supplied
/// tokens should be validated with proper error handling, not assertions.
#[inline]
#[allow(dead_code)]
pub fn assert_decode_preconditions(tokens: &[u32], vocab_size: usize) {
    #[cfg(debug_assertions)]
    {
        assert_tokens_in_bounds(tokens, vocab_size);
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (tokens, vocab_size);
    }
}

/// Asserts that a pretokenizer's output spans exactly cover the input with
/// no gaps, overlaps, or empty spans.
#[inline]
pub fn assert_span_coverage(spans: &[Span], input_len: usize) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            spans_cover_exactly(spans, input_len),
            "Invariant violation: pretokenizer spans do not exactly cover input of length {input_len}"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (spans, input_len);
    }
}

/// Asserts that a cl100k vocabulary has a rank for every single byte value,
/// a property a correctly-loaded tiktoken file always has.
#[inline]
pub fn assert_vocab_has_dense_byte_ranks(vocab: &Cl100kVocab) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(vocab.has_dense_byte_ranks(), "Invariant violation: vocabulary is missing one or more single-byte ranks");
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = vocab;
    }
}

/// Asserts that a single token ID is valid.
#[inline]
#[allow(dead_code)]
pub fn assert_valid_token(token: u32, vocab_size: usize) {
    #[cfg(debug_assertions)]
    {
        debug_assert!((token as usize) < vocab_size, "Invariant violation: token {token} >= vocab_size ({vocab_size})");
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (token, vocab_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pretokenizer::Span;

    #[test]
    fn tokens_in_bounds_valid() {
        let tokens = vec![0, 100, 999];
        assert_tokens_in_bounds(&tokens, 1000);
    }

    #[test]
    #[should_panic(expected = "Invariant violation")]
    #[cfg(debug_assertions)]
    fn tokens_in_bounds_invalid() {
        let tokens = vec![0, 100, 1000];
        assert_tokens_in_bounds(&tokens, 1000);
    }

    #[test]
    fn encode_postconditions_valid() {
        let tokens = vec![1, 2, 3];
        assert_encode_postconditions(&tokens, 1000);
    }

    #[test]
    fn decode_preconditions_valid() {
        let tokens = vec![1, 2, 3];
        assert_decode_preconditions(&tokens, 1000);
    }

    #[test]
    fn span_coverage_valid() {
        let spans = vec![Span { start: 0, end: 3 }, Span { start: 3, end: 5 }];
        assert_span_coverage(&spans, 5);
    }

    #[test]
    #[should_panic(expected = "Invariant violation")]
    #[cfg(debug_assertions)]
    fn span_coverage_invalid() {
        let spans = vec![Span { start: 0, end: 3 }];
        assert_span_coverage(&spans, 5);
    }

    #[test]
    fn vocab_dense_byte_ranks_valid() {
        let mut vocab = Cl100kVocab::new();
        for b in 0..=255u16 {
            vocab.insert(&[b as u8], u32::from(b));
        }
        assert_vocab_has_dense_byte_ranks(&vocab);
    }

    #[test]
    fn valid_token() {
        assert_valid_token(0, 1000);
        assert_valid_token(999, 1000);
    }

    #[test]
    #[should_panic(expected = "Invariant violation")]
    #[cfg(debug_assertions)]
    fn invalid_token() {
        assert_valid_token(1000, 1000);
    }
}
