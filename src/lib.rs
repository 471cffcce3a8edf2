//! # chattok
//!
//! Pure Rust BPE tokenizers for local LLM chat: a tiktoken-compatible
//! `cl100k_base` encoder and a GPT-2 style vocab+merges encoder, both built
//! on hand-written SIMD primitives rather than a regex engine.
//!
//! ## Features
//!
//! - Pure Rust, no bindings to `tiktoken` or Python
//! - cl100k_base: loads the standard tiktoken `.tiktoken` BPE file
//! - GPT-2 style: loads `vocab.json` + `merges.txt` (the format shipped by
//!   Qwen and other GPT-2-lineage models)
//! - Hand-rolled pretokenizers, vocabulary hashing, and BPE mergers — no
//!   dependency on a regex crate for pretokenization
//!
//! ## Example
//!
//! ```no_run
//! use chattok::Cl100kTokenizer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tokenizer = Cl100kTokenizer::load_file("cl100k_base.tiktoken")?;
//! let ids = tokenizer.encode("Hello, world!");
//! let _text = tokenizer.decode(&ids);
//! # Ok(())
//! # }
//! ```

use rayon::prelude::*;
use std::path::Path;

pub mod bpe;
pub mod byte_encoder;
pub mod cache;
pub mod invariants;
pub mod io;
pub mod pretokenizer;
pub mod simd;
pub mod unicode;
pub mod utf8;
pub mod vocab;

use vocab::cl100k_vocab::Cl100kVocab;
use vocab::gpt2_vocab::Gpt2Vocab;

/// Token ID type used throughout the library.
pub type TokenId = u32;

/// Maximum input text size accepted by a single `encode` call (10 MiB).
pub const MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Sanity bound on tokens produced by a single `encode` call, checked by
/// [`invariants::assert_encode_postconditions`] rather than enforced.
pub const MAX_OUTPUT_TOKENS: usize = 1_000_000;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse vocabulary data: {0}")]
    Parse(String),

    #[error("failed to parse vocab.json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output buffer capacity exceeded")]
    Capacity,

    #[error("vocabulary miss for byte sequence {0:?} during BPE merge (corrupt load)")]
    VocabularyMiss(Vec<u8>),

    #[error("input exceeds MAX_INPUT_SIZE ({MAX_INPUT_SIZE} bytes)")]
    InputTooLarge,
}

/// tiktoken-compatible `cl100k_base` tokenizer.
///
/// The vocabulary is immutable after load and the rank-minimum merger holds
/// no per-call state, so a loaded instance may be shared (read-only) across
/// threads; [`encode_batch`](Self::encode_batch) relies on this to
/// parallelize across independent texts.
#[derive(Debug)]
pub struct Cl100kTokenizer {
    vocab: Cl100kVocab,
}

impl Cl100kTokenizer {
    /// An empty tokenizer with no vocabulary loaded.
    #[must_use]
    pub fn new() -> Self {
        Self { vocab: Cl100kVocab::new() }
    }

    /// Loads a `cl100k_base`-format tiktoken BPE file from disk.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let vocab = io::tiktoken::load_file(path)?;
        invariants::assert_vocab_has_dense_byte_ranks(&vocab);
        Ok(Self { vocab })
    }

    /// Loads a tiktoken BPE file already held in memory.
    pub fn load_bytes(data: &[u8]) -> Result<Self, Error> {
        let vocab = io::tiktoken::parse(data)?;
        invariants::assert_vocab_has_dense_byte_ranks(&vocab);
        Ok(Self { vocab })
    }

    fn check_input(text: &str) -> Result<(), Error> {
        if text.len() > MAX_INPUT_SIZE {
            return Err(Error::InputTooLarge);
        }
        Ok(())
    }

    /// Encodes `text` into a sequence of token ids.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<TokenId> {
        let bytes = text.as_bytes();
        let spans = pretokenizer::cl100k::pretokenize(bytes);
        invariants::assert_span_coverage(&spans, bytes.len());
        let mut out = Vec::with_capacity(bytes.len() / 3 + 1);
        for span in spans {
            bpe::rank_merge::encode_piece(&self.vocab, span.bytes(bytes), &mut out);
        }
        invariants::assert_encode_postconditions(&out, self.vocab.num_tokens());
        out
    }

    /// Encodes `text` into `out_buf`, returning the number of ids written.
    /// Returns [`Error::Capacity`] without writing past `out_buf.len()` if
    /// the buffer is too small, or [`Error::InputTooLarge`] if `text`
    /// exceeds [`MAX_INPUT_SIZE`].
    pub fn encode_into(&self, text: &str, out_buf: &mut [TokenId]) -> Result<usize, Error> {
        Self::check_input(text)?;
        let ids = self.encode(text);
        if ids.len() > out_buf.len() {
            return Err(Error::Capacity);
        }
        out_buf[..ids.len()].copy_from_slice(&ids);
        Ok(ids.len())
    }

    /// Encodes many independent texts in parallel.
    #[must_use]
    pub fn encode_batch(&self, texts: &[&str]) -> Vec<Vec<TokenId>> {
        texts.par_iter().map(|t| self.encode(t)).collect()
    }

    /// Equivalent to `self.encode(text).len()`.
    #[must_use]
    pub fn count_tokens(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Decodes a sequence of token ids back into text. Ids with no
    /// vocabulary entry are silently skipped.
    #[must_use]
    pub fn decode(&self, ids: &[TokenId]) -> String {
        invariants::assert_tokens_in_bounds(ids, self.vocab.num_tokens());
        let mut bytes = Vec::new();
        for &id in ids {
            if let Some(tok) = self.vocab.token_bytes(id) {
                bytes.extend_from_slice(tok);
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[must_use]
    pub fn num_tokens(&self) -> usize {
        self.vocab.num_tokens()
    }
}

impl Default for Cl100kTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// GPT-2 style vocab+merges tokenizer (the format used by Qwen and other
/// GPT-2-lineage models).
///
/// Unlike [`Cl100kTokenizer`], encoding carries a mutable piece cache, so
/// `encode` takes `&mut self` and a single instance must not be shared
/// across threads; independent instances may be used concurrently.
#[derive(Debug)]
pub struct Gpt2Tokenizer {
    vocab: Gpt2Vocab,
    cache: cache::PieceCache,
}

impl Gpt2Tokenizer {
    /// An empty tokenizer with no vocabulary loaded.
    #[must_use]
    pub fn new() -> Self {
        Self { vocab: Gpt2Vocab::new(), cache: cache::PieceCache::new() }
    }

    /// Loads `vocab.json` and `merges.txt` from disk.
    pub fn load_files<P: AsRef<Path>>(vocab_path: P, merges_path: P) -> Result<Self, Error> {
        Ok(Self { vocab: io::gpt2_files::load_files(vocab_path, merges_path)?, cache: cache::PieceCache::new() })
    }

    /// Loads `vocab.json` and `merges.txt` already held in memory.
    pub fn load_bytes(vocab_json: &[u8], merges_txt: &[u8]) -> Result<Self, Error> {
        Ok(Self { vocab: io::gpt2_files::parse(vocab_json, merges_txt)?, cache: cache::PieceCache::new() })
    }

    fn check_input(text: &str) -> Result<(), Error> {
        if text.len() > MAX_INPUT_SIZE {
            return Err(Error::InputTooLarge);
        }
        Ok(())
    }

    fn encode_span(&mut self, raw: &[u8], out: &mut Vec<TokenId>) -> Result<(), Error> {
        let mapped = byte_encoder::encode_bytes(raw);
        let mapped = mapped.as_bytes();

        if let Some(ids) = self.cache.lookup(mapped) {
            out.extend_from_slice(ids);
            return Ok(());
        }
        if let Some(id) = self.vocab.lookup_whole(mapped) {
            out.push(id);
            self.cache.store(mapped, &[id]);
            return Ok(());
        }

        let mut piece_ids = Vec::new();
        bpe::heap_merge::encode_piece(&self.vocab, mapped, &mut piece_ids)?;
        self.cache.store(mapped, &piece_ids);
        out.extend_from_slice(&piece_ids);
        Ok(())
    }

    /// Encodes `text` into a sequence of token ids.
    pub fn encode(&mut self, text: &str) -> Result<Vec<TokenId>, Error> {
        Self::check_input(text)?;
        let bytes = text.as_bytes();
        let spans = pretokenizer::gpt2::pretokenize(bytes);
        invariants::assert_span_coverage(&spans, bytes.len());
        let mut out = Vec::with_capacity(bytes.len() / 3 + 1);
        for span in spans {
            self.encode_span(span.bytes(bytes), &mut out)?;
        }
        invariants::assert_encode_postconditions(&out, self.vocab.num_tokens());
        Ok(out)
    }

    /// Encodes `text` into `out_buf`, returning the number of ids written.
    pub fn encode_into(&mut self, text: &str, out_buf: &mut [TokenId]) -> Result<usize, Error> {
        let ids = self.encode(text)?;
        if ids.len() > out_buf.len() {
            return Err(Error::Capacity);
        }
        out_buf[..ids.len()].copy_from_slice(&ids);
        Ok(ids.len())
    }

    /// Encodes many independent texts sequentially. Not parallelized: the
    /// piece cache is mutable shared state across calls and is not safe to
    /// access from multiple threads at once.
    pub fn encode_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<TokenId>>, Error> {
        texts.iter().map(|t| self.encode(t)).collect()
    }

    /// Equivalent to `self.encode(text)?.len()`.
    pub fn count_tokens(&mut self, text: &str) -> Result<usize, Error> {
        Ok(self.encode(text)?.len())
    }

    /// Decodes a sequence of token ids back into text, reversing the
    /// byte-to-printable map. Ids with no vocabulary entry are silently
    /// skipped.
    #[must_use]
    pub fn decode(&self, ids: &[TokenId]) -> String {
        invariants::assert_tokens_in_bounds(ids, self.vocab.num_tokens());
        let mut raw = Vec::new();
        for &id in ids {
            if let Some(tok) = self.vocab.token_bytes(id) {
                if let Ok(s) = std::str::from_utf8(tok) {
                    raw.extend(byte_encoder::decode_str(s));
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[must_use]
    pub fn num_tokens(&self) -> usize {
        self.vocab.num_tokens()
    }
}

impl Default for Gpt2Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
