//! Parsers for the on-disk vocabulary formats consumed at `load` time.
//!
//! Loading is one-shot and all-or-nothing: a tokenizer instance is either
//! fully loaded from a well-formed file or left untouched, never partially
//! populated.

pub mod gpt2_files;
pub mod tiktoken;
