//! Vocabulary and merge-rule storage for the GPT-2 style tokenizer.

use super::{ByteMap, ByteTrie, MISSING};

/// `(first, second) -> rank` merge rules plus the `token -> id` map, id-to-
/// token array, and byte-trie that together drive GPT-2 style BPE.
#[derive(Debug)]
pub struct Gpt2Vocab {
    token_to_id: ByteMap,
    id_to_token: Vec<Box<[u8]>>,
    merges: ByteMap,
    trie: ByteTrie,
}

/// Merge-map keys are `first ++ [0x00] ++ second`; the byte-to-printable
/// map never produces a literal `0x00` byte, so this separator is
/// unambiguous.
fn merge_key(first: &[u8], second: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(first.len() + second.len() + 1);
    key.extend_from_slice(first);
    key.push(0);
    key.extend_from_slice(second);
    key
}

impl Gpt2Vocab {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_to_id: ByteMap::with_capacity(1 << 16),
            id_to_token: Vec::new(),
            merges: ByteMap::with_capacity(1 << 16),
            trie: ByteTrie::new(),
        }
    }

    pub fn insert_token(&mut self, bytes: &[u8], id: u32) {
        self.token_to_id.insert(bytes, id);
        self.trie.insert(bytes, id);
        let idx = id as usize;
        if self.id_to_token.len() <= idx {
            self.id_to_token.resize(idx + 1, Box::from(&[][..]));
        }
        self.id_to_token[idx] = bytes.into();
    }

    /// Inserts merges in file order; rank is assigned by insertion order
    /// (earlier merges get lower, i.e. more preferred, ranks).
    pub fn insert_merge(&mut self, first: &[u8], second: &[u8], rank: u32) {
        self.merges.insert(&merge_key(first, second), rank);
    }

    #[must_use]
    pub fn lookup_token(&self, bytes: &[u8]) -> u32 {
        self.token_to_id.lookup(bytes)
    }

    #[must_use]
    pub fn lookup_merge(&self, first: &[u8], second: &[u8]) -> u32 {
        self.merges.lookup(&merge_key(first, second))
    }

    #[must_use]
    pub fn lookup_whole(&self, bytes: &[u8]) -> Option<u32> {
        self.trie.lookup_whole(bytes)
    }

    #[must_use]
    pub fn token_bytes(&self, id: u32) -> Option<&[u8]> {
        self.id_to_token.get(id as usize).map(|b| b.as_ref())
    }

    #[must_use]
    pub fn num_tokens(&self) -> usize {
        self.id_to_token.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }
}

impl Default for Gpt2Vocab {
    fn default() -> Self {
        Self::new()
    }
}

const _: () = assert!(MISSING == u32::MAX);
