//! Byte-pair-encoding mergers. The two tokenizer variants use entirely
//! separate merge algorithms (no shared trait, no dynamic dispatch): cl100k
//! uses an O(L²) rank-minimum reduction over a flat array, GPT-2 uses a
//! min-heap over a doubly-linked list of parts.

pub mod heap_merge;
pub mod rank_merge;
