//! Heap-driven BPE merger for the GPT-2 style tokenizer: a doubly-linked
//! list of codepoint-sized parts reduced by repeatedly popping the
//! lowest-rank adjacent pair from a min-heap, with lazy deletion and
//! rank-staleness re-validation standing in for a decrease-key heap.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::utf8;
use crate::vocab::gpt2_vocab::Gpt2Vocab;
use crate::vocab::MISSING;
use crate::Error;

struct Part {
    start: usize,
    end: usize,
    prev: Option<usize>,
    next: Option<usize>,
    deleted: bool,
    /// Rank of merging this part with its current `next`, or [`MISSING`].
    /// Re-checked against the popped heap entry to detect staleness caused
    /// by an intervening merge on either side.
    next_rank: u32,
}

fn bytes_of<'a>(part: &Part, data: &'a [u8]) -> &'a [u8] {
    &data[part.start..part.end]
}

fn split_into_codepoint_parts(piece: &[u8]) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut pos = 0;
    while pos < piece.len() {
        let (_, len) = utf8::decode(&piece[pos..]);
        parts.push(Part { start: pos, end: pos + len, prev: None, next: None, deleted: false, next_rank: MISSING });
        pos += len;
    }
    let n = parts.len();
    for i in 0..n {
        parts[i].prev = if i == 0 { None } else { Some(i - 1) };
        parts[i].next = if i + 1 < n { Some(i + 1) } else { None };
    }
    parts
}

fn pair_rank(vocab: &Gpt2Vocab, piece: &[u8], parts: &[Part], a: usize, b: usize) -> u32 {
    vocab.lookup_merge(bytes_of(&parts[a], piece), bytes_of(&parts[b], piece))
}

/// Encodes one byte-to-printable-mapped piece into token ids, appending
/// them to `out`. `piece` must already be the printable-mapped UTF-8 bytes
/// of a single pretoken span.
pub fn encode_piece(vocab: &Gpt2Vocab, piece: &[u8], out: &mut Vec<u32>) -> Result<(), Error> {
    if piece.is_empty() {
        return Ok(());
    }

    let mut parts = split_into_codepoint_parts(piece);
    let mut heap: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    for i in 0..parts.len() {
        if let Some(n) = parts[i].next {
            let rank = pair_rank(vocab, piece, &parts, i, n);
            parts[i].next_rank = rank;
            if rank != MISSING {
                heap.push(Reverse((rank, seq, i)));
                seq += 1;
            }
        }
    }

    while let Some(Reverse((rank, _, idx))) = heap.pop() {
        if parts[idx].deleted {
            continue;
        }
        let Some(next_idx) = parts[idx].next else { continue };
        if parts[idx].next_rank != rank {
            continue; // stale: this pair's rank changed since it was pushed
        }

        parts[idx].end = parts[next_idx].end;
        parts[next_idx].deleted = true;
        let after = parts[next_idx].next;
        parts[idx].next = after;
        if let Some(a) = after {
            parts[a].prev = Some(idx);
        }

        if let Some(a) = parts[idx].next {
            let r = pair_rank(vocab, piece, &parts, idx, a);
            parts[idx].next_rank = r;
            if r != MISSING {
                heap.push(Reverse((r, seq, idx)));
                seq += 1;
            }
        } else {
            parts[idx].next_rank = MISSING;
        }

        if let Some(p) = parts[idx].prev {
            let r = pair_rank(vocab, piece, &parts, p, idx);
            parts[p].next_rank = r;
            if r != MISSING {
                heap.push(Reverse((r, seq, p)));
                seq += 1;
            }
        }
    }

    // Index 0 is never anyone's "next", so it never gets deleted and is
    // always the head of the surviving list.
    let mut cur = Some(0usize);
    while let Some(i) = cur {
        let seg = bytes_of(&parts[i], piece);
        let id = vocab.lookup_token(seg);
        if id == MISSING {
            return Err(Error::VocabularyMiss(seg.to_vec()));
        }
        out.push(id);
        cur = parts[i].next;
    }
    Ok(())
}
