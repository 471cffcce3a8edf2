//! Rank-minimum BPE merger for cl100k_base: repeatedly merges the globally
//! lowest-rank adjacent pair until no merge is available.

use crate::simd;
use crate::vocab::cl100k_vocab::Cl100kVocab;
use crate::vocab::MISSING;

struct Part {
    start: usize,
    rank: u32,
}

fn lookup_span(vocab: &Cl100kVocab, piece: &[u8], start: usize, end: usize) -> u32 {
    if end > piece.len() {
        return MISSING;
    }
    vocab.lookup(&piece[start..end])
}

/// `parts[i].rank` is always the rank of merging segment `i` with segment
/// `i+1`, i.e. the combined span `piece[parts[i].start .. parts[i+2].start]`.
/// Returns the sentinel if segment `i+1` has no successor to merge with.
fn combined_span_rank(vocab: &Cl100kVocab, piece: &[u8], parts: &[Part], i: usize) -> u32 {
    match parts.get(i + 2) {
        Some(next) => lookup_span(vocab, piece, parts[i].start, next.start),
        None => MISSING,
    }
}

/// Encodes one piece (a single pretoken span's bytes) into token ids,
/// appending them to `out`.
pub fn encode_piece(vocab: &Cl100kVocab, piece: &[u8], out: &mut Vec<u32>) {
    let len = piece.len();
    if len == 0 {
        return;
    }
    if len == 1 {
        out.push(vocab.byte_rank(piece[0]));
        return;
    }
    let whole = vocab.lookup(piece);
    if whole != MISSING {
        out.push(whole);
        return;
    }

    let mut parts: Vec<Part> = (0..=len).map(|i| Part { start: i, rank: MISSING }).collect();
    for i in 0..parts.len() {
        parts[i].rank = combined_span_rank(vocab, piece, &parts, i);
    }

    loop {
        if parts.len() < 2 {
            break;
        }
        let ranks: Vec<u32> = parts[..parts.len() - 1].iter().map(|p| p.rank).collect();
        let (k, min_rank) = simd::argmin_u32(&ranks);
        if min_rank == MISSING {
            break;
        }
        parts.remove(k + 1);
        if k > 0 {
            parts[k - 1].rank = combined_span_rank(vocab, piece, &parts, k - 1);
        }
        parts[k].rank = combined_span_rank(vocab, piece, &parts, k);
    }

    for i in 0..parts.len() - 1 {
        let start = parts[i].start;
        let end = parts[i + 1].start;
        let r = vocab.lookup(&piece[start..end]);
        if r != MISSING {
            out.push(r);
        } else {
            // Vocabulary miss mid-merge: fall back to raw bytes. Always
            // succeeds because single-byte ranks are dense after load.
            for &b in &piece[start..end] {
                out.push(vocab.byte_rank(b));
            }
        }
    }
}
