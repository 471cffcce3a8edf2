//! cl100k_base pretokenizer: an 8-rule left-to-right scanner equivalent to
//! tiktoken's regex but implemented as hand-written rules over decoded
//! codepoints.

use super::Span;
use crate::simd;
use crate::unicode;
use crate::utf8;

#[inline]
fn cp_at(text: &[u8], pos: usize) -> (u32, usize) {
    utf8::decode(&text[pos..])
}

fn match_contraction(text: &[u8], pos: usize, len: usize) -> Option<usize> {
    if text[pos] != b'\'' {
        return None;
    }
    if pos + 3 <= len {
        let a = text[pos + 1].to_ascii_lowercase();
        let b = text[pos + 2].to_ascii_lowercase();
        if matches!((a, b), (b'r', b'e') | (b'v', b'e') | (b'l', b'l')) {
            return Some(pos + 3);
        }
    }
    if pos + 2 <= len {
        let a = text[pos + 1].to_ascii_lowercase();
        if matches!(a, b's' | b't' | b'm' | b'd') {
            return Some(pos + 2);
        }
    }
    None
}

fn match_leading_punct_word(text: &[u8], pos: usize, len: usize, cp0: u32, cp0_len: usize) -> Option<usize> {
    if unicode::is_newline(cp0) || unicode::is_letter(cp0) || unicode::is_number(cp0) {
        return None;
    }
    let after = pos + cp0_len;
    if after >= len || !text[after].is_ascii_alphabetic() {
        return None;
    }
    let run = simd::match_ascii_letters(&text[after..]);
    if run == 0 {
        return None;
    }
    Some(after + run)
}

fn match_letter_run(text: &[u8], pos: usize, len: usize, cp0: u32, cp0_len: usize) -> Option<usize> {
    if !unicode::is_letter(cp0) {
        return None;
    }
    let mut p = pos + cp0_len;
    loop {
        if p >= len {
            break;
        }
        let run = simd::match_ascii_letters(&text[p..]);
        if run > 0 {
            p += run;
            continue;
        }
        let (cp, cl) = cp_at(text, p);
        if unicode::is_letter(cp) {
            p += cl;
        } else {
            break;
        }
    }
    Some(p)
}

fn match_number_run(text: &[u8], pos: usize, len: usize, cp0: u32, cp0_len: usize) -> Option<usize> {
    if !unicode::is_number(cp0) {
        return None;
    }
    let mut p = pos + cp0_len;
    let mut count = 1;
    while count < 3 && p < len {
        let (cp, cl) = cp_at(text, p);
        if !unicode::is_number(cp) {
            break;
        }
        p += cl;
        count += 1;
    }
    Some(p)
}

fn is_punct(cp: u32) -> bool {
    !unicode::is_letter(cp) && !unicode::is_number(cp) && !unicode::is_whitespace(cp)
}

fn consume_punct_and_newlines(text: &[u8], mut p: usize, len: usize) -> usize {
    while p < len {
        let (cp, cl) = cp_at(text, p);
        if !is_punct(cp) {
            break;
        }
        p += cl;
    }
    while p < len {
        let (cp, cl) = cp_at(text, p);
        if !unicode::is_newline(cp) {
            break;
        }
        p += cl;
    }
    p
}

fn match_space_punct_run(text: &[u8], pos: usize, len: usize) -> Option<usize> {
    if text[pos] != b' ' {
        return None;
    }
    let after = pos + 1;
    if after >= len {
        return None;
    }
    let (cp1, _) = cp_at(text, after);
    if !is_punct(cp1) {
        return None;
    }
    Some(consume_punct_and_newlines(text, after, len))
}

fn match_punct_run(text: &[u8], pos: usize, len: usize, cp0: u32) -> Option<usize> {
    if !is_punct(cp0) {
        return None;
    }
    Some(consume_punct_and_newlines(text, pos, len))
}

fn match_whitespace_run(text: &[u8], pos: usize, len: usize, cp0: u32) -> Option<usize> {
    if !unicode::is_whitespace(cp0) {
        return None;
    }
    let mut p = pos;
    let mut last_start = pos;
    let mut last_len = 0usize;
    let mut last_cp = 0u32;
    loop {
        let (cp, cl) = cp_at(text, p);
        if !unicode::is_whitespace(cp) {
            break;
        }
        last_start = p;
        last_len = cl;
        last_cp = cp;
        p += cl;
        if p >= len {
            break;
        }
    }
    if p >= len {
        return Some(p);
    }
    if last_start == pos || unicode::is_newline(last_cp) {
        // A single-codepoint run has nothing to emit before its last
        // (only) whitespace codepoint, so it is emitted whole rather than
        // deferred; a run ending in a newline absorbs that newline too.
        Some(last_start + last_len)
    } else {
        Some(last_start)
    }
}

fn next_span_end(text: &[u8], pos: usize, len: usize) -> usize {
    if let Some(end) = match_contraction(text, pos, len) {
        return end;
    }
    let (cp0, cp0_len) = cp_at(text, pos);
    if let Some(end) = match_leading_punct_word(text, pos, len, cp0, cp0_len) {
        return end;
    }
    if let Some(end) = match_letter_run(text, pos, len, cp0, cp0_len) {
        return end;
    }
    if let Some(end) = match_number_run(text, pos, len, cp0, cp0_len) {
        return end;
    }
    if let Some(end) = match_space_punct_run(text, pos, len) {
        return end;
    }
    if let Some(end) = match_punct_run(text, pos, len, cp0) {
        return end;
    }
    if let Some(end) = match_whitespace_run(text, pos, len, cp0) {
        return end;
    }
    pos + cp0_len
}

/// Splits `text` into spans per the cl100k pretokenization rules. Spans
/// exactly cover `text` with no gaps or overlaps.
#[must_use]
pub fn pretokenize(text: &[u8]) -> Vec<Span> {
    let len = text.len();
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < len {
        let end = next_span_end(text, pos, len);
        debug_assert!(end > pos, "pretokenizer must always make forward progress");
        spans.push(Span { start: pos, end });
        pos = end;
    }
    spans
}
