//! GPT-2 pretokenizer: a rule set in the same shape as the cl100k scanner
//! but with different matching rules, matching the convention used by the
//! original GPT-2 regex (`'s|'t|'re|...| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+`)
//! without a regex engine.

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
        if matches!(a, b's' | b't' | b'd' | b'm') {
            return Some(pos + 2);
        }
    }
    None
}

fn consume_letter_run(text: &[u8], start: usize, len: usize) -> usize {
    let mut p = start;
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
    p
}

fn match_letter_rule(text: &[u8], pos: usize, len: usize, cp0: u32, cp0_len: usize) -> Option<usize> {
    if unicode::is_letter(cp0) {
        return Some(consume_letter_run(text, pos, len));
    }
    if unicode::is_number(cp0) || unicode::is_newline(cp0) {
        return None;
    }
    let after = pos + cp0_len;
    if after >= len {
        return None;
    }
    let (cp1, _) = cp_at(text, after);
    if !unicode::is_letter(cp1) {
        return None;
    }
    Some(consume_letter_run(text, after, len))
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

fn is_nonspace_punct(cp: u32) -> bool {
    cp != u32::from(b' ') && !unicode::is_letter(cp) && !unicode::is_number(cp)
}

fn is_crlf(cp: u32) -> bool {
    cp == 0x0D || cp == 0x0A
}

fn consume_nonspace_punct_and_crlf(text: &[u8], pos: usize, len: usize) -> usize {
    let mut p = pos;
    while p < len {
        let (cp, cl) = cp_at(text, p);
        if !is_nonspace_punct(cp) {
            break;
        }
        p += cl;
    }
    while p < len {
        let (cp, cl) = cp_at(text, p);
        if !is_crlf(cp) {
            break;
        }
        p += cl;
    }
    p
}

fn match_space_punct_crlf(text: &[u8], pos: usize, len: usize, cp0: u32) -> Option<usize> {
    if text[pos] == b' ' {
        let after = pos + 1;
        if after >= len {
            return None;
        }
        let (cp1, _) = cp_at(text, after);
        if !is_nonspace_punct(cp1) {
            return None;
        }
        return Some(consume_nonspace_punct_and_crlf(text, after, len));
    }
    if !is_nonspace_punct(cp0) {
        return None;
    }
    Some(consume_nonspace_punct_and_crlf(text, pos, len))
}

fn match_whitespace_rule(text: &[u8], pos: usize, len: usize, cp0: u32) -> Option<usize> {
    if !unicode::is_whitespace(cp0) {
        return None;
    }
    let mut p = pos;
    let mut count = 0usize;
    let mut last_start = pos;
    loop {
        if p >= len {
            break;
        }
        let (cp, cl) = cp_at(text, p);
        if !unicode::is_whitespace(cp) {
            break;
        }
        last_start = p;
        p += cl;
        count += 1;
    }
    if p < len {
        let (cp_next, _) = cp_at(text, p);
        if unicode::is_letter(cp_next) && count >= 2 {
            return Some(last_start);
        }
    }
    Some(p)
}

fn next_span_end(text: &[u8], pos: usize, len: usize) -> usize {
    if let Some(end) = match_contraction(text, pos, len) {
        return end;
    }
    let (cp0, cp0_len) = cp_at(text, pos);
    if let Some(end) = match_letter_rule(text, pos, len, cp0, cp0_len) {
        return end;
    }
    if let Some(end) = match_number_run(text, pos, len, cp0, cp0_len) {
        return end;
    }
    if let Some(end) = match_space_punct_crlf(text, pos, len, cp0) {
        return end;
    }
    if let Some(end) = match_whitespace_rule(text, pos, len, cp0) {
        return end;
    }
    pos + cp0_len
}

/// Splits `text` into spans per the GPT-2 pretokenization rules. Spans
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
