//! End-to-end scenarios against the public facade, mirroring the concrete
//! examples a reference tiktoken/GPT-2 tokenizer is expected to match.

use chattok::{Cl100kTokenizer, Error, Gpt2Tokenizer};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn b64(bytes: &[u8]) -> String {
    let mut out = String::new();
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = *chunk.get(1).unwrap_or(&0);
        let b2 = *chunk.get(2).unwrap_or(&0);
        out.push(ALPHABET[(b0 >> 2) as usize] as char);
        out.push(ALPHABET[(((b0 & 0x03) << 4) | (b1 >> 4)) as usize] as char);
        out.push(if chunk.len() > 1 { ALPHABET[(((b1 & 0x0F) << 2) | (b2 >> 6)) as usize] as char } else { '=' });
        out.push(if chunk.len() > 2 { ALPHABET[(b2 & 0x3F) as usize] as char } else { '=' });
    }
    out
}

/// A minimal but legal tiktoken file: all 256 single bytes, plus a handful
/// of multi-byte merges rich enough to exercise contractions, letter runs,
/// digit runs, and a Japanese word.
fn sample_tiktoken_file() -> String {
    let mut lines = Vec::new();
    for b in 0u16..256 {
        lines.push(format!("{} {}", b64(&[b as u8]), b));
    }
    let mut rank = 256u32;
    let mut push = |bytes: &[u8], lines: &mut Vec<String>, rank: &mut u32| {
        lines.push(format!("{} {}", b64(bytes), *rank));
        *rank += 1;
    };
    push(b"hello", &mut lines, &mut rank);
    push(b" world", &mut lines, &mut rank);
    push(b"abc", &mut lines, &mut rank);
    push(b"'ll", &mut lines, &mut rank);
    push(b" def", &mut lines, &mut rank);
    push(b"123", &mut lines, &mut rank);
    push(b"456", &mut lines, &mut rank);
    push("日本語".as_bytes(), &mut lines, &mut rank);
    lines.join("\n")
}

fn sample_cl100k() -> Cl100kTokenizer {
    Cl100kTokenizer::load_bytes(sample_tiktoken_file().as_bytes()).unwrap()
}

#[test]
fn scenario_hello_world_two_ids() {
    let t = sample_cl100k();
    let ids = t.encode("hello world");
    assert_eq!(ids.len(), 2);
    assert_eq!(t.decode(&ids[..1]), "hello");
}

#[test]
fn scenario_empty_input_zero_ids() {
    let t = sample_cl100k();
    assert_eq!(t.encode("").len(), 0);
}

#[test]
fn scenario_three_spaces_one_id() {
    let t = sample_cl100k();
    assert_eq!(t.encode("   ").len(), 1);
}

#[test]
fn scenario_contraction_after_letter_run() {
    let t = sample_cl100k();
    let ids = t.encode("abc'll def");
    // "abc" -> one id, "'ll" -> one id, " def" -> one id.
    assert_eq!(ids.len(), 3);
}

#[test]
fn scenario_digit_run_splits_on_three() {
    let t = sample_cl100k();
    let ids = t.encode("123456");
    assert_eq!(ids.len(), 2);
}

#[test]
fn scenario_decode_round_trips_mixed_script() {
    let t = sample_cl100k();
    let s = "Hello, world! 日本語 123";
    let ids = t.encode(s);
    assert_eq!(t.decode(&ids), s);
}

#[test]
fn count_tokens_matches_encode_len_for_all_scenarios() {
    let t = sample_cl100k();
    for s in ["hello world", "", "   ", "abc'll def", "123456", "Hello, world! 日本語 123"] {
        assert_eq!(t.count_tokens(s), t.encode(s).len());
    }
}

fn byte_only_gpt2_vocab_json() -> String {
    // vocab.json mapping every byte-encoder output string to an id 0..256,
    // which is the minimum legal GPT-2 vocabulary (pure byte fallback).
    let mut entries = Vec::new();
    for b in 0u16..256 {
        let ch = chattok::byte_encoder::encode_bytes(&[b as u8]);
        entries.push(format!("{:?}:{}", ch, b));
    }
    format!("{{{}}}", entries.join(","))
}

fn sample_gpt2() -> Gpt2Tokenizer {
    let vocab_json = byte_only_gpt2_vocab_json();
    let merges_txt = "#version: 1\n";
    Gpt2Tokenizer::load_bytes(vocab_json.as_bytes(), merges_txt.as_bytes()).unwrap()
}

#[test]
fn gpt2_byte_fallback_decodes_losslessly() {
    let mut t = sample_gpt2();
    let s = "Hello, world! 123";
    let ids = t.encode(s).unwrap();
    assert_eq!(t.decode(&ids), s);
}

#[test]
fn gpt2_count_tokens_matches_encode_len() {
    let mut t = sample_gpt2();
    for s in ["hello world", "", "   ", "123456"] {
        let n = t.count_tokens(s).unwrap();
        let ids = t.encode(s).unwrap();
        assert_eq!(n, ids.len());
    }
}

#[test]
fn encode_into_reports_capacity_error_without_partial_write() {
    let t = sample_cl100k();
    let mut buf = [0xFFFF_FFFFu32; 1];
    let err = t.encode_into("hello world", &mut buf).unwrap_err();
    assert!(matches!(err, Error::Capacity));
}

#[test]
fn input_exceeding_max_size_is_rejected() {
    let t = sample_cl100k();
    let huge = "a".repeat(chattok::MAX_INPUT_SIZE + 1);
    let mut buf = vec![0u32; 4];
    assert!(matches!(t.encode_into(&huge, &mut buf), Err(Error::InputTooLarge)));
}
