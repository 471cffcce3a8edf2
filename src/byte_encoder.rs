//! GPT-2 byte-to-printable-unicode bijection.
//!
//! GPT-2's BPE operates over a remapped alphabet so that every input byte
//! becomes a printable, whitespace-free character before pretokenization:
//! bytes that are already "nice" printable characters map to themselves,
//! and the remaining control/whitespace/high bytes map to codepoints
//! starting at `U+0100`. This keeps the vocabulary text-safe while staying
//! a lossless bijection over the full byte range.

use std::sync::OnceLock;

use crate::utf8;

struct ByteEncoder {
    /// UTF-8 bytes each input byte encodes to, plus that encoding's length.
    encode: [([u8; 4], usize); 256],
    /// Maps a printable codepoint back to its original byte.
    decode: std::collections::HashMap<u32, u8>,
}

fn build() -> ByteEncoder {
    let mut natural: Vec<u8> = Vec::with_capacity(256);
    natural.extend(b'!'..=b'~');
    natural.extend(0xA1..=0xAC);
    natural.extend(0xAE..=0xFF);

    let mut encode = [([0u8; 4], 0usize); 256];
    let mut decode = std::collections::HashMap::with_capacity(256);

    for &b in &natural {
        let (buf, len) = utf8::encode(u32::from(b));
        encode[b as usize] = (buf, len);
        decode.insert(u32::from(b), b);
    }

    let mut next_cp = 0x100u32;
    for b in 0u32..256 {
        if natural.contains(&(b as u8)) {
            continue;
        }
        let (buf, len) = utf8::encode(next_cp);
        encode[b as usize] = (buf, len);
        decode.insert(next_cp, b as u8);
        next_cp += 1;
    }

    ByteEncoder { encode, decode }
}

fn encoder() -> &'static ByteEncoder {
    static ENCODER: OnceLock<ByteEncoder> = OnceLock::new();
    ENCODER.get_or_init(build)
}

/// Encodes a single raw byte into its printable-Unicode representation.
/// Returns the UTF-8 bytes and their length (always `1..=2`, since target
/// codepoints never exceed `U+01FF`).
#[must_use]
pub fn encode_byte(b: u8) -> ([u8; 4], usize) {
    encoder().encode[b as usize]
}

/// Encodes a full byte string into its printable-Unicode form.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        let (buf, len) = encode_byte(b);
        out.push_str(std::str::from_utf8(&buf[..len]).expect("byte encoder always emits valid UTF-8"));
    }
    out
}

/// Recovers the original byte for a printable codepoint produced by
/// [`encode_byte`]. Returns `None` if `cp` was never emitted by the
/// encoder.
#[must_use]
pub fn decode_codepoint(cp: u32) -> Option<u8> {
    encoder().decode.get(&cp).copied()
}

/// Decodes a string produced by round-tripping through [`encode_bytes`]
/// back into raw bytes. Codepoints outside the encoder's range are skipped.
#[must_use]
pub fn decode_str(s: &str) -> Vec<u8> {
    s.chars().filter_map(|c| decode_codepoint(c as u32)).collect()
}
