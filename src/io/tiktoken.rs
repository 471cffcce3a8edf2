//! Parser for the tiktoken BPE vocabulary format: one `<base64> <rank>`
//! entry per line.

use std::path::Path;

use crate::simd;
use crate::vocab::cl100k_vocab::Cl100kVocab;
use crate::Error;

fn strip_cr(line: &[u8]) -> &[u8] {
    if line.last() == Some(&b'\r') {
        &line[..line.len() - 1]
    } else {
        line
    }
}

/// Loads a tiktoken BPE file from disk.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Cl100kVocab, Error> {
    let data = std::fs::read(path)?;
    parse(&data)
}

/// Parses a tiktoken BPE file already held in memory.
pub fn parse(data: &[u8]) -> Result<Cl100kVocab, Error> {
    let mut vocab = Cl100kVocab::new();
    let mut decode_buf = [0u8; 256];

    for raw_line in data.split(|&b| b == b'\n') {
        let line = strip_cr(raw_line);
        if line.is_empty() {
            continue;
        }
        let space = line
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| Error::Parse("tiktoken line missing rank field".into()))?;
        let (b64, rest) = (&line[..space], &line[space + 1..]);
        let rank_str = std::str::from_utf8(rest).map_err(|_| Error::Parse("rank is not UTF-8".into()))?;
        let rank: u32 = rank_str.trim().parse().map_err(|_| Error::Parse(format!("invalid rank: {rank_str:?}")))?;

        let n = simd::base64_decode(b64, &mut decode_buf);
        if n == 0 || n > decode_buf.len() {
            return Err(Error::Parse("tiktoken entry decoded to an invalid byte length".into()));
        }
        vocab.insert(&decode_buf[..n], rank);
    }

    if !vocab.has_dense_byte_ranks() {
        return Err(Error::Parse("tiktoken file is missing one or more single-byte entries".into()));
    }
    Ok(vocab)
}
