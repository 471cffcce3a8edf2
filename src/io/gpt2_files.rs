//! Parsers for GPT-2 style `vocab.json` + `merges.txt` pairs.

use std::collections::HashMap;
use std::path::Path;

use crate::vocab::gpt2_vocab::Gpt2Vocab;
use crate::Error;

/// Loads a `vocab.json` / `merges.txt` pair from disk.
pub fn load_files<P: AsRef<Path>>(vocab_path: P, merges_path: P) -> Result<Gpt2Vocab, Error> {
    let vocab_json = std::fs::read(vocab_path)?;
    let merges_txt = std::fs::read(merges_path)?;
    parse(&vocab_json, &merges_txt)
}

/// Parses a `vocab.json` / `merges.txt` pair already held in memory.
pub fn parse(vocab_json: &[u8], merges_txt: &[u8]) -> Result<Gpt2Vocab, Error> {
    let tokens: HashMap<String, u32> = serde_json::from_slice(vocab_json)?;
    let mut vocab = Gpt2Vocab::new();
    for (token, id) in tokens {
        vocab.insert_token(token.as_bytes(), id);
    }

    let text = std::str::from_utf8(merges_txt).map_err(|_| Error::Parse("merges.txt is not UTF-8".into()))?;
    let mut rank = 0u32;
    for (i, line) in text.lines().enumerate() {
        if i == 0 {
            continue; // header, ignored
        }
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, ' ');
        let first = parts.next().ok_or_else(|| Error::Parse(format!("malformed merges.txt line {i}")))?;
        let second = parts.next().ok_or_else(|| Error::Parse(format!("malformed merges.txt line {i}")))?;
        vocab.insert_merge(first.as_bytes(), second.as_bytes(), rank);
        rank += 1;
    }

    if vocab.is_empty() {
        return Err(Error::Parse("vocab.json contained no tokens".into()));
    }
    Ok(vocab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_pair() {
        let vocab_json = br#"{"h":0,"e":1,"l":2,"o":3,"he":4}"#;
        let merges_txt = "#version: 1\nh e\n";
        let vocab = parse(vocab_json, merges_txt.as_bytes()).unwrap();
        assert_eq!(vocab.lookup_token(b"he"), 4);
        assert_eq!(vocab.lookup_merge(b"h", b"e"), 0);
    }

    #[test]
    fn skips_header_and_blank_lines() {
        let vocab_json = br#"{"a":0,"b":1,"ab":2}"#;
        let merges_txt = "#version: 1\n\na b\n\n";
        let vocab = parse(vocab_json, merges_txt.as_bytes()).unwrap();
        assert_eq!(vocab.lookup_merge(b"a", b"b"), 0);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse(b"not json", b"#h\n").is_err());
    }

    #[test]
    fn rejects_malformed_merge_line() {
        let vocab_json = br#"{"a":0}"#;
        let merges_txt = "#version: 1\nnotapair\n";
        assert!(parse(vocab_json, merges_txt.as_bytes()).is_err());
    }
}
