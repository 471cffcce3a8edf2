//! Loader round-trips against real files on disk, exercising
//! `Cl100kTokenizer::load_file` and `Gpt2Tokenizer::load_files`.

use chattok::{Cl100kTokenizer, Gpt2Tokenizer};
use std::io::Write;

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

#[test]
fn loads_tiktoken_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for b in 0u16..256 {
        writeln!(file, "{} {}", b64(&[b as u8]), b).unwrap();
    }
    writeln!(file, "{} 256", b64(b"the")).unwrap();
    file.flush().unwrap();

    let tokenizer = Cl100kTokenizer::load_file(file.path()).unwrap();
    assert_eq!(tokenizer.encode("the"), vec![256]);
}

#[test]
fn missing_tiktoken_file_is_an_io_error() {
    let err = Cl100kTokenizer::load_file("/nonexistent/path/does/not/exist.tiktoken").unwrap_err();
    assert!(matches!(err, chattok::Error::Io(_)));
}

#[test]
fn loads_gpt2_vocab_and_merges_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let vocab_path = dir.path().join("vocab.json");
    let merges_path = dir.path().join("merges.txt");

    std::fs::write(&vocab_path, br#"{"h":0,"e":1,"l":2,"o":3,"he":4,"llo":5,"hello":6}"#).unwrap();
    std::fs::write(&merges_path, "#version: 1\nh e\nl l\nhe llo\n").unwrap();

    let mut tokenizer = Gpt2Tokenizer::load_files(&vocab_path, &merges_path).unwrap();
    let ids = tokenizer.encode("hello").unwrap();
    assert_eq!(ids, vec![6]);
}

#[test]
fn missing_gpt2_merges_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let vocab_path = dir.path().join("vocab.json");
    let merges_path = dir.path().join("missing.txt");
    std::fs::write(&vocab_path, br#"{"a":0}"#).unwrap();
    let err = Gpt2Tokenizer::load_files(&vocab_path, &merges_path).unwrap_err();
    assert!(matches!(err, chattok::Error::Io(_)));
}
