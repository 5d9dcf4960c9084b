//! Readers for n-gram count files and word lists.
//!
//! N-gram files come in two layouts:
//! - a header line `<n> <lines>` followed by `<count> <gram>` lines;
//! - bare `<gram> <count>` lines (n is taken from the first gram).
//!
//! Blank lines and lines starting with `#` are ignored in both formats.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use enigma::api::{Dictionary, NgramTable};

fn content_lines(src: &str) -> impl Iterator<Item = (usize, &str)> {
    src.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let mut it = line.split_whitespace();
    let a = it.next()?;
    let b = it.next()?;
    it.next().is_none().then_some((a, b))
}

/// Parse n-gram counts from either supported layout.
pub fn parse_ngrams(src: &str) -> Result<NgramTable> {
    let mut lines = content_lines(src).peekable();
    let Some(&(_, first)) = lines.peek() else {
        bail!("n-gram file has no entries");
    };

    let header = split_pair(first)
        .and_then(|(a, b)| Some((a.parse::<usize>().ok()?, b.parse::<u64>().ok()?)));
    let mut n = None;
    if let Some((header_n, _)) = header {
        n = Some(header_n);
        lines.next();
    }

    let mut grams: Vec<(String, u64)> = Vec::new();
    for (lineno, line) in lines {
        let (a, b) = split_pair(line)
            .with_context(|| format!("line {lineno}: expected two fields, got {line:?}"))?;
        let (gram, count) = match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(count), Err(_)) => (b, count),
            (Err(_), Ok(count)) => (a, count),
            _ => bail!("line {lineno}: expected one gram and one count, got {line:?}"),
        };
        let gram = gram.to_ascii_uppercase();
        let width = *n.get_or_insert(gram.len());
        if gram.len() != width {
            bail!(
                "line {lineno}: gram {gram:?} has {} letters, expected {width}",
                gram.len()
            );
        }
        grams.push((gram, count));
    }
    let n = n.context("n-gram file has no entries")?;
    NgramTable::from_counts(n, grams).context("building n-gram table")
}

pub fn load_ngrams(path: &Path) -> Result<NgramTable> {
    let src =
        fs::read_to_string(path).with_context(|| format!("reading n-gram file {}", path.display()))?;
    parse_ngrams(&src).with_context(|| format!("parsing n-gram file {}", path.display()))
}

/// Whitespace-separated words, case-insensitive.
pub fn parse_dictionary(src: &str) -> Result<Dictionary> {
    let words: Vec<String> = content_lines(src)
        .flat_map(|(_, l)| l.split_whitespace())
        .map(str::to_ascii_uppercase)
        .collect();
    let dict = Dictionary::new(words)?;
    if dict.is_empty() {
        bail!("word list is empty");
    }
    Ok(dict)
}

pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
    let src =
        fs::read_to_string(path).with_context(|| format!("reading word list {}", path.display()))?;
    parse_dictionary(&src).with_context(|| format!("parsing word list {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_header_layout() {
        let table = parse_ngrams("2 3\n50 TH\n30 HE\n20 IN\n").unwrap();
        assert_eq!(table.n(), 2);
        assert!((table.log_prob(&[19, 7]) - 0.5f32.log10()).abs() < 1e-6);
        assert_eq!(table.log_prob(&[0, 0]), table.floor());
    }

    #[test]
    fn parses_gram_count_layout() {
        let table = parse_ngrams("# quadgrams\ntion 40\n\nTHER 60\n").unwrap();
        assert_eq!(table.n(), 4);
        assert!((table.log_prob(&[19, 7, 4, 17]) - 0.6f32.log10()).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_ngram_files() {
        assert!(parse_ngrams("").is_err());
        assert!(parse_ngrams("TH 5\nTHE 2\n").is_err());
        assert!(parse_ngrams("TH five\n").is_err());
        assert!(parse_ngrams("TH 5 extra\n").is_err());
        assert!(parse_ngrams("T1 5\n").is_err());
        assert!(parse_ngrams("2 1\n").is_err());
    }

    #[test]
    fn dictionary_words_are_uppercased() {
        let dict = parse_dictionary("the and\nWetter\n# comment\n\n").unwrap();
        assert_eq!(dict.len(), 3);
        assert!(parse_dictionary("\n# nothing\n").is_err());
        assert!(parse_dictionary("don't\n").is_err());
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none.txt");
        let err = load_ngrams(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("reading n-gram file"));

        let words = dir.path().join("words.txt");
        fs::write(&words, "WETTER\nBERICHT\n").unwrap();
        assert_eq!(load_dictionary(&words).unwrap().len(), 2);
    }
}
