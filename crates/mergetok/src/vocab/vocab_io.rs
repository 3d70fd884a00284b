//! # Vocabulary IO
//!
//! Flat UTF-8 text, one entry per line, tab-separated, no header:
//!
//! ```text
//! <token>\t<id>\t<frequency>
//! ```

use crate::errors::{BpeError, Result};
use crate::types::TokenType;
use crate::vocab::vocabulary::Vocabulary;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Write a [`Vocabulary`] to a stream, one line per entry, in id order.
pub fn write_vocab<T, W>(
    vocab: &Vocabulary<T>,
    writer: &mut W,
) -> Result<()>
where
    T: TokenType,
    W: Write,
{
    for (token, entry) in vocab.iter() {
        writeln!(writer, "{}\t{}\t{}", token, entry.id, entry.frequency)?;
    }
    Ok(())
}

/// Save a [`Vocabulary`] to a file, creating missing parent directories.
///
/// # Arguments
/// * `vocab` - the vocabulary to save.
/// * `path` - the path to save the vocabulary to.
pub fn save_vocab_to_path<T, P>(
    vocab: &Vocabulary<T>,
    path: P,
) -> Result<()>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_vocab(vocab, &mut writer)?;
    writer.flush()?;

    log::info!("Saved {} tokens to {}", vocab.len(), path.display());
    Ok(())
}

fn parse_line(
    line_no: usize,
    line: &str,
) -> Result<(&str, u64, u64)> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [token, id, frequency] = fields[..] else {
        return Err(BpeError::malformed(
            line_no,
            format!("expected 3 tab-separated fields, found {}", fields.len()),
        ));
    };

    let id: u64 = id
        .parse()
        .map_err(|e| BpeError::malformed(line_no, format!("invalid id {id:?}: {e}")))?;
    let frequency: u64 = frequency.parse().map_err(|e| {
        BpeError::malformed(line_no, format!("invalid frequency {frequency:?}: {e}"))
    })?;

    Ok((token, id, frequency))
}

/// Read a [`Vocabulary`] from a line stream.
///
/// Line order is not significant. Nothing is returned unless every line
/// parses and the entries form a valid vocabulary.
pub fn read_vocab<T, R>(reader: R) -> Result<Vocabulary<T>>
where
    T: TokenType,
    R: BufRead,
{
    let lines = reader
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            line.map_err(|e| match e.kind() {
                ErrorKind::InvalidData => BpeError::malformed(idx + 1, "invalid UTF-8"),
                _ => e.into(),
            })
        })
        .collect::<Result<Vec<String>>>()?;

    let entries = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| parse_line(idx + 1, line))
        .collect::<Result<Vec<_>>>()?;

    Vocabulary::from_entries(entries)
}

/// Load a [`Vocabulary`] from a file.
///
/// # Arguments
/// * `path` - the path to the vocabulary file.
pub fn load_vocab_from_path<T, P>(path: P) -> Result<Vocabulary<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let vocab = read_vocab(BufReader::new(file))?;

    log::info!("Loaded {} tokens from {}", vocab.len(), path.display());
    Ok(vocab)
}
