use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::UTF_8;
use memchr::{memchr, memchr2};
use memmap2::Mmap;
use rayon::prelude::*;

use super::SourceError;
use crate::dataset::RawRow;
use crate::dataset::columns::canonical_name;

pub(super) fn read_rows(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let file = fs::File::open(path).map_err(|source| SourceError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;
    let len = file
        .metadata()
        .map_err(|source| SourceError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    // zero-length files cannot be mapped on every platform
    if len == 0 {
        return Err(SourceError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| SourceError::MemoryMap {
        path: path.to_path_buf(),
        source,
    })?;

    // BOM sniffing picks UTF-16 when marked; otherwise UTF-8 with the BOM stripped
    let (text, encoding, had_errors) = UTF_8.decode(&mmap);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "Malformed byte sequences replaced while decoding"
        );
    }
    parse(&text).map_err(|err| match err {
        ParseFailure::MissingHeader => SourceError::MissingHeader {
            path: path.to_path_buf(),
        },
        ParseFailure::UnterminatedQuote { record } => SourceError::UnterminatedQuote {
            path: path.to_path_buf(),
            record,
        },
    })
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum ParseFailure {
    MissingHeader,
    UnterminatedQuote { record: usize },
}

/// Split CSV text into rows keyed by the canonicalized header.
pub(super) fn parse(text: &str) -> Result<Vec<RawRow>, ParseFailure> {
    let ranges = record_ranges(text.as_bytes())?;
    let Some((&(start, end), body)) = ranges.split_first() else {
        return Err(ParseFailure::MissingHeader);
    };
    let header: Vec<String> = split_fields(&text[start..end])
        .into_iter()
        .map(|name| canonical_name(&name).to_string())
        .collect();

    let rows: Vec<RawRow> = body
        .par_iter()
        .map(|&(start, end)| {
            let fields = split_fields(&text[start..end]);
            let mut row = RawRow::with_capacity(header.len());
            // short records leave trailing columns absent; extra fields are ignored
            for (name, value) in header.iter().zip(fields) {
                row.insert(name, value);
            }
            row
        })
        .collect();
    Ok(rows)
}

/// Byte ranges of non-blank records. Newlines inside quotes do not end a
/// record; a trailing `\r` is excluded.
fn record_ranges(bytes: &[u8]) -> Result<Vec<(usize, usize)>, ParseFailure> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    let mut in_quotes = false;

    while let Some(offset) = memchr2(b'"', b'\n', &bytes[pos..]) {
        let at = pos + offset;
        if bytes[at] == b'"' {
            // a doubled quote toggles twice
            in_quotes = !in_quotes;
        } else if !in_quotes {
            push_record(&mut ranges, bytes, start, at);
            start = at + 1;
        }
        pos = at + 1;
    }
    if in_quotes {
        return Err(ParseFailure::UnterminatedQuote {
            record: ranges.len() + 1,
        });
    }
    push_record(&mut ranges, bytes, start, bytes.len());
    Ok(ranges)
}

fn push_record(ranges: &mut Vec<(usize, usize)>, bytes: &[u8], start: usize, mut end: usize) {
    if end > start && bytes[end - 1] == b'\r' {
        end -= 1;
    }
    if end > start {
        ranges.push((start, end));
    }
}

fn split_fields(record: &str) -> Vec<Cow<'_, str>> {
    let bytes = record.as_bytes();
    let mut fields = Vec::new();
    let mut pos = 0;

    loop {
        let end = if bytes.get(pos) == Some(&b'"') {
            let mut value = String::new();
            let mut cursor = pos + 1;
            while let Some(offset) = memchr(b'"', &bytes[cursor..]) {
                let quote = cursor + offset;
                value.push_str(&record[cursor..quote]);
                if bytes.get(quote + 1) == Some(&b'"') {
                    value.push('"');
                    cursor = quote + 2;
                } else {
                    cursor = quote + 1;
                    break;
                }
            }
            // anything between the closing quote and the delimiter is kept verbatim
            let end = memchr(b',', &bytes[cursor..]).map_or(bytes.len(), |o| cursor + o);
            value.push_str(&record[cursor.min(end)..end]);
            fields.push(Cow::Owned(value));
            end
        } else {
            let end = memchr(b',', &bytes[pos..]).map_or(bytes.len(), |o| pos + o);
            fields.push(Cow::Borrowed(&record[pos..end]));
            end
        };

        if end >= bytes.len() {
            break;
        }
        pos = end + 1;
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields_plain_and_quoted() {
        let fields = split_fields(r#"1,"Kabul, city","say ""hi""",,x"#);
        assert_eq!(fields, vec!["1", "Kabul, city", r#"say "hi""#, "", "x"]);
    }

    #[test]
    fn test_split_fields_trailing_delimiter() {
        assert_eq!(split_fields("a,"), vec!["a", ""]);
        assert_eq!(split_fields(r#""""#), vec![""]);
    }

    #[test]
    fn test_record_ranges_respect_quoted_newlines() {
        let text = "a,b\r\n\"x\ny\",2\r\n\r\nz,3";
        let ranges = record_ranges(text.as_bytes()).unwrap();
        let records: Vec<&str> = ranges.iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(records, vec!["a,b", "\"x\ny\",2", "z,3"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            record_ranges(b"a,b\n\"open,1\n"),
            Err(ParseFailure::UnterminatedQuote { record: 2 })
        );
    }
}
