//! Owned FASTQ record values.
//!
//! This module provides the two record flavors the parser can materialize:
//! [`ByteRecord`] (uninterpreted byte strings) and [`TextRecord`] (8-bit-clean
//! text, with ASCII-restricted serialization). Both share the same three-field
//! shape -- `name`, `sequence`, `qualities` -- and the same length invariant
//! between `sequence` and `qualities`.

use crate::error::{shorten_latin1, Error, Result};
use crate::id_match;
use std::ops::Range;

/// FASTQ record with uninterpreted byte-string fields.
///
/// `qualities` is always present: the parser never produces a `ByteRecord`
/// without quality scores (that situation is reserved for FASTA-origin
/// records, which this crate does not read).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ByteRecord {
    pub name: Vec<u8>,
    pub sequence: Vec<u8>,
    pub qualities: Vec<u8>,
}

impl ByteRecord {
    /// Builds a record, checking that `qualities` and `sequence` have equal
    /// length.
    pub fn new(name: Vec<u8>, sequence: Vec<u8>, qualities: Vec<u8>) -> Result<Self> {
        check_lengths(&name, sequence.len(), qualities.len())?;
        Ok(ByteRecord {
            name,
            sequence,
            qualities,
        })
    }

    /// Number of bases in `sequence`.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns a new record with the same name and the sequence/qualities
    /// sliced to `range`.
    pub fn slice(&self, range: Range<usize>) -> Self {
        ByteRecord {
            name: self.name.clone(),
            sequence: self.sequence[range.clone()].to_vec(),
            qualities: self.qualities[range].to_vec(),
        }
    }

    /// Returns true if `self` and `other` are mates of a paired-end read,
    /// per [`id_match::is_mate`].
    #[inline]
    pub fn is_mate(&self, other: &ByteRecord) -> bool {
        id_match::is_mate(&self.name, &other.name, self.name.len())
    }

    /// Returns the qualities as a byte slice.
    #[inline]
    pub fn qualities_as_bytes(&self) -> &[u8] {
        &self.qualities
    }

    /// Serializes the record to FASTQ format:
    /// `@NAME\nSEQ\n+[NAME]\nQUAL\n`. Allocates the output buffer exactly
    /// once, at its final size.
    pub fn serialize_fastq(&self, two_headers: bool) -> Vec<u8> {
        let extra_name = if two_headers { self.name.len() } else { 0 };
        let capacity = self.name.len() + self.sequence.len() + self.qualities.len() + 6 + extra_name;
        let mut out = Vec::with_capacity(capacity);
        out.push(b'@');
        out.extend_from_slice(&self.name);
        out.push(b'\n');
        out.extend_from_slice(&self.sequence);
        out.push(b'\n');
        out.push(b'+');
        if two_headers {
            out.extend_from_slice(&self.name);
        }
        out.push(b'\n');
        out.extend_from_slice(&self.qualities);
        out.push(b'\n');
        debug_assert_eq!(out.len(), capacity);
        out
    }
}

/// FASTQ record with 8-bit-clean text fields.
///
/// `qualities` is `Some` for every record the parser produces; `None` is
/// reserved for FASTA-origin records, which are out of scope here but kept
/// in the type so a `TextRecord` can still express "no quality line" for
/// callers who construct one by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRecord {
    pub name: String,
    pub sequence: String,
    pub qualities: Option<String>,
}

impl TextRecord {
    /// Builds a record, checking that, if present, `qualities` and
    /// `sequence` have equal length.
    pub fn new(name: String, sequence: String, qualities: Option<String>) -> Result<Self> {
        let qual_len = qualities.as_ref().map(|q| q.len());
        if let Some(qlen) = qual_len {
            check_lengths(name.as_bytes(), sequence.len(), qlen)?;
        }
        Ok(TextRecord {
            name,
            sequence,
            qualities,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns a new record with the same name and the sequence/qualities
    /// sliced to `range` (byte offsets, since both fields are 8-bit-clean).
    pub fn slice(&self, range: Range<usize>) -> Self {
        TextRecord {
            name: self.name.clone(),
            sequence: self.sequence[range.clone()].to_string(),
            qualities: self.qualities.as_ref().map(|q| q[range].to_string()),
        }
    }

    /// Returns whether `self` and `other` are mates of a paired-end read,
    /// per [`id_match::is_mate_str`]. Fails with
    /// [`crate::error::ErrorKind::NotSingleByte`] if either name is not
    /// 8-bit-clean.
    #[inline]
    pub fn is_mate(&self, other: &TextRecord) -> Result<bool> {
        id_match::is_mate_str(&self.name, &other.name, self.name.len())
    }

    /// Returns the qualities as an ASCII byte string, or an empty slice if
    /// absent.
    #[inline]
    pub fn qualities_as_bytes(&self) -> &[u8] {
        self.qualities.as_deref().unwrap_or("").as_bytes()
    }

    /// Serializes the record to FASTQ format. `sequence` and `qualities`
    /// must be ASCII; `name` may contain non-ASCII code points, which are
    /// encoded latin-1-style (one byte per code point) rather than as UTF-8.
    pub fn serialize_fastq(&self, two_headers: bool) -> Result<Vec<u8>> {
        let qualities = self.qualities.as_deref().unwrap_or("");
        if !self.sequence.is_ascii() {
            return Err(Error::value(format!(
                "cannot serialize non-ASCII sequence for record '{}'",
                shorten_latin1(self.name.as_bytes(), 80)
            )));
        }
        if !qualities.is_ascii() {
            return Err(Error::value(format!(
                "cannot serialize non-ASCII qualities for record '{}'",
                shorten_latin1(self.name.as_bytes(), 80)
            )));
        }
        let name_bytes = latin1_encode(&self.name)?;
        let extra_name = if two_headers { name_bytes.len() } else { 0 };
        let capacity = name_bytes.len() + self.sequence.len() + qualities.len() + 6 + extra_name;
        let mut out = Vec::with_capacity(capacity);
        out.push(b'@');
        out.extend_from_slice(&name_bytes);
        out.push(b'\n');
        out.extend_from_slice(self.sequence.as_bytes());
        out.push(b'\n');
        out.push(b'+');
        if two_headers {
            out.extend_from_slice(&name_bytes);
        }
        out.push(b'\n');
        out.extend_from_slice(qualities.as_bytes());
        out.push(b'\n');
        debug_assert_eq!(out.len(), capacity);
        Ok(out)
    }
}

/// Decodes `bytes` latin-1-style: one `char` per byte, no re-validation.
/// This is how the parser's text flavor materializes raw FASTQ bytes into
/// 8-bit-clean `String`s without ever failing on non-UTF-8 input.
pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encodes `s` latin-1-style: one byte per code point. Fails if any code
/// point does not fit in a single byte.
fn latin1_encode(s: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let cp = ch as u32;
        if cp > 0xFF {
            return Err(Error::value(format!(
                "cannot represent code point U+{:04X} in name as latin-1",
                cp
            )));
        }
        out.push(cp as u8);
    }
    Ok(out)
}

fn check_lengths(name: &[u8], seq_len: usize, qual_len: usize) -> Result<()> {
    if seq_len != qual_len {
        return Err(Error::value(format!(
            "sequence length ({}) does not match quality length ({}) for record '{}'",
            seq_len,
            qual_len,
            shorten_latin1(name, 80)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_record_length_mismatch_is_rejected() {
        let err = ByteRecord::new(b"r1".to_vec(), b"ACGT".to_vec(), b"!!!".to_vec());
        assert!(err.is_err());
    }

    #[test]
    fn serialize_fastq_sizes_exactly() {
        let rec = ByteRecord::new(b"r1".to_vec(), b"ACGT".to_vec(), b"!!!!".to_vec()).unwrap();
        let out = rec.serialize_fastq(false);
        assert_eq!(out, b"@r1\nACGT\n+\n!!!!\n");
        let out2 = rec.serialize_fastq(true);
        assert_eq!(out2, b"@r1\nACGT\n+r1\n!!!!\n");
    }

    #[test]
    fn slice_keeps_name_and_slices_seq_qual() {
        let rec = TextRecord::new(
            "r1".to_string(),
            "ACGTACGT".to_string(),
            Some("IIIIIIII".to_string()),
        )
        .unwrap();
        let sliced = rec.slice(2..5);
        assert_eq!(sliced.name, "r1");
        assert_eq!(sliced.sequence, "GTA");
        assert_eq!(sliced.qualities.as_deref(), Some("III"));
    }

    #[test]
    fn non_ascii_sequence_fails_serialization() {
        let rec = TextRecord::new("r1".to_string(), "ACGT\u{1F9EC}".to_string(), None).unwrap();
        assert!(rec.serialize_fastq(false).is_err());
    }

    #[test]
    fn non_ascii_name_serializes_latin1() {
        let rec =
            TextRecord::new("r\u{E9}".to_string(), "ACGT".to_string(), Some("!!!!".to_string()))
                .unwrap();
        let out = rec.serialize_fastq(false).unwrap();
        assert_eq!(out[1], 0xE9);
    }

    #[test]
    fn text_record_is_mate_matches_paired_suffix() {
        let r1 = TextRecord::new("read/1".to_string(), "ACGT".to_string(), Some("!!!!".to_string()))
            .unwrap();
        let r2 = TextRecord::new("read/2".to_string(), "TTTT".to_string(), Some("!!!!".to_string()))
            .unwrap();
        assert!(r1.is_mate(&r2).unwrap());
    }

    #[test]
    fn text_record_is_mate_rejects_non_single_byte_name() {
        let r1 = TextRecord::new("read\u{1F9EC}".to_string(), "ACGT".to_string(), None).unwrap();
        let r2 = TextRecord::new("read\u{1F9EC}".to_string(), "TTTT".to_string(), None).unwrap();
        assert!(r1.is_mate(&r2).is_err());
    }
}
