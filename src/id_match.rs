//! Pair-mate identity check.
//!
//! Two FASTQ records are mates of the same paired-end read if their IDs --
//! the header text up to the first space or tab -- agree, after optionally
//! stripping a trailing `1`/`2`/`3` digit that both IDs share (the classic
//! `/1` `/2` Illumina convention, generalized to `1`/`2`/`3` without
//! requiring the slash).

use memchr::memchr2;

use crate::error::{Error, ErrorKind, Result};

/// Text-input variant of [`is_mate`]: `header1` and `header2` must be
/// single-byte (8-bit-clean) encodable, i.e. every `char` must fit in one
/// latin-1 byte. Headers containing wider code points are rejected with
/// [`ErrorKind::NotSingleByte`] rather than silently compared as UTF-8.
pub fn is_mate_str(header1: &str, header2: &str, header1_length: usize) -> Result<bool> {
    let h1 = latin1_bytes(header1)?;
    let h2 = latin1_bytes(header2)?;
    Ok(is_mate(&h1, &h2, header1_length))
}

fn latin1_bytes(s: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let cp = ch as u32;
        if cp > 0xFF {
            return Err(Error::new(ErrorKind::NotSingleByte));
        }
        out.push(cp as u8);
    }
    Ok(out)
}

/// Returns true if `header1` and `header2` identify mates of a paired-end
/// read.
///
/// `header1_length` is the number of bytes of `header1` to consider (callers
/// that have a known ID length for `header1` can avoid rescanning it).
pub fn is_mate(header1: &[u8], header2: &[u8], header1_length: usize) -> bool {
    let id2_end = memchr2(b' ', b'\t', header2).unwrap_or(header2.len());

    if header1_length < id2_end {
        return false;
    }

    // one byte past where id1 would end if it had the same length as id2;
    // if that byte exists and isn't a separator, id1 continues past id2's
    // end, so the ids differ.
    if let Some(&tail) = header1.get(id2_end) {
        if tail != b' ' && tail != b'\t' {
            return false;
        }
    }

    let mut cut = id2_end;
    if cut > 0 {
        let last1 = header1[cut - 1];
        let last2 = header2[cut - 1];
        if matches!(last1, b'1' | b'2' | b'3') && matches!(last2, b'1' | b'2' | b'3') {
            cut -= 1;
        }
    }

    header1[..cut] == header2[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_ids_match() {
        let h = b"read1 comment";
        assert!(is_mate(h, h, h.len()));
    }

    #[test]
    fn paired_end_suffix_is_stripped() {
        assert!(is_mate(b"read/1 comment", b"read/2 other", 13));
    }

    #[test]
    fn differing_prefixes_do_not_match() {
        assert!(!is_mate(b"readA", b"readB", 5));
    }

    #[test]
    fn longer_id1_does_not_match() {
        assert!(!is_mate(b"read1", b"read1extra", 5));
    }

    #[test]
    fn single_sided_digit_suffix_does_not_strip() {
        // only one side ends in 1/2/3 -> no stripping, ids must match fully
        assert!(!is_mate(b"read1", b"read", 5));
    }

    #[test]
    fn no_description_matches_exactly() {
        assert!(is_mate(b"read", b"read", 4));
        assert!(!is_mate(b"read", b"reads", 4));
    }

    #[test]
    fn str_variant_matches_ascii_headers() {
        assert!(is_mate_str("read/1 comment", "read/2 other", 13).unwrap());
    }

    #[test]
    fn str_variant_rejects_non_single_byte_header() {
        let err = is_mate_str("read\u{1F9EC}/1", "read\u{1F9EC}/2", 6).unwrap_err();
        assert!(matches!(err.into_kind(), ErrorKind::NotSingleByte));
    }

    #[test]
    fn str_variant_accepts_latin1_range_header() {
        // 'é' (U+00E9) fits in one latin-1 byte, so this must not be rejected.
        assert!(is_mate_str("re\u{E9}d/1", "re\u{E9}d/2", 5).unwrap());
    }
}
