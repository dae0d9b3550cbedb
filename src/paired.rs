//! Buffer-synchronization primitive for paired-end FASTQ streams.
//!
//! [`scan_paired_heads`] walks two byte buffers in lock-step, counting line
//! terminators, and returns the largest prefix of each buffer that contains
//! the same number of complete (four-line) FASTQ records. This lets a
//! paired-end reader advance both streams together without ever splitting a
//! record across a refill boundary.

use memchr::memchr_iter;

/// Returns `(len1, len2)`: the byte offsets, within `buf1` and `buf2`
/// respectively, of the end of the last FASTQ record both buffers have in
/// common (a whole number of four-line records on both sides).
///
/// If one buffer has fewer complete records than the other, the returned
/// lengths correspond to the smaller common record count; any remaining
/// tail in either buffer is left for the next refill and is guaranteed to
/// start at a record boundary.
pub fn scan_paired_heads(buf1: &[u8], buf2: &[u8]) -> (usize, usize) {
    let mut it1 = memchr_iter(b'\n', buf1);
    let mut it2 = memchr_iter(b'\n', buf2);

    let mut cut1 = 0;
    let mut cut2 = 0;
    let mut count = 0u32;

    loop {
        let (Some(p1), Some(p2)) = (it1.next(), it2.next()) else {
            break;
        };
        count += 1;
        if count % 4 == 0 {
            cut1 = p1 + 1;
            cut2 = p2 + 1;
        }
    }

    (cut1, cut2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fastq_records(n: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for i in 0..n {
            out.extend_from_slice(format!("@r{i}\nACGT\n+\n!!!!\n").as_bytes());
        }
        out
    }

    #[test]
    fn equal_buffers_scan_to_end() {
        let buf = fastq_records(5);
        let (l1, l2) = scan_paired_heads(&buf, &buf);
        assert_eq!(l1, buf.len());
        assert_eq!(l2, buf.len());
    }

    #[test]
    fn truncated_tail_on_one_side_stops_scan_at_shared_boundary() {
        let mut buf1 = fastq_records(5);
        buf1.extend_from_slice(b"@r5\nAC");
        let mut buf2 = fastq_records(5);
        buf2.extend_from_slice(b"@r5\nACGT\n+\nAA"); // mid-record, missing final \n

        let (l1, l2) = scan_paired_heads(&buf1, &buf2);
        let boundary = fastq_records(5).len();
        assert_eq!(l1, boundary);
        assert_eq!(l2, boundary);
    }

    #[test]
    fn empty_buffers_scan_to_zero() {
        assert_eq!(scan_paired_heads(b"", b""), (0, 0));
    }
}
