//! The streaming FASTQ parser.
//!
//! [`FastqParser`] is a pull-based iterator: it owns a resizable byte
//! buffer, pulls bytes from a `std::io::Read` byte-source, locates records by
//! scanning for line terminators, validates structure, and materializes
//! record values. See the module-level docs in the crate root for the full
//! parsing algorithm.

use std::io::Read;
use std::marker::PhantomData;

use memchr::memchr;

use crate::error::{shorten_latin1, Error, ErrorKind, Result};
use crate::policy::{BufPolicy, StdPolicy};
use crate::record::{latin1_decode, ByteRecord, TextRecord};

mod sealed {
    pub trait Sealed {}
}

/// Strategy for materializing a parsed record, parameterizing
/// [`FastqParser`] over its output type.
///
/// This trait is sealed: the only implementors are [`ByteRecord`],
/// [`TextRecord`], and [`Custom<C>`] for any `C: FromFastqParts`. Callers
/// who want their own record type implement [`FromFastqParts`] and use
/// `FastqParser<R, Custom<MyRecord>>`.
pub trait RecordKind: sealed::Sealed {
    type Output;

    #[doc(hidden)]
    fn materialize(name: &[u8], sequence: &[u8], qualities: &[u8]) -> Result<Self::Output>;
}

impl sealed::Sealed for ByteRecord {}

impl RecordKind for ByteRecord {
    type Output = ByteRecord;

    fn materialize(name: &[u8], sequence: &[u8], qualities: &[u8]) -> Result<Self::Output> {
        ByteRecord::new(name.to_vec(), sequence.to_vec(), qualities.to_vec())
    }
}

impl sealed::Sealed for TextRecord {}

impl RecordKind for TextRecord {
    type Output = TextRecord;

    fn materialize(name: &[u8], sequence: &[u8], qualities: &[u8]) -> Result<Self::Output> {
        TextRecord::new(
            latin1_decode(name),
            latin1_decode(sequence),
            Some(latin1_decode(qualities)),
        )
    }
}

/// Constructor interface for caller-supplied record types.
///
/// Implement this to have [`FastqParser`] materialize your own record type
/// directly via `FastqParser<R, Custom<YourType>>`. The three text values
/// received here are already length-validated (`sequence.len() ==
/// qualities.len()`); `from_fastq_parts` only needs to decide how to store
/// them, not whether they're consistent.
pub trait FromFastqParts: Sized {
    fn from_fastq_parts(name: &str, sequence: &str, qualities: &str) -> Result<Self>;
}

/// [`RecordKind`] strategy that materializes records via a caller-supplied
/// [`FromFastqParts`] implementation.
pub struct Custom<C>(PhantomData<C>);

impl<C> sealed::Sealed for Custom<C> {}

impl<C: FromFastqParts> RecordKind for Custom<C> {
    type Output = C;

    fn materialize(name: &[u8], sequence: &[u8], qualities: &[u8]) -> Result<Self::Output> {
        let name = latin1_decode(name);
        let sequence = latin1_decode(sequence);
        let qualities = latin1_decode(qualities);
        C::from_fastq_parts(&name, &sequence, &qualities)
    }
}

/// One item produced by [`FastqParser::next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<T> {
    /// Emitted exactly once, before the first `Record`. The `bool` reports
    /// whether the first record's separator line repeats the name (`+NAME`
    /// rather than a bare `+`).
    Header(bool),
    /// A fully parsed, materialized record.
    Record(T),
    /// End of input: no more records will follow. Idempotent once reached.
    End,
}

/// Offsets of the four line-terminating `\n` bytes of a located record,
/// relative to the parser's buffer.
#[derive(Debug, Clone, Copy)]
struct RecordSpan {
    name_end: usize,
    seq_end: usize,
    plus_end: usize,
    qual_end: usize,
}

/// A located and structurally validated record, with CRLF-stripped field
/// lengths, ready to be materialized.
#[derive(Debug, Clone, Copy)]
struct ValidatedSpan {
    span: RecordSpan,
    name_len: usize,
    seq_len: usize,
    qual_len: usize,
}

/// Streaming FASTQ parser.
///
/// `K` selects the record flavor materialized by [`FastqParser::next`]:
/// [`ByteRecord`] (default), [`TextRecord`], or `Custom<C>` for a
/// caller-supplied type implementing [`FromFastqParts`]. `P` selects the
/// buffer growth policy (see the [`policy`](crate::policy) module).
pub struct FastqParser<R, K = ByteRecord, P = StdPolicy>
where
    R: Read,
    K: RecordKind,
{
    source: R,
    buf: Vec<u8>,
    capacity: usize,
    filled: usize,
    record_start: usize,
    records_emitted: u64,
    eof_reached: bool,
    header_emitted: bool,
    synthetic_newline_added: bool,
    /// Absolute offset of the synthetically appended `\n`, if any, valid
    /// only until the next `refill` (which either consumes or replaces it).
    synthetic_newline_pos: Option<usize>,
    /// The span of the first record, located while producing the `Header`
    /// event but deliberately left unvalidated until it's actually
    /// materialized -- see `next`.
    pending_first: Option<RecordSpan>,
    policy: P,
    _marker: PhantomData<K>,
}

impl<R, K> FastqParser<R, K, StdPolicy>
where
    R: Read,
    K: RecordKind,
{
    /// Creates a new parser with the given initial buffer capacity, which
    /// must be at least 1.
    pub fn with_capacity(source: R, initial_capacity: usize) -> Result<Self> {
        if initial_capacity < 1 {
            return Err(Error::value("initial_capacity must be >= 1"));
        }
        Ok(FastqParser {
            source,
            buf: vec![0u8; initial_capacity],
            capacity: initial_capacity,
            filled: 0,
            record_start: 0,
            records_emitted: 0,
            eof_reached: false,
            header_emitted: false,
            synthetic_newline_added: false,
            synthetic_newline_pos: None,
            pending_first: None,
            policy: StdPolicy,
            _marker: PhantomData,
        })
    }
}

impl<R> FastqParser<R, ByteRecord, StdPolicy>
where
    R: Read,
{
    /// Creates a new byte-flavored parser with the given initial buffer
    /// capacity.
    pub fn new(source: R, initial_capacity: usize) -> Result<Self> {
        FastqParser::with_capacity(source, initial_capacity)
    }
}

impl<R, K, P> FastqParser<R, K, P>
where
    R: Read,
    K: RecordKind,
    P: BufPolicy,
{
    /// Replaces the buffer growth policy, consuming `self`.
    pub fn set_policy<P2: BufPolicy>(self, policy: P2) -> FastqParser<R, K, P2> {
        FastqParser {
            source: self.source,
            buf: self.buf,
            capacity: self.capacity,
            filled: self.filled,
            record_start: self.record_start,
            records_emitted: self.records_emitted,
            eof_reached: self.eof_reached,
            header_emitted: self.header_emitted,
            synthetic_newline_added: self.synthetic_newline_added,
            synthetic_newline_pos: self.synthetic_newline_pos,
            pending_first: self.pending_first,
            policy,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Number of records yielded so far (excludes the `Header` event).
    #[inline]
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    #[inline]
    fn pending(&self) -> &[u8] {
        &self.buf[self.record_start..self.filled]
    }

    /// Locates the next record's four line terminators within the pending
    /// bytes, without consuming anything. Returns `None` if fewer than four
    /// `\n` remain in the pending range.
    fn try_find_span(&self) -> Option<RecordSpan> {
        let hay = self.pending();
        let mut offsets = [0usize; 4];
        let mut search_from = 0;
        for offset in offsets.iter_mut() {
            let rel = memchr(b'\n', &hay[search_from..])?;
            let abs = self.record_start + search_from + rel;
            *offset = abs;
            search_from = search_from + rel + 1;
        }
        Some(RecordSpan {
            name_end: offsets[0],
            seq_end: offsets[1],
            plus_end: offsets[2],
            qual_end: offsets[3],
        })
    }

    /// Strips one trailing `\r` from `buf[start..end)`, returning its
    /// length.
    #[inline]
    fn crlf_stripped_len(&self, start: usize, end: usize) -> usize {
        let len = end - start;
        if len > 0 && self.buf[end - 1] == b'\r' {
            len - 1
        } else {
            len
        }
    }

    /// Runs the structural validation of steps 4-7 of the parsing
    /// algorithm against an already-located record span.
    ///
    /// If the record's quality line reaches only as far as a synthetic
    /// trailing newline the parser appended itself (see `refill`) and its
    /// length doesn't match the sequence, this isn't a malformed record --
    /// the source simply ran out mid-quality-line -- so a `PrematureEof`
    /// is raised instead of the usual length-mismatch `Format` error.
    fn validate_span(&self, span: RecordSpan) -> Result<ValidatedSpan> {
        let n = self.records_emitted;

        if self.buf[self.record_start] != b'@' {
            return Err(Error::format(
                format!(
                    "expected '@' at record start but found '{}'",
                    self.buf[self.record_start] as char
                ),
                4 * n,
            ));
        }

        if self.buf.get(span.seq_end + 1) != Some(&b'+') {
            let found = self
                .buf
                .get(span.seq_end + 1)
                .map(|&b| format!("'{}'", b as char))
                .unwrap_or_else(|| "end of line".to_string());
            return Err(Error::format(
                format!("expected '+' separator but found {}", found),
                4 * n + 2,
            ));
        }

        let name_len = self.crlf_stripped_len(self.record_start + 1, span.name_end);
        let seq_len = self.crlf_stripped_len(span.name_end + 1, span.seq_end);
        let second_header_len = self.crlf_stripped_len(span.seq_end + 2, span.plus_end);
        let qual_len = self.crlf_stripped_len(span.plus_end + 1, span.qual_end);

        if second_header_len > 0 {
            let name = &self.buf[self.record_start + 1..self.record_start + 1 + name_len];
            let second = &self.buf[span.seq_end + 2..span.seq_end + 2 + second_header_len];
            if name != second {
                return Err(Error::format(
                    format!(
                        "repeated header does not match record name: '{}' != '{}'",
                        shorten_latin1(name, 80),
                        shorten_latin1(second, 80)
                    ),
                    4 * n + 2,
                ));
            }
        }

        if qual_len != seq_len {
            if self.synthetic_newline_added && self.synthetic_newline_pos == Some(span.qual_end) {
                return Err(self.premature_eof_for_tail());
            }
            return Err(Error::format(
                format!(
                    "sequence length ({}) does not match quality length ({})",
                    seq_len, qual_len
                ),
                4 * n + 3,
            ));
        }

        Ok(ValidatedSpan {
            span,
            name_len,
            seq_len,
            qual_len,
        })
    }

    /// Locates the next record's span, without validating its structural
    /// content. Returns `Ok(None)` at a clean end of input (no partial
    /// record pending).
    fn locate_span(&mut self) -> Result<Option<RecordSpan>> {
        loop {
            if let Some(span) = self.try_find_span() {
                return Ok(Some(span));
            }
            if self.eof_reached {
                return Ok(None);
            }
            self.refill()?;
        }
    }

    /// Locates and validates the next record without materializing it.
    /// Returns `Ok(None)` at a clean end of input (no partial record
    /// pending).
    fn locate_next(&mut self) -> Result<Option<ValidatedSpan>> {
        match self.locate_span()? {
            Some(span) => Ok(Some(self.validate_span(span)?)),
            None => Ok(None),
        }
    }

    fn materialize(&mut self, validated: ValidatedSpan) -> Result<K::Output> {
        let span = validated.span;
        let name_start = self.record_start + 1;
        let name = &self.buf[name_start..name_start + validated.name_len];
        let seq_start = span.name_end + 1;
        let sequence = &self.buf[seq_start..seq_start + validated.seq_len];
        let qual_start = span.plus_end + 1;
        let qualities = &self.buf[qual_start..qual_start + validated.qual_len];
        let record = K::materialize(name, sequence, qualities)?;
        self.record_start = span.qual_end + 1;
        self.records_emitted += 1;
        Ok(record)
    }

    /// Builds a `PrematureEof` error describing the stranded tail: the
    /// pending bytes with any synthetic trailing newline discarded, and
    /// `line` counting the newlines inside that tail.
    fn premature_eof_for_tail(&self) -> Error {
        let mut tail = &self.buf[self.record_start..self.filled];
        if self.synthetic_newline_added {
            tail = &tail[..tail.len() - 1];
        }
        let line = bytecount_newlines(tail) as u64;
        Error::premature_eof(
            format!(
                "unexpected end of input in stranded tail '{}'",
                shorten_latin1(tail, 500)
            ),
            line,
        )
    }

    /// Refill protocol: compacts or grows the buffer, then reads more bytes
    /// from the source.
    fn refill(&mut self) -> Result<()> {
        if self.record_start == 0 && self.filled == self.capacity {
            let new_cap = self
                .policy
                .grow_limited(self.capacity)
                .ok_or_else(|| Error::new(ErrorKind::MemoryLimit))?;
            self.buf.resize(new_cap, 0);
            self.capacity = new_cap;
        } else {
            self.buf.copy_within(self.record_start..self.filled, 0);
            self.filled -= self.record_start;
            self.record_start = 0;
        }

        let to_read = self.capacity - self.filled;
        let n = self.source.read(&mut self.buf[self.filled..self.filled + to_read])?;
        if n > to_read {
            return Err(Error::value(
                "byte source returned more bytes than requested",
            ));
        }

        if n == 0 {
            if self.filled == 0 {
                self.eof_reached = true;
                return Ok(());
            }
            let ends_with_lf = self.buf[self.filled - 1] == b'\n';
            if !ends_with_lf && !self.synthetic_newline_added {
                self.buf[self.filled] = b'\n';
                self.synthetic_newline_pos = Some(self.filled);
                self.filled += 1;
                self.synthetic_newline_added = true;
                return Ok(());
            }
            self.eof_reached = true;
            return Err(self.premature_eof_for_tail());
        }

        self.filled += n;
        Ok(())
    }

    /// Pulls the next event: the one-shot `Header`, a `Record`, or `End`.
    ///
    /// The `Header` event only locates the first record's span -- it
    /// deliberately does not run `validate_span` against it, so a
    /// malformed or truncated first record is not surfaced until the
    /// following call, the one that actually emits it as a `Record`.
    pub fn next(&mut self) -> Result<Event<K::Output>> {
        if self.eof_reached && self.pending().is_empty() && self.pending_first.is_none() {
            return Ok(Event::End);
        }

        if !self.header_emitted {
            self.header_emitted = true;
            return match self.locate_span()? {
                Some(span) => {
                    // Only a heuristic for the Header flag: the structural
                    // checks that guarantee `seq_end + 2 <= plus_end` (a
                    // genuine '+' byte at `seq_end + 1`) haven't run yet, so
                    // guard against malformed input instead of assuming it.
                    let second_header_len = if span.plus_end > span.seq_end + 1 {
                        self.crlf_stripped_len(span.seq_end + 2, span.plus_end)
                    } else {
                        0
                    };
                    self.pending_first = Some(span);
                    Ok(Event::Header(second_header_len > 0))
                }
                None => {
                    self.eof_reached = true;
                    Ok(Event::End)
                }
            };
        }

        if let Some(span) = self.pending_first.take() {
            let validated = self.validate_span(span)?;
            return Ok(Event::Record(self.materialize(validated)?));
        }

        match self.locate_next()? {
            Some(validated) => Ok(Event::Record(self.materialize(validated)?)),
            None => Ok(Event::End),
        }
    }
}

/// Counts `\n` bytes in `bytes`.
#[inline]
fn bytecount_newlines(bytes: &[u8]) -> usize {
    memchr::memchr_iter(b'\n', bytes).count()
}
