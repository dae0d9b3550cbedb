//! A streaming, buffered parser for FASTQ sequencing reads.
//!
//! This crate is the *core* of a FASTQ reader: a pull-based iterator
//! ([`parser::FastqParser`]) that consumes any [`std::io::Read`] byte
//! source and yields validated [`record::ByteRecord`] or
//! [`record::TextRecord`] values, an identity check for aligning
//! paired-end reads ([`id_match::is_mate`]), and a buffer-synchronization
//! primitive for advancing two paired FASTQ streams in lock-step
//! ([`paired::scan_paired_heads`]).
//!
//! File opening, decompression, FASTA support, multi-file orchestration,
//! and logging are deliberately left to callers: this crate only knows how
//! to turn bytes into records.
//!
//! # Example
//!
//! ```
//! use fastq_core::parser::{Event, FastqParser};
//! use fastq_core::record::ByteRecord;
//!
//! let fastq = b"@read1\nACGT\n+\n!!!!\n";
//! let mut parser = FastqParser::<_, ByteRecord>::new(&fastq[..], 64).unwrap();
//!
//! assert_eq!(parser.next().unwrap(), Event::Header(false));
//! match parser.next().unwrap() {
//!     Event::Record(rec) => assert_eq!(rec.name, b"read1"),
//!     _ => unreachable!(),
//! }
//! assert_eq!(parser.next().unwrap(), Event::End);
//! ```
//!
//! # Large records
//!
//! Every record must fit into the internal buffer at once. The buffer
//! starts at the capacity passed to [`parser::FastqParser::new`] and
//! doubles (per [`policy::BufPolicy`]) whenever a record doesn't fit, so
//! callers rarely need to think about this -- unless they want a hard
//! ceiling, in which case [`policy::DoubleUntilLimited`] turns buffer
//! growth past a limit into an [`error::ErrorKind::MemoryLimit`] error
//! instead of unbounded allocation.

#[macro_use]
extern crate serde_derive;
extern crate serde;

pub mod error;
pub mod id_match;
pub mod paired;
pub mod parser;
pub mod policy;
pub mod record;

pub use error::{Error, Result};
pub use parser::{Event, FastqParser};
pub use record::{ByteRecord, TextRecord};
