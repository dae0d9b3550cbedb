use std::fmt;
use std::io;

/// Kind of error produced while parsing or constructing FASTQ records.
///
/// Corresponds to the five error categories of the format: structural
/// violations (`Format`), truncated input (`PrematureEof`), failed buffer
/// growth (`MemoryLimit`), invariant violations on construction (`Value`),
/// and the ambient I/O failures of the underlying byte source (`Io`).
#[derive(Debug)]
pub enum ErrorKind {
    /// `std::io::Error` from the underlying byte source.
    Io(io::Error),
    /// A structural violation of the FASTQ grammar (missing `@`/`+`,
    /// mismatched repeated header, unequal sequence/quality lengths).
    Format {
        message: String,
        /// 0-based line number, computed as `4*n`, `4*n + 2`, or `4*n + 3`.
        line: u64,
    },
    /// The input ended in the middle of a record.
    PrematureEof {
        message: String,
        /// 0-based line number within the stranded tail.
        line: u64,
    },
    /// The buffer policy refused to grow the buffer any further.
    MemoryLimit,
    /// A construction invariant was violated (e.g. length mismatch) or an
    /// invalid parameter (e.g. `buffer_size < 1`) was supplied.
    Value(String),
    /// A header passed to a text-oriented helper was not single-byte
    /// encodable (not 8-bit-clean).
    NotSingleByte,
    /// Hints that destructuring should not be exhaustive.
    #[doc(hidden)]
    __Nonexhaustive,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Io(e) => e.fmt(f),
            ErrorKind::Format { message, line } => {
                write!(f, "FASTQ format error at line {}: {}", line, message)
            }
            ErrorKind::PrematureEof { message, line } => {
                write!(f, "FASTQ truncated at line {}: {}", line, message)
            }
            ErrorKind::MemoryLimit => write!(f, "FASTQ parse error: buffer limit reached"),
            ErrorKind::Value(message) => write!(f, "{}", message),
            ErrorKind::NotSingleByte => {
                write!(f, "header is not single-byte (8-bit-clean) encodable")
            }
            ErrorKind::__Nonexhaustive => Ok(()),
        }
    }
}

/// Parsing / construction error.
#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind: Box::new(kind),
        }
    }

    #[inline]
    pub fn format(message: impl Into<String>, line: u64) -> Self {
        Error::new(ErrorKind::Format {
            message: message.into(),
            line,
        })
    }

    #[inline]
    pub fn premature_eof(message: impl Into<String>, line: u64) -> Self {
        Error::new(ErrorKind::PrematureEof {
            message: message.into(),
            line,
        })
    }

    #[inline]
    pub fn value(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Value(message.into()))
    }

    /// Returns a reference to the [`ErrorKind`] associated with the error.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the [`ErrorKind`] associated with the error, consuming it.
    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        *self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::new(ErrorKind::Io(e))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

/// Shortens a byte slice to at most `cap` bytes, rendering it latin-1-style
/// (one byte per `char`) for inclusion in error messages.
pub(crate) fn shorten_latin1(bytes: &[u8], cap: usize) -> String {
    bytes
        .iter()
        .take(cap)
        .map(|&b| b as char)
        .collect::<String>()
}

pub type Result<T> = std::result::Result<T, Error>;
