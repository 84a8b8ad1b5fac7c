//! A library for reading data compressed with the Hadoop framing of snappy.
//!
//! Hadoop (and HDFS) don't use the snappy framing format. Instead they wrap raw snappy blocks
//! in their own container, which looks like this on the wire:
//!
//! ```text
//! stream       := frame*
//! frame        := frame_header block+
//! frame_header := u32 big endian, the number of uncompressed bytes in the frame
//! block        := block_header block_body
//! block_header := u32 big endian, the length of block_body
//! block_body   := one raw snappy block
//! ```
//!
//! There is no magic number, no version and no checksum above the snappy blocks,
//! so the only way to know whether some bytes are in this format is to try to read them.
//! Reading something that isn't will most likely return an error, but may return garbage.
//!
//! Use [`Reader`] to decompress any [`std::io::Read`]:
//!
//! ```
//! use std::io::Read;
//!
//! // "Hello, world!" in one frame holding one block.
//! let data: &[u8] = &[
//!     0x00, 0x00, 0x00, 0x0D, 0x00, 0x00, 0x00, 0x0F, 0x0D, 0x30, 0x48, 0x65, 0x6C, 0x6C,
//!     0x6F, 0x2C, 0x20, 0x77, 0x6F, 0x72, 0x6C, 0x64, 0x21,
//! ];
//!
//! let mut out = String::new();
//! hadoop_snappy::Reader::new(data).read_to_string(&mut out)?;
//! assert_eq!(out, "Hello, world!");
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! With the `tokio` feature, `tokio::AsyncReader` does the same for a `tokio::io::AsyncRead`.
pub mod codec;
pub mod decoder;
mod io_utils;
pub mod read;
#[cfg(feature = "tokio")]
pub mod tokio;

use std::{fmt, io};

use thiserror::Error;

pub use codec::{BlockCodec, SnapCodec};
pub use read::{Reader, ReaderOptions};

/// Length in bytes of both the frame and block headers.
pub const HEADER_LEN: usize = 4;

/// An error boxed up by a [`BlockCodec`].
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The part of the stream being read when something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    FrameHeader,
    BlockHeader,
    BlockBody,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::FrameHeader => "frame header",
            Section::BlockHeader => "block header",
            Section::BlockBody => "block",
        })
    }
}

#[derive(Debug, Error)]
pub enum SnappyError {
    #[error("hadoop-snappy: read {0}: unexpected end of stream")]
    UnexpectedEof(Section),
    #[error("hadoop-snappy: zero length block in input stream")]
    EmptyBlock,
    #[error("hadoop-snappy: decompress block: decompressed frame larger than expected ({decoded} bytes in block, {remaining} left in frame)")]
    DecompressedTooLarge { decoded: usize, remaining: usize },
    #[error("hadoop-snappy: block length {len} exceeds limit {limit}")]
    BlockTooLarge { len: usize, limit: usize },
    #[error("hadoop-snappy: determine block decoded length: {0}")]
    MalformedPreamble(#[source] CodecError),
    #[error("hadoop-snappy: decompress block: {0}")]
    Corrupt(#[source] CodecError),
    #[error("hadoop-snappy: read {section}: {source}")]
    Io {
        section: Section,
        #[source]
        source: io::Error,
    },
    #[error("hadoop-snappy: reader already returned an error")]
    Poisoned,
}

pub type SnappyResult<T> = Result<T, SnappyError>;

impl SnappyError {
    /// The [`io::ErrorKind`] this error maps to when surfaced through [`std::io::Read`].
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            SnappyError::UnexpectedEof(_) => io::ErrorKind::UnexpectedEof,
            SnappyError::Io { source, .. } => source.kind(),
            SnappyError::Poisoned => io::ErrorKind::Other,
            _ => io::ErrorKind::InvalidData,
        }
    }
}

/// Errors from the underlying reader are handed back untouched,
/// so callers can match on them exactly as if they had read the source themselves.
impl From<SnappyError> for io::Error {
    fn from(err: SnappyError) -> io::Error {
        match err {
            SnappyError::Io { source, .. } => source,
            err => io::Error::new(err.kind(), err),
        }
    }
}

/// Decompresses a whole hadoop-snappy stream held in memory.
pub fn decompress(data: &[u8]) -> SnappyResult<Vec<u8>> {
    let mut reader = Reader::new(data);
    let mut out = Vec::new();
    reader.read_to_end_decompressed(&mut out)?;
    Ok(out)
}
