//! Read hadoop-snappy streams from any [`std::io::Read`].
use std::io::{self, prelude::*};

use log::*;

use crate::{
    codec::{BlockCodec, SnapCodec},
    decoder::FrameDecoder,
    io_utils::{read_block_body, read_header},
    Section, SnappyError, SnappyResult,
};

/// Nonstandard reading options.
#[derive(Debug, Default, Clone)]
pub struct ReaderOptions {
    /// If Some(limit), the reader will return an error on any block whose compressed or
    /// decompressed length is > `limit`. Streams written by Hadoop use blocks of 256KiB or less.
    pub block_length_limit: Option<usize>,
}

impl ReaderOptions {
    pub fn with_block_length_limit(mut self, block_length_limit: usize) -> Self {
        self.block_length_limit = Some(block_length_limit);
        self
    }
}

/// Wraps a hadoop-snappy compressed stream and decompresses it as it is read.
///
/// Each block is read and decompressed in full before any of it is returned,
/// so at most one compressed and one decompressed block are held in memory.
/// Both buffers are reused from block to block.
///
/// Any error leaves the reader unusable: later reads return [`SnappyError::Poisoned`].
///
/// ```no_run
/// use std::{fs, io};
///
/// fn cat() -> Result<(), Box<dyn std::error::Error>> {
///     let file = fs::File::open("part-00000.snappy")?;
///     let mut reader = hadoop_snappy::Reader::new(io::BufReader::new(file));
///     let mut buf = vec![0; 64 * 1024];
///     loop {
///         let n = reader.read_decompressed(&mut buf)?;
///         if n == 0 {
///             break;
///         }
///         // do something with &buf[..n]...
///     }
///     Ok(())
/// }
/// ```
pub struct Reader<R, C = SnapCodec> {
    reader: R,
    decoder: FrameDecoder<C>,
}

impl<R: Read> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self::new_with_options(reader, ReaderOptions::default())
    }

    pub fn new_with_options(reader: R, options: ReaderOptions) -> Self {
        Self::with_codec(reader, SnapCodec::new(), options)
    }
}

impl<R: Read, C: BlockCodec> Reader<R, C> {
    /// Creates a reader that unpacks blocks with something other than [`SnapCodec`].
    pub fn with_codec(reader: R, codec: C, options: ReaderOptions) -> Self {
        Self {
            reader,
            decoder: FrameDecoder::new(codec, options),
        }
    }

    /// Decompresses into `out`, returning how many bytes were written.
    ///
    /// Only what is already decompressed, or what the next block holds, is returned;
    /// `out` isn't necessarily filled. `Ok(0)` means the stream ended cleanly
    /// (unless `out` was empty).
    pub fn read_decompressed(&mut self, out: &mut [u8]) -> SnappyResult<usize> {
        if self.decoder.is_poisoned() {
            return Err(SnappyError::Poisoned);
        }
        if out.is_empty() {
            return Ok(0);
        }
        if !self.fill()? {
            return Ok(0);
        }
        Ok(self.decoder.copy_to(out))
    }

    /// Decompresses everything left in the stream onto the end of `out`.
    pub fn read_to_end_decompressed(&mut self, out: &mut Vec<u8>) -> SnappyResult<usize> {
        let start = out.len();
        while self.fill()? {
            let block = self.decoder.buffered();
            out.extend_from_slice(block);
            let n = block.len();
            self.decoder.consume(n);
        }
        Ok(out.len() - start)
    }

    /// Reads frames and blocks until there is something to hand out.
    /// Returns false at the end of the stream.
    fn fill(&mut self) -> SnappyResult<bool> {
        if self.decoder.is_poisoned() {
            return Err(SnappyError::Poisoned);
        }
        while !self.decoder.has_buffered() {
            match self.next_block() {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(err) => return Err(self.decoder.poison(err)),
            }
        }
        Ok(true)
    }

    fn next_block(&mut self) -> SnappyResult<bool> {
        if self.decoder.needs_frame() {
            match read_header(&mut self.reader, Section::FrameHeader)? {
                // The start of a new frame is the one spot we expect to reach EOF.
                None => {
                    trace!("end of stream");
                    return Ok(false);
                }
                Some(len) => self.decoder.start_frame(len),
            }
        }

        let len = read_header(&mut self.reader, Section::BlockHeader)?
            .ok_or(SnappyError::UnexpectedEof(Section::BlockHeader))?;
        let buf = self.decoder.begin_block(len)?;
        read_block_body(&mut self.reader, len as usize, buf)?;
        self.decoder.finish_block()?;
        Ok(true)
    }

    /// Uncompressed bytes left in the current frame that haven't been decompressed yet.
    pub fn frame_remaining(&self) -> usize {
        self.decoder.frame_remaining()
    }

    /// True once a read has failed.
    pub fn is_poisoned(&self) -> bool {
        self.decoder.is_poisoned()
    }

    pub fn options(&self) -> &ReaderOptions {
        self.decoder.options()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Reading from the underlying reader directly will corrupt the decompressed stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes the reader and returns the underlying reader.
    /// Anything decompressed but not yet read is lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read, C: BlockCodec> Read for Reader<R, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_decompressed(buf)?)
    }
}

impl<R: Read, C: BlockCodec> BufRead for Reader<R, C> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.fill()?;
        Ok(self.decoder.buffered())
    }

    fn consume(&mut self, amt: usize) {
        self.decoder.consume(amt)
    }
}

impl<R, C> std::fmt::Debug for Reader<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}
